use glam::Vec3;

use crate::tess::TessBuffer;

/// Depth range override applied around the sky draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    /// Standard range.
    pub const FULL: Self = Self { near: 0.0, far: 1.0 };
    /// Everything at the near plane: sky drawn over the world.
    pub const FRONT: Self = Self { near: 0.0, far: 0.0 };
    /// Everything at the far plane: sky behind the world.
    pub const BACK: Self = Self { near: 1.0, far: 1.0 };
}

/// Stage-drawing path the renderer has selected for the current surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePath {
    /// Depth prepass. No skybox, no depth-range changes.
    DepthFill,
    /// Final colour pass.
    Generic,
}

/// GPU-side services the sky pass drives. Implementations own buffer
/// objects, programs and textures; the sky pass only orders the calls.
pub trait SkyBackend {
    fn set_two_sided(&mut self);
    fn set_depth_range(&mut self, range: DepthRange);
    /// Prepare the vertex/index buffers for writing.
    fn map_buffers(&mut self);
    /// Upload the filled buffer contents.
    fn update_buffers(&mut self, tess: &TessBuffer);
    /// Activate the skybox program with the view origin in world space.
    fn bind_skybox_program(&mut self, view_origin: Vec3);
    fn bind_texture(&mut self, unit: u32, texture: &str);
    fn draw_elements(&mut self, tess: &TessBuffer);
    /// Hand the filled buffer to the material's stage iterator.
    fn run_stages(&mut self, path: StagePath, tess: &TessBuffer);
}

/// One recorded backend call, with buffer sizes captured at call time.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    TwoSided,
    DepthRange(DepthRange),
    MapBuffers,
    UpdateBuffers { vertices: usize, indices: usize },
    BindSkyboxProgram(Vec3),
    BindTexture { unit: u32, texture: String },
    DrawElements { vertices: usize, indices: usize },
    RunStages { path: StagePath, vertices: usize, indices: usize },
}

/// Backend that draws nothing and records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Number of draws issued, skybox and stage dispatches together.
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::DrawElements { .. } | BackendCall::RunStages { .. }))
            .count()
    }
}

impl SkyBackend for RecordingBackend {
    fn set_two_sided(&mut self) {
        self.calls.push(BackendCall::TwoSided);
    }

    fn set_depth_range(&mut self, range: DepthRange) {
        self.calls.push(BackendCall::DepthRange(range));
    }

    fn map_buffers(&mut self) {
        self.calls.push(BackendCall::MapBuffers);
    }

    fn update_buffers(&mut self, tess: &TessBuffer) {
        self.calls.push(BackendCall::UpdateBuffers {
            vertices: tess.num_vertices(),
            indices: tess.num_indices(),
        });
    }

    fn bind_skybox_program(&mut self, view_origin: Vec3) {
        self.calls.push(BackendCall::BindSkyboxProgram(view_origin));
    }

    fn bind_texture(&mut self, unit: u32, texture: &str) {
        self.calls.push(BackendCall::BindTexture {
            unit,
            texture: texture.to_string(),
        });
    }

    fn draw_elements(&mut self, tess: &TessBuffer) {
        self.calls.push(BackendCall::DrawElements {
            vertices: tess.num_vertices(),
            indices: tess.num_indices(),
        });
    }

    fn run_stages(&mut self, path: StagePath, tess: &TessBuffer) {
        self.calls.push(BackendCall::RunStages {
            path,
            vertices: tess.num_vertices(),
            indices: tess.num_indices(),
        });
    }
}
