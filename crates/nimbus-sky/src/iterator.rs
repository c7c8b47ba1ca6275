//! Per-frame sky pass.
//!
//! On entry the tessellation buffer holds the visible sky surface
//! triangles. The pass clips them to find which part of each cube face is
//! visible, optionally draws the outer skybox over that area, then refills
//! the buffer with cloud geometry and hands it to the stage iterator.

use glam::Vec3;
use nimbus_core::constants::{CLOUD_FACE_COUNT, SKY_FACE_COUNT};
use nimbus_core::{CubeFace, SkyError, ALL_FACES};
use serde::Serialize;

use crate::backend::{DepthRange, SkyBackend, StagePath};
use crate::clip::clip_sky_triangles;
use crate::extents::{SkyBounds, SubRect};
use crate::fill::{fill_sky_side, SkyGrid};
use crate::material::PreparedSky;
use crate::sky_vec::TexClamp;
use crate::tess::TessBuffer;

/// Texture unit the outer box is bound to.
const SKYBOX_TEXTURE_UNIT: u32 = 0;

/// Per-view switches for the sky pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyView {
    /// Camera origin in world space.
    pub origin: Vec3,
    /// Far clip distance; sizes the sky box.
    pub z_far: f32,
    /// Draw the sky in front of everything, to inspect how much is visible.
    pub show_sky: bool,
    /// Skip the sky pass entirely.
    pub fast_sky: bool,
}

impl Default for SkyView {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            z_far: 4096.0,
            show_sky: false,
            fast_sky: false,
        }
    }
}

/// The sky surface being drawn and the path its stages go through.
#[derive(Debug, Clone, Copy)]
pub struct SkySurface<'a> {
    pub sky: &'a PreparedSky,
    /// None when the renderer has not selected a stage iterator.
    pub stage_path: Option<StagePath>,
}

/// What one sky pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkyPassReport {
    pub skybox_drawn: bool,
    pub cloud_vertices: usize,
    pub cloud_indices: usize,
    /// Faces with a drawable sub-rectangle after clipping.
    pub faces_visible: usize,
    /// Sky was drawn in the final pass; a sun flare may follow.
    pub sky_rendered: bool,
}

/// Scratch state for the sky pass, reused across frames.
#[derive(Debug, Clone, Default)]
pub struct SkyPass {
    bounds: SkyBounds,
    grid: SkyGrid,
    rects: [Option<SubRect>; SKY_FACE_COUNT],
}

impl SkyPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Face extents from the last clip pass.
    pub fn bounds(&self) -> &SkyBounds {
        &self.bounds
    }

    /// Quantized sub-rectangle for `face` from the last clip pass.
    pub fn visible_rect(&self, face: CubeFace) -> Option<SubRect> {
        self.rects[face.index()]
    }

    /// Run the sky pass for the triangles currently in `tess`.
    ///
    /// On success `tess` holds the cloud geometry that was dispatched. On
    /// error nothing further has been dispatched, the depth range is back
    /// to full, and the buffer contents are undefined.
    pub fn run<B>(
        &mut self,
        view: &SkyView,
        surface: &SkySurface<'_>,
        tess: &mut TessBuffer,
        backend: &mut B,
    ) -> Result<SkyPassReport, SkyError>
    where
        B: SkyBackend + ?Sized,
    {
        let material = surface.sky.material();
        log::trace!(
            "--- sky iterator ({}, {} vertices, {} triangles) ---",
            material.name,
            tess.num_vertices(),
            tess.num_indices() / 3
        );

        if view.fast_sky {
            log::trace!("Fast sky enabled, skipping sky pass");
            return Ok(SkyPassReport::default());
        }

        let path = surface.stage_path.ok_or(SkyError::MissingStageIterator)?;
        backend.set_two_sided();

        let mut report = SkyPassReport::default();
        self.clip(view, tess)?;
        report.faces_visible = self.rects.iter().flatten().count();

        match path {
            StagePath::DepthFill => {
                self.build_cloud_data(view, surface.sky, tess, backend)?;
                Self::dispatch(path, tess, backend, &mut report);
            }
            StagePath::Generic => {
                let range = if view.show_sky {
                    DepthRange::FRONT
                } else {
                    DepthRange::BACK
                };
                backend.set_depth_range(range);
                let drawn = self.draw_generic(view, surface.sky, tess, backend, &mut report);
                // Restored even when the sky work fails.
                backend.set_depth_range(DepthRange::FULL);
                drawn?;
                report.sky_rendered = true;
            }
        }

        Ok(report)
    }

    /// Skybox and cloud work of the generic path, run inside the sky depth
    /// range.
    fn draw_generic<B>(
        &mut self,
        view: &SkyView,
        sky: &PreparedSky,
        tess: &mut TessBuffer,
        backend: &mut B,
        report: &mut SkyPassReport,
    ) -> Result<(), SkyError>
    where
        B: SkyBackend + ?Sized,
    {
        if let Some(texture) = sky.material().outer_box.drawable() {
            backend.bind_skybox_program(view.origin);
            backend.bind_texture(SKYBOX_TEXTURE_UNIT, texture);
            self.draw_sky_box(view, tess, backend)?;
            report.skybox_drawn = true;
        }

        self.build_cloud_data(view, sky, tess, backend)?;
        Self::dispatch(StagePath::Generic, tess, backend, report);
        Ok(())
    }

    /// Reset the face extents, clip every surface triangle, and quantize
    /// the result.
    fn clip(&mut self, view: &SkyView, tess: &TessBuffer) -> Result<(), SkyError> {
        self.bounds.clear();
        clip_sky_triangles(tess, view.origin, &mut self.bounds)?;
        for face in ALL_FACES {
            self.rects[face.index()] = self.bounds.quantize(face);
        }
        Ok(())
    }

    fn draw_sky_box<B>(
        &mut self,
        view: &SkyView,
        tess: &mut TessBuffer,
        backend: &mut B,
    ) -> Result<(), SkyError>
    where
        B: SkyBackend + ?Sized,
    {
        self.grid.clear_tex_coords();
        tess.clear();
        backend.map_buffers();

        for face in ALL_FACES {
            let Some(rect) = self.rects[face.index()] else {
                continue;
            };
            self.grid.sample_skybox(face, &rect, view.z_far, TexClamp::SKYBOX);
            fill_sky_side(&self.grid, &rect, view.origin, tess, true)?;
        }

        backend.update_buffers(tess);
        backend.draw_elements(tess);
        Ok(())
    }

    /// Refill `tess` with cloud geometry: one full fill with indices for
    /// the first stage, then a vertex-only fill per further stage.
    fn build_cloud_data<B>(
        &mut self,
        view: &SkyView,
        sky: &PreparedSky,
        tess: &mut TessBuffer,
        backend: &mut B,
    ) -> Result<(), SkyError>
    where
        B: SkyBackend + ?Sized,
    {
        tess.clear();
        backend.map_buffers();

        let material = sky.material();
        let Some(clouds) = sky.clouds() else {
            return Ok(());
        };
        if material.stages.is_empty() {
            log::debug!("Sky material '{}' has no stages, no clouds built", material.name);
            return Ok(());
        }

        for stage in 0..material.stages.len() {
            let add_indexes = stage == 0;
            for face in &ALL_FACES[..CLOUD_FACE_COUNT] {
                let Some(rect) = self.rects[face.index()] else {
                    continue;
                };
                self.grid.sample_clouds(*face, &rect, view.z_far, clouds);
                fill_sky_side(&self.grid, &rect, view.origin, tess, add_indexes)?;
            }
        }
        Ok(())
    }

    fn dispatch<B>(path: StagePath, tess: &TessBuffer, backend: &mut B, report: &mut SkyPassReport)
    where
        B: SkyBackend + ?Sized,
    {
        report.cloud_vertices = tess.num_vertices();
        report.cloud_indices = tess.num_indices();
        if tess.num_vertices() > 0 {
            backend.run_stages(path, tess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use crate::tess::SkyVertex;
    use nimbus_core::{OuterBox, SkyMaterial, SkyStage};

    fn sky(outer_box: OuterBox, cloud_height: f32, stages: usize) -> PreparedSky {
        PreparedSky::new(SkyMaterial {
            name: "skies/test".to_string(),
            is_sky: true,
            outer_box,
            cloud_height,
            stages: (0..stages)
                .map(|i| SkyStage {
                    map: format!("clouds_{i}"),
                })
                .collect(),
        })
        .expect("valid material")
    }

    fn surface_tess(triangles: &[[Vec3; 3]]) -> TessBuffer {
        let mut tess = TessBuffer::default();
        for tri in triangles {
            let a = tess.push_vertex(SkyVertex::new(tri[0], [0, 0])).expect("fits");
            let b = tess.push_vertex(SkyVertex::new(tri[1], [0, 0])).expect("fits");
            let c = tess.push_vertex(SkyVertex::new(tri[2], [0, 0])).expect("fits");
            tess.push_triangle([a, b, c]).expect("fits");
        }
        tess
    }

    /// Small triangle straight overhead: quantizes to a 3x3 block on +Z.
    fn overhead(origin: Vec3) -> [Vec3; 3] {
        [
            origin + Vec3::new(-20.0, -20.0, 200.0),
            origin + Vec3::new(20.0, -20.0, 200.0),
            origin + Vec3::new(0.0, 25.0, 200.0),
        ]
    }

    fn below() -> [Vec3; 3] {
        [
            Vec3::new(-20.0, -20.0, -200.0),
            Vec3::new(20.0, -20.0, -200.0),
            Vec3::new(0.0, 25.0, -200.0),
        ]
    }

    fn generic(sky: &PreparedSky) -> SkySurface<'_> {
        SkySurface {
            sky,
            stage_path: Some(StagePath::Generic),
        }
    }

    #[test]
    fn test_fast_sky_does_nothing() {
        let sky = sky(OuterBox::Cube("env/day".into()), 512.0, 1);
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let mut backend = RecordingBackend::new();
        let view = SkyView {
            fast_sky: true,
            ..SkyView::default()
        };
        let report = SkyPass::new()
            .run(&view, &generic(&sky), &mut tess, &mut backend)
            .expect("fast sky");
        assert_eq!(report, SkyPassReport::default());
        assert!(backend.calls.is_empty());
        assert_eq!(tess.num_vertices(), 3);
    }

    #[test]
    fn test_missing_stage_iterator_is_error() {
        let sky = sky(OuterBox::Absent, 0.0, 1);
        let surface = SkySurface {
            sky: &sky,
            stage_path: None,
        };
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let mut backend = RecordingBackend::new();
        let err = SkyPass::new()
            .run(&SkyView::default(), &surface, &mut tess, &mut backend)
            .unwrap_err();
        assert_eq!(err, SkyError::MissingStageIterator);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_generic_pass_call_order() {
        let sky = sky(OuterBox::Cube("env/day".into()), 512.0, 1);
        let origin = Vec3::new(100.0, -50.0, 30.0);
        let view = SkyView {
            origin,
            ..SkyView::default()
        };
        let mut tess = surface_tess(&[overhead(origin)]);
        let mut backend = RecordingBackend::new();
        let report = SkyPass::new()
            .run(&view, &generic(&sky), &mut tess, &mut backend)
            .expect("sky pass");

        assert_eq!(
            backend.calls,
            vec![
                BackendCall::TwoSided,
                BackendCall::DepthRange(DepthRange::BACK),
                BackendCall::BindSkyboxProgram(origin),
                BackendCall::BindTexture {
                    unit: 0,
                    texture: "env/day".to_string()
                },
                BackendCall::MapBuffers,
                BackendCall::UpdateBuffers {
                    vertices: 9,
                    indices: 24
                },
                BackendCall::DrawElements {
                    vertices: 9,
                    indices: 24
                },
                BackendCall::MapBuffers,
                BackendCall::RunStages {
                    path: StagePath::Generic,
                    vertices: 9,
                    indices: 24
                },
                BackendCall::DepthRange(DepthRange::FULL),
            ]
        );
        assert_eq!(
            report,
            SkyPassReport {
                skybox_drawn: true,
                cloud_vertices: 9,
                cloud_indices: 24,
                faces_visible: 1,
                sky_rendered: true,
            }
        );
    }

    #[test]
    fn test_clip_only_touches_up_face() {
        let sky = sky(OuterBox::Absent, 0.0, 0);
        let mut pass = SkyPass::new();
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let mut backend = RecordingBackend::new();
        pass.run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("sky pass");
        for face in ALL_FACES {
            assert_eq!(pass.bounds().is_empty(face), face != CubeFace::PosZ);
        }
        let rect = pass.visible_rect(CubeFace::PosZ).expect("visible");
        assert_eq!(rect.vertex_count(), 9);
    }

    #[test]
    fn test_show_sky_draws_in_front() {
        let sky = sky(OuterBox::Absent, 0.0, 0);
        let view = SkyView {
            show_sky: true,
            ..SkyView::default()
        };
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let mut backend = RecordingBackend::new();
        SkyPass::new()
            .run(&view, &generic(&sky), &mut tess, &mut backend)
            .expect("sky pass");
        assert_eq!(backend.calls[1], BackendCall::DepthRange(DepthRange::FRONT));
        assert_eq!(
            backend.calls.last(),
            Some(&BackendCall::DepthRange(DepthRange::FULL))
        );
    }

    #[test]
    fn test_black_box_not_drawn() {
        let sky = sky(OuterBox::Black, 0.0, 1);
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let mut backend = RecordingBackend::new();
        let report = SkyPass::new()
            .run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("sky pass");
        assert!(!report.skybox_drawn);
        assert!(report.sky_rendered);
        assert_eq!(backend.draw_count(), 0);
        assert_eq!(tess.num_vertices(), 0);
    }

    #[test]
    fn test_depth_fill_path() {
        let sky = sky(OuterBox::Cube("env/day".into()), 512.0, 1);
        let surface = SkySurface {
            sky: &sky,
            stage_path: Some(StagePath::DepthFill),
        };
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let mut backend = RecordingBackend::new();
        let report = SkyPass::new()
            .run(&SkyView::default(), &surface, &mut tess, &mut backend)
            .expect("sky pass");

        assert_eq!(
            backend.calls,
            vec![
                BackendCall::TwoSided,
                BackendCall::MapBuffers,
                BackendCall::RunStages {
                    path: StagePath::DepthFill,
                    vertices: 9,
                    indices: 24
                },
            ]
        );
        assert!(!report.skybox_drawn);
        assert!(!report.sky_rendered);
    }

    #[test]
    fn test_later_stages_add_vertices_only() {
        let one = sky(OuterBox::Absent, 512.0, 1);
        let three = sky(OuterBox::Absent, 512.0, 3);
        let mut backend = RecordingBackend::new();

        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let single = SkyPass::new()
            .run(&SkyView::default(), &generic(&one), &mut tess, &mut backend)
            .expect("sky pass");
        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        let multi = SkyPass::new()
            .run(&SkyView::default(), &generic(&three), &mut tess, &mut backend)
            .expect("sky pass");

        assert_eq!(multi.cloud_vertices, 3 * single.cloud_vertices);
        assert_eq!(multi.cloud_indices, single.cloud_indices);
    }

    #[test]
    fn test_no_clouds_below_horizon() {
        let sky = sky(OuterBox::Cube("env/day".into()), 512.0, 2);
        let mut tess = surface_tess(&[below()]);
        let mut backend = RecordingBackend::new();
        let report = SkyPass::new()
            .run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("sky pass");
        // The skybox covers the floor; the cloud layer never does.
        assert!(report.skybox_drawn);
        assert_eq!(report.faces_visible, 1);
        assert_eq!(report.cloud_vertices, 0);
        assert!(!backend
            .calls
            .iter()
            .any(|c| matches!(c, BackendCall::RunStages { .. })));
    }

    #[test]
    fn test_no_geometry_no_dispatch() {
        let sky = sky(OuterBox::Cube("env/day".into()), 512.0, 1);
        let mut tess = TessBuffer::default();
        let mut backend = RecordingBackend::new();
        let report = SkyPass::new()
            .run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("sky pass");
        assert_eq!(report.faces_visible, 0);
        assert_eq!(report.cloud_vertices, 0);
        // The skybox draw is still issued, just empty.
        assert!(backend.calls.contains(&BackendCall::DrawElements {
            vertices: 0,
            indices: 0
        }));
        assert!(report.sky_rendered);
    }

    #[test]
    fn test_overflow_aborts_before_dispatch() {
        let sky = sky(OuterBox::Absent, 512.0, 1);
        // A wide ceiling touches five faces; 20 vertices cannot hold them.
        let ceiling = [
            Vec3::new(-500.0, -500.0, 50.0),
            Vec3::new(500.0, -500.0, 50.0),
            Vec3::new(500.0, 500.0, 50.0),
        ];
        let mut tess = TessBuffer::new(20, 6000);
        let a = tess.push_vertex(SkyVertex::new(ceiling[0], [0, 0])).expect("fits");
        let b = tess.push_vertex(SkyVertex::new(ceiling[1], [0, 0])).expect("fits");
        let c = tess.push_vertex(SkyVertex::new(ceiling[2], [0, 0])).expect("fits");
        tess.push_triangle([a, b, c]).expect("fits");

        let mut backend = RecordingBackend::new();
        let err = SkyPass::new()
            .run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .unwrap_err();
        assert_eq!(err, SkyError::VertexOverflow { capacity: 20 });
        assert_eq!(backend.draw_count(), 0);
        assert_eq!(
            backend.calls.last(),
            Some(&BackendCall::DepthRange(DepthRange::FULL))
        );
    }

    #[test]
    fn test_skybox_overflow_restores_depth_range() {
        let sky = sky(OuterBox::Cube("env/test".to_string()), 512.0, 1);
        let mut tess = TessBuffer::new(20, 6000);
        let ceiling = [
            Vec3::new(-500.0, -500.0, 50.0),
            Vec3::new(500.0, -500.0, 50.0),
            Vec3::new(500.0, 500.0, 50.0),
        ];
        let a = tess.push_vertex(SkyVertex::new(ceiling[0], [0, 0])).expect("fits");
        let b = tess.push_vertex(SkyVertex::new(ceiling[1], [0, 0])).expect("fits");
        let c = tess.push_vertex(SkyVertex::new(ceiling[2], [0, 0])).expect("fits");
        tess.push_triangle([a, b, c]).expect("fits");

        let view = SkyView {
            show_sky: true,
            ..SkyView::default()
        };
        let mut backend = RecordingBackend::new();
        let result = SkyPass::new().run(&view, &generic(&sky), &mut tess, &mut backend);
        assert!(result.is_err());
        assert!(backend
            .calls
            .contains(&BackendCall::DepthRange(DepthRange::FRONT)));
        assert_eq!(
            backend.calls.last(),
            Some(&BackendCall::DepthRange(DepthRange::FULL))
        );
    }

    #[test]
    fn test_dangling_surface_index_is_error() {
        let sky = sky(OuterBox::Absent, 512.0, 1);
        let mut tess = TessBuffer::default();
        tess.push_vertex(SkyVertex::new(Vec3::new(0.0, 0.0, 50.0), [0, 0]))
            .expect("fits");
        assert_eq!(
            tess.push_triangle([0, 1, 2]),
            Err(SkyError::IndexOutOfRange {
                index: 1,
                vertices: 1
            })
        );

        let mut backend = RecordingBackend::new();
        let report = SkyPass::new()
            .run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("no surfaces to clip");
        assert_eq!(report.faces_visible, 0);
    }

    #[test]
    fn test_pass_reuses_scratch_between_frames() {
        let sky = sky(OuterBox::Absent, 512.0, 1);
        let mut pass = SkyPass::new();
        let mut backend = RecordingBackend::new();

        let mut tess = surface_tess(&[overhead(Vec3::ZERO)]);
        pass.run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("frame 1");
        assert!(pass.visible_rect(CubeFace::PosZ).is_some());

        let mut tess = surface_tess(&[below()]);
        pass.run(&SkyView::default(), &generic(&sky), &mut tess, &mut backend)
            .expect("frame 2");
        assert!(pass.visible_rect(CubeFace::PosZ).is_none());
        assert!(pass.visible_rect(CubeFace::NegZ).is_some());
    }
}
