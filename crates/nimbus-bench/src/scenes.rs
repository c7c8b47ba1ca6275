use glam::Vec3;
use nimbus_core::SkyError;
use nimbus_sky::{SkyVertex, TessBuffer};

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub camera_position: [f32; 3],
    /// Sky surface patches around the camera, in world space.
    pub patches: Vec<Patch>,
}

/// A flat sky surface patch: `corner` plus spans along two edges,
/// subdivided into `cells` x `cells` quads.
#[derive(Debug, Clone, Copy)]
pub struct Patch {
    pub corner: [f32; 3],
    pub edge_u: [f32; 3],
    pub edge_v: [f32; 3],
    pub cells: u32,
}

impl Patch {
    const fn new(corner: [f32; 3], edge_u: [f32; 3], edge_v: [f32; 3], cells: u32) -> Self {
        Self {
            corner,
            edge_u,
            edge_v,
            cells,
        }
    }
}

/// Indexed sky surface geometry for one scene.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl SceneGeometry {
    /// Tessellate every patch of a scene.
    pub fn build(config: &SceneConfig) -> Self {
        let mut geometry = Self::default();
        for patch in &config.patches {
            geometry.add_patch(patch);
        }
        geometry
    }

    fn add_patch(&mut self, patch: &Patch) {
        let corner = Vec3::from_array(patch.corner);
        let u = Vec3::from_array(patch.edge_u);
        let v = Vec3::from_array(patch.edge_v);
        let n = patch.cells.max(1);
        let row = n + 1;
        let start = self.vertices.len() as u32;

        for j in 0..=n {
            for i in 0..=n {
                let fu = i as f32 / n as f32;
                let fv = j as f32 / n as f32;
                self.vertices.push(corner + u * fu + v * fv);
            }
        }

        for j in 0..n {
            for i in 0..n {
                let a = start + i + j * row;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                self.triangles.push([a, c, b]);
                self.triangles.push([c, d, b]);
            }
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Replace the contents of `tess` with this geometry, as the renderer
    /// does before handing sky surfaces to the sky pass.
    pub fn load_into(&self, tess: &mut TessBuffer) -> Result<(), SkyError> {
        tess.clear();
        for &p in &self.vertices {
            tess.push_vertex(SkyVertex::new(p, [0, 0]))?;
        }
        for &tri in &self.triangles {
            tess.push_triangle(tri)?;
        }
        Ok(())
    }
}

/// Return the standard suite of benchmark scenes, from a narrow skylight
/// to sky on every side.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let camera = [0.0, 0.0, 64.0];

    vec![
        SceneConfig {
            name: "skylight",
            description: "small opening straight overhead",
            camera_position: camera,
            patches: vec![Patch::new(
                [-40.0, -40.0, 364.0],
                [80.0, 0.0, 0.0],
                [0.0, 80.0, 0.0],
                2,
            )],
        },
        SceneConfig {
            name: "courtyard",
            description: "square courtyard ceiling reaching past 45 degrees",
            camera_position: camera,
            patches: vec![Patch::new(
                [-600.0, -600.0, 364.0],
                [1200.0, 0.0, 0.0],
                [0.0, 1200.0, 0.0],
                8,
            )],
        },
        SceneConfig {
            name: "open_sky",
            description: "sky walls on every side plus a ceiling",
            camera_position: camera,
            patches: open_sky_patches(1000.0, 14.0, 1064.0),
        },
        SceneConfig {
            name: "canyon",
            description: "long narrow strip of sky overhead",
            camera_position: camera,
            patches: vec![Patch::new(
                [-2000.0, -60.0, 264.0],
                [4000.0, 0.0, 0.0],
                [0.0, 120.0, 0.0],
                12,
            )],
        },
        SceneConfig {
            name: "pit",
            description: "sky only below the camera",
            camera_position: camera,
            patches: vec![Patch::new(
                [-200.0, -200.0, -200.0],
                [400.0, 0.0, 0.0],
                [0.0, 400.0, 0.0],
                4,
            )],
        },
    ]
}

/// Four walls from `bottom` to `top` at distance `half` around the origin,
/// plus a ceiling at `top`.
fn open_sky_patches(half: f32, bottom: f32, top: f32) -> Vec<Patch> {
    let h = top - bottom;
    let w = 2.0 * half;
    vec![
        Patch::new([half, -half, bottom], [0.0, w, 0.0], [0.0, 0.0, h], 6),
        Patch::new([-half, half, bottom], [0.0, -w, 0.0], [0.0, 0.0, h], 6),
        Patch::new([half, half, bottom], [-w, 0.0, 0.0], [0.0, 0.0, h], 6),
        Patch::new([-half, -half, bottom], [w, 0.0, 0.0], [0.0, 0.0, h], 6),
        Patch::new([-half, -half, top], [w, 0.0, 0.0], [0.0, w, 0.0], 8),
    ]
}
