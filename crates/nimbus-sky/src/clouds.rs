//! Cloud layer texture coordinates.
//!
//! Every subdivision grid point on every face is turned into a sky ray and
//! intersected with a spherical cloud shell of radius R + height, centred R
//! below the view origin. The intersection's direction from the shell centre
//! gives the texture coordinate, so clouds drift with parallax instead of
//! sticking to the box faces.

use glam::{DVec3, Vec2, Vec3};
use nimbus_core::constants::{
    CLOUD_PRECOMPUTE_Z_FAR, CLOUD_WORLD_RADIUS, HALF_SKY_SUBDIVISIONS, SKY_FACE_COUNT,
    SKY_GRID_SIZE,
};
use nimbus_core::{CubeFace, SkyError, ALL_FACES};

use crate::sky_vec::sky_vec;

/// Face coordinate in [-1, 1] of grid index `i` in 0..=SKY_SUBDIVISIONS.
#[inline]
pub fn grid_coord(i: usize) -> f32 {
    (i as i32 - HALF_SKY_SUBDIVISIONS) as f32 / HALF_SKY_SUBDIVISIONS as f32
}

/// Positive parameter `p` at which `origin_offset + p * ray` meets the shell,
/// with `origin_offset = (0, 0, radius)` and shell radius `radius + height`.
///
/// Uses the cancellation-free form of the quadratic so the root stays
/// accurate when the height (and so the constant term) goes to zero.
fn shell_intersection(ray: DVec3, radius: f64, height: f64) -> f64 {
    let a = ray.length_squared();
    let b = 2.0 * radius * ray.z;
    let c = -(2.0 * radius * height + height * height);
    let sq = (b * b - 4.0 * a * c).max(0.0).sqrt();

    if b > 0.0 {
        let denom = b + sq;
        if denom == 0.0 {
            0.0
        } else {
            -2.0 * c / denom
        }
    } else {
        (sq - b) / (2.0 * a)
    }
}

/// Precomputed cloud texture coordinates for one cloud height.
#[derive(Debug, Clone)]
pub struct CloudTexCoords {
    height: f32,
    params: [[[f32; SKY_GRID_SIZE]; SKY_GRID_SIZE]; SKY_FACE_COUNT],
    tex_coords: [[[Vec2; SKY_GRID_SIZE]; SKY_GRID_SIZE]; SKY_FACE_COUNT],
}

impl CloudTexCoords {
    /// Build the table for a cloud shell `height` units above the world sphere.
    pub fn new(height: f32) -> Result<Self, SkyError> {
        if !height.is_finite() || height < 0.0 {
            return Err(SkyError::InvalidCloudHeight(height));
        }

        let radius = CLOUD_WORLD_RADIUS as f64;
        let h = height as f64;
        let mut table = Self {
            height,
            params: [[[0.0; SKY_GRID_SIZE]; SKY_GRID_SIZE]; SKY_FACE_COUNT],
            tex_coords: [[[Vec2::ZERO; SKY_GRID_SIZE]; SKY_GRID_SIZE]; SKY_FACE_COUNT],
        };

        for face in ALL_FACES {
            for t in 0..SKY_GRID_SIZE {
                for s in 0..SKY_GRID_SIZE {
                    let ray = sky_vec(grid_coord(s), grid_coord(t), face, CLOUD_PRECOMPUTE_Z_FAR)
                        .truncate()
                        .as_dvec3();
                    let p = shell_intersection(ray, radius, h);

                    let mut v = ray * p;
                    v.z += radius;
                    let dir = v.normalize();

                    let f = face.index();
                    table.params[f][t][s] = p as f32;
                    table.tex_coords[f][t][s] = Vec2::new(
                        dir.x.clamp(-1.0, 1.0).acos() as f32,
                        dir.y.clamp(-1.0, 1.0).acos() as f32,
                    );
                }
            }
        }

        Ok(table)
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Ray parameter of the shell intersection at grid point (s, t).
    pub fn param(&self, face: CubeFace, t: usize, s: usize) -> f32 {
        self.params[face.index()][t][s]
    }

    /// Texture coordinate at grid point (s, t), in radians.
    pub fn tex_coord(&self, face: CubeFace, t: usize, s: usize) -> Vec2 {
        self.tex_coords[face.index()][t][s]
    }

    /// Shell intersection at grid point (s, t), relative to the world-sphere
    /// centre (R below the view origin).
    pub fn shell_point(&self, face: CubeFace, t: usize, s: usize) -> Vec3 {
        let ray = sky_vec(grid_coord(s), grid_coord(t), face, CLOUD_PRECOMPUTE_Z_FAR).truncate();
        ray * self.param(face, t, s) + Vec3::new(0.0, 0.0, CLOUD_WORLD_RADIUS)
    }
}

/// Cloud table cache for a sky material. The table is rebuilt only when the
/// requested height differs from the one it was built for.
#[derive(Debug, Clone, Default)]
pub struct CloudLayer {
    table: Option<CloudTexCoords>,
}

impl CloudLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `height`, rebuilding it if the height changed.
    pub fn ensure_height(&mut self, height: f32) -> Result<&CloudTexCoords, SkyError> {
        let stale = self.table.as_ref().map_or(true, |t| t.height() != height);
        if stale {
            log::debug!("Rebuilding cloud texture coordinates for height {height}");
            self.table = Some(CloudTexCoords::new(height)?);
        }
        match &self.table {
            Some(table) => Ok(table),
            None => Err(SkyError::InvalidCloudHeight(height)),
        }
    }

    /// The current table, if one has been built.
    pub fn table(&self) -> Option<&CloudTexCoords> {
        self.table.as_ref()
    }
}
