use glam::{Vec2, Vec3, Vec4};
use nimbus_core::constants::{CLOUD_TEX_CLAMP, SKYBOX_TEX_CLAMP};
use nimbus_core::CubeFace;

/// Band texture coordinates are clamped into, to keep bilinear filtering
/// from sampling across cube edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexClamp {
    pub min: f32,
    pub max: f32,
}

impl TexClamp {
    pub const SKYBOX: Self = Self {
        min: SKYBOX_TEX_CLAMP.0,
        max: SKYBOX_TEX_CLAMP.1,
    };

    /// Narrower band for box coordinates sampled during the cloud pass. The
    /// cloud grid overlays its own spherical coordinates instead
    /// (see `SkyGrid::sample_clouds`), so this only applies to callers that
    /// sample box coordinates for cloud faces.
    pub const CLOUDS: Self = Self {
        min: CLOUD_TEX_CLAMP.0,
        max: CLOUD_TEX_CLAMP.1,
    };

    #[inline]
    fn apply(self, v: f32) -> f32 {
        if v < self.min {
            self.min
        } else if v > self.max {
            self.max
        } else {
            v
        }
    }
}

/// Half-size of a box that contains the view frustum for this far clip.
#[inline]
pub fn sky_box_size(z_far: f32) -> f32 {
    z_far / 3.0f32.sqrt()
}

/// Map face coordinates (s, t in [-1, 1]) to a view-relative point on the
/// sky box, with w = 1.
pub fn sky_vec(s: f32, t: f32, face: CubeFace, z_far: f32) -> Vec4 {
    let b = Vec3::new(s, t, 1.0) * sky_box_size(z_far);
    face.unproject(b).extend(1.0)
}

/// Texture coordinate for face coordinates (s, t in [-1, 1]): remapped to
/// [0, 1], clamped to `clamp`, with t flipped so v grows downward.
pub fn sky_tex_coord(s: f32, t: f32, clamp: TexClamp) -> Vec2 {
    let s = clamp.apply((s + 1.0) * 0.5);
    let t = clamp.apply((t + 1.0) * 0.5);
    Vec2::new(s, 1.0 - t)
}
