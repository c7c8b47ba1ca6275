use glam::Vec3;
use nimbus_core::constants::PROJECTION_EPSILON;
use nimbus_core::CubeFace;

use crate::extents::SkyBounds;

/// Project a fully clipped fragment onto the cube face it points at and
/// widen that face's extent.
///
/// The face comes from the vertex sum (its direction is all that matters).
/// Vertices whose depth along the face axis is below PROJECTION_EPSILON are
/// skipped rather than divided by; they contribute nothing to the extent.
/// Returns the face that was chosen.
pub fn add_sky_polygon(points: &[Vec3], bounds: &mut SkyBounds) -> CubeFace {
    let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
    let face = CubeFace::from_direction(sum);

    for &p in points {
        let depth = face.depth(p);
        if depth < PROJECTION_EPSILON {
            continue;
        }
        bounds.widen(face, face.project(p, depth));
    }

    face
}
