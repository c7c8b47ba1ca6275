//! Tessellation fillers: turn a face's visible sub-rectangle of the
//! subdivision grid into vertices and quad-triangulated indices.

use glam::{Vec2, Vec3, Vec4};
use nimbus_core::constants::SKY_GRID_SIZE;
use nimbus_core::math::pack_half2;
use nimbus_core::{CubeFace, SkyError};

use crate::clouds::{grid_coord, CloudTexCoords};
use crate::extents::SubRect;
use crate::sky_vec::{sky_tex_coord, sky_vec, TexClamp};
use crate::tess::{SkyVertex, TessBuffer};

/// Per-frame scratch grid: a view-relative sky point and a texture
/// coordinate for every subdivision vertex of the face being filled.
/// Indexed `[t][s]`.
#[derive(Debug, Clone)]
pub struct SkyGrid {
    pub points: [[Vec4; SKY_GRID_SIZE]; SKY_GRID_SIZE],
    pub tex_coords: [[Vec2; SKY_GRID_SIZE]; SKY_GRID_SIZE],
}

impl Default for SkyGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SkyGrid {
    pub fn new() -> Self {
        Self {
            points: [[Vec4::ZERO; SKY_GRID_SIZE]; SKY_GRID_SIZE],
            tex_coords: [[Vec2::ZERO; SKY_GRID_SIZE]; SKY_GRID_SIZE],
        }
    }

    pub fn clear_tex_coords(&mut self) {
        self.tex_coords = [[Vec2::ZERO; SKY_GRID_SIZE]; SKY_GRID_SIZE];
    }

    /// Sample skybox points and box-face texture coordinates over `rect`.
    pub fn sample_skybox(&mut self, face: CubeFace, rect: &SubRect, z_far: f32, clamp: TexClamp) {
        for t in rect.rows() {
            for s in rect.columns() {
                let (fs, ft) = (grid_coord(s), grid_coord(t));
                self.points[t][s] = sky_vec(fs, ft, face, z_far);
                self.tex_coords[t][s] = sky_tex_coord(fs, ft, clamp);
            }
        }
    }

    /// Sample sky points over `rect` and take texture coordinates from the
    /// precomputed cloud table.
    pub fn sample_clouds(
        &mut self,
        face: CubeFace,
        rect: &SubRect,
        z_far: f32,
        clouds: &CloudTexCoords,
    ) {
        for t in rect.rows() {
            for s in rect.columns() {
                self.points[t][s] = sky_vec(grid_coord(s), grid_coord(t), face, z_far);
                self.tex_coords[t][s] = clouds.tex_coord(face, t, s);
            }
        }
    }
}

/// Append one vertex per grid point in `rect`, row by row, translated by
/// `view_origin`. With `add_indexes`, also append two triangles per grid
/// cell. Fails on the first vertex or index that does not fit.
pub fn fill_sky_side(
    grid: &SkyGrid,
    rect: &SubRect,
    view_origin: Vec3,
    tess: &mut TessBuffer,
    add_indexes: bool,
) -> Result<(), SkyError> {
    let vertex_start = tess.num_vertices() as u32;

    for t in rect.rows() {
        for s in rect.columns() {
            let position = grid.points[t][s].truncate() + view_origin;
            let tex_coords = pack_half2(grid.tex_coords[t][s]);
            tess.push_vertex(SkyVertex::new(position, tex_coords))?;
        }
    }

    // Later passes of a multi-stage material reuse the first pass's indices.
    if !add_indexes {
        return Ok(());
    }

    let width = rect.width() as u32;
    let height = rect.height() as u32;
    for t in 0..height.saturating_sub(1) {
        for s in 0..width.saturating_sub(1) {
            let top_left = vertex_start + s + t * width;
            let bottom_left = vertex_start + s + (t + 1) * width;
            let top_right = top_left + 1;
            let bottom_right = bottom_left + 1;
            tess.push_triangle([top_left, bottom_left, top_right])?;
            tess.push_triangle([bottom_left, bottom_right, top_right])?;
        }
    }

    Ok(())
}
