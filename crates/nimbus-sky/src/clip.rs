//! Recursive sky polygon clipping.
//!
//! Each visible sky triangle is split against the 6 planes that separate
//! the cube faces around the view origin (Sutherland-Hodgman, keeping both
//! halves). Fragments that survive all 6 stages lie inside a single face
//! pyramid and are handed to the face classifier.

use glam::Vec3;
use nimbus_core::constants::{MAX_CLIP_INPUT_VERTS, MAX_CLIP_VERTS, ON_EPSILON, SKY_CLIP_STAGES};
use nimbus_core::{SkyError, SKY_CLIP_PLANES};

use crate::classify::add_sky_polygon;
use crate::extents::SkyBounds;
use crate::tess::SurfaceTriangles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaneSide {
    Front,
    Back,
    On,
}

/// Fixed-capacity polygon owned by one level of the clip recursion.
#[derive(Clone)]
pub struct Fragment {
    points: [Vec3; MAX_CLIP_VERTS],
    len: usize,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

impl Fragment {
    pub fn new() -> Self {
        Self {
            points: [Vec3::ZERO; MAX_CLIP_VERTS],
            len: 0,
        }
    }

    /// Append a point. Fails instead of truncating when full.
    #[inline]
    pub fn push(&mut self, p: Vec3) -> Result<(), SkyError> {
        if self.len == MAX_CLIP_VERTS {
            return Err(SkyError::ClipOverflow {
                points: self.len + 1,
                capacity: MAX_CLIP_VERTS,
            });
        }
        self.points[self.len] = p;
        self.len += 1;
        Ok(())
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Clip a view-relative polygon against all stages and widen the face
/// extents in `bounds` with every terminal fragment.
pub fn clip_sky_polygon(points: &[Vec3], bounds: &mut SkyBounds) -> Result<(), SkyError> {
    clip_stage(points, 0, &mut |fragment: &[Vec3]| {
        add_sky_polygon(fragment, bounds);
    })
}

/// Clip a view-relative polygon against all stages, passing every terminal
/// fragment to `emit` instead of the classifier.
pub fn clip_sky_fragments<F>(points: &[Vec3], emit: &mut F) -> Result<(), SkyError>
where
    F: FnMut(&[Vec3]),
{
    clip_stage(points, 0, emit)
}

/// Clip every surface triangle, translated to be relative to `view_origin`.
pub fn clip_sky_triangles<G>(
    geometry: &G,
    view_origin: Vec3,
    bounds: &mut SkyBounds,
) -> Result<(), SkyError>
where
    G: SurfaceTriangles + ?Sized,
{
    for i in 0..geometry.triangle_count() {
        let [a, b, c] = geometry.triangle(i);
        let tri = [a - view_origin, b - view_origin, c - view_origin];
        clip_sky_polygon(&tri, bounds)?;
    }
    Ok(())
}

fn clip_stage<F>(points: &[Vec3], stage: usize, emit: &mut F) -> Result<(), SkyError>
where
    F: FnMut(&[Vec3]),
{
    if points.len() > MAX_CLIP_INPUT_VERTS {
        return Err(SkyError::ClipOverflow {
            points: points.len(),
            capacity: MAX_CLIP_INPUT_VERTS,
        });
    }

    if stage == SKY_CLIP_STAGES {
        emit(points);
        return Ok(());
    }

    let normal = SKY_CLIP_PLANES[stage];
    let n = points.len();
    // One extra slot each for the wrap-around copy of vertex 0.
    let mut dists = [0.0f32; MAX_CLIP_VERTS];
    let mut sides = [PlaneSide::On; MAX_CLIP_VERTS];
    let mut front = false;
    let mut back = false;

    for (i, p) in points.iter().enumerate() {
        let d = p.dot(normal);
        dists[i] = d;
        sides[i] = if d > ON_EPSILON {
            front = true;
            PlaneSide::Front
        } else if d < -ON_EPSILON {
            back = true;
            PlaneSide::Back
        } else {
            PlaneSide::On
        };
    }

    if !front || !back {
        return clip_stage(points, stage + 1, emit);
    }

    dists[n] = dists[0];
    sides[n] = sides[0];

    let mut front_frag = Fragment::new();
    let mut back_frag = Fragment::new();

    for i in 0..n {
        let v = points[i];
        match sides[i] {
            PlaneSide::Front => front_frag.push(v)?,
            PlaneSide::Back => back_frag.push(v)?,
            PlaneSide::On => {
                front_frag.push(v)?;
                back_frag.push(v)?;
            }
        }

        if sides[i] == PlaneSide::On || sides[i + 1] == PlaneSide::On || sides[i] == sides[i + 1] {
            continue;
        }

        let next = points[(i + 1) % n];
        let d = dists[i] / (dists[i] - dists[i + 1]);
        let crossing = v + (next - v) * d;
        front_frag.push(crossing)?;
        back_frag.push(crossing)?;
    }

    clip_stage(front_frag.points(), stage + 1, emit)?;
    clip_stage(back_frag.points(), stage + 1, emit)
}
