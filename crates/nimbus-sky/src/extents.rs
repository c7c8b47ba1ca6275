use glam::{IVec2, Vec2};
use nimbus_core::constants::{EMPTY_EXTENT, HALF_SKY_SUBDIVISIONS, SKY_FACE_COUNT};
use nimbus_core::CubeFace;

/// Inclusive rectangle of subdivision indices on one face, each axis in
/// [-HALF_SKY_SUBDIVISIONS, HALF_SKY_SUBDIVISIONS]. x = s, y = t.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRect {
    pub mins: IVec2,
    pub maxs: IVec2,
}

impl SubRect {
    pub fn new(mins: IVec2, maxs: IVec2) -> Self {
        Self { mins, maxs }
    }

    /// The whole face.
    pub fn full() -> Self {
        Self::new(
            IVec2::splat(-HALF_SKY_SUBDIVISIONS),
            IVec2::splat(HALF_SKY_SUBDIVISIONS),
        )
    }

    /// Grid points along s.
    pub fn width(&self) -> usize {
        (self.maxs.x - self.mins.x + 1) as usize
    }

    /// Grid points along t.
    pub fn height(&self) -> usize {
        (self.maxs.y - self.mins.y + 1) as usize
    }

    /// Number of grid points covered.
    pub fn vertex_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Grid-array rows (t) covered, offset into 0..=SKY_SUBDIVISIONS.
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        (self.mins.y + HALF_SKY_SUBDIVISIONS) as usize..=(self.maxs.y + HALF_SKY_SUBDIVISIONS) as usize
    }

    /// Grid-array columns (s) covered, offset into 0..=SKY_SUBDIVISIONS.
    pub fn columns(&self) -> std::ops::RangeInclusive<usize> {
        (self.mins.x + HALF_SKY_SUBDIVISIONS) as usize..=(self.maxs.x + HALF_SKY_SUBDIVISIONS) as usize
    }
}

/// Per-face (s, t) bounding extents of the visible sky, accumulated while
/// clipping. Reset once per frame, widened by the face classifier, read
/// once by the fillers.
#[derive(Debug, Clone)]
pub struct SkyBounds {
    mins: [Vec2; SKY_FACE_COUNT],
    maxs: [Vec2; SKY_FACE_COUNT],
}

impl Default for SkyBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl SkyBounds {
    /// Bounds with every face empty.
    pub fn new() -> Self {
        Self {
            mins: [Vec2::splat(EMPTY_EXTENT); SKY_FACE_COUNT],
            maxs: [Vec2::splat(-EMPTY_EXTENT); SKY_FACE_COUNT],
        }
    }

    /// Return every face to the empty sentinel.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Grow a face's extent to include `st`.
    #[inline]
    pub fn widen(&mut self, face: CubeFace, st: Vec2) {
        let i = face.index();
        self.mins[i] = self.mins[i].min(st);
        self.maxs[i] = self.maxs[i].max(st);
    }

    pub fn min(&self, face: CubeFace) -> Vec2 {
        self.mins[face.index()]
    }

    pub fn max(&self, face: CubeFace) -> Vec2 {
        self.maxs[face.index()]
    }

    /// True while the face has not been touched since the last clear.
    pub fn is_empty(&self, face: CubeFace) -> bool {
        let (min, max) = (self.min(face), self.max(face));
        min.x > max.x || min.y > max.y
    }

    /// Snap a face's extent outward to the subdivision grid and clamp it
    /// to the grid. Returns None when the snapped extent is empty on
    /// either axis.
    pub fn quantize(&self, face: CubeFace) -> Option<SubRect> {
        let half = HALF_SKY_SUBDIVISIONS as f32;
        let min = (self.min(face) * half).floor();
        let max = (self.max(face) * half).ceil();

        if min.x >= max.x || min.y >= max.y {
            return None;
        }

        let lo = IVec2::splat(-HALF_SKY_SUBDIVISIONS);
        let hi = IVec2::splat(HALF_SKY_SUBDIVISIONS);
        Some(SubRect::new(
            min.as_ivec2().clamp(lo, hi),
            max.as_ivec2().clamp(lo, hi),
        ))
    }
}
