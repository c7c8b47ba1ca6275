use glam::{Vec2, Vec3};

/// One of the 6 cube-map faces the sky dome is parametrized on.
/// Discriminants are the face indices used by every per-face table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CubeFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    /// Looking straight up.
    PosZ = 4,
    /// Looking straight down. Never carries clouds.
    NegZ = 5,
}

/// All 6 faces in index order.
pub const ALL_FACES: [CubeFace; 6] = [
    CubeFace::PosX,
    CubeFace::NegX,
    CubeFace::PosY,
    CubeFace::NegY,
    CubeFace::PosZ,
    CubeFace::NegZ,
];

/// Clip plane normals applied in stage order. Every plane passes through
/// the view origin; together they split space into the 6 face pyramids.
pub const SKY_CLIP_PLANES: [Vec3; 6] = [
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 1.0),
];

/// Vector component selected by a signed 1-based code: `k` picks component
/// `|k| - 1` and negates it when `k < 0`.
type AxisCode = i8;

/// Per face: the codes yielding (s, t, depth) from a view-relative vector.
const VEC_TO_ST: [[AxisCode; 3]; 6] = [
    [-2, 3, 1],
    [2, 3, -1],
    [1, 3, 2],
    [-1, 3, -2],
    [-2, -1, 3],
    [-2, 1, -3],
];

/// Per face: the codes yielding (x, y, z) from the scaled (s, t, 1) vector.
const ST_TO_VEC: [[AxisCode; 3]; 6] = [
    [3, -1, 2],
    [-3, 1, 2],
    [1, 3, 2],
    [-1, -3, 2],
    [-2, -1, 3],
    [2, -1, -3],
];

#[inline]
fn signed_component(v: Vec3, code: AxisCode) -> f32 {
    let value = v[(code.unsigned_abs() - 1) as usize];
    if code < 0 {
        -value
    } else {
        value
    }
}

impl CubeFace {
    /// Face index in 0..6.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a face by index. Returns None outside 0..6.
    pub fn from_index(index: usize) -> Option<Self> {
        ALL_FACES.get(index).copied()
    }

    /// Pick the face a direction points at: the dominant axis of `v` by
    /// magnitude, with x winning only when strictly larger than both
    /// others, then y when strictly larger than z, else z.
    pub fn from_direction(v: Vec3) -> Self {
        let av = v.abs();
        if av.x > av.y && av.x > av.z {
            if v.x < 0.0 {
                CubeFace::NegX
            } else {
                CubeFace::PosX
            }
        } else if av.y > av.z && av.y > av.x {
            if v.y < 0.0 {
                CubeFace::NegY
            } else {
                CubeFace::PosY
            }
        } else if v.z < 0.0 {
            CubeFace::NegZ
        } else {
            CubeFace::PosZ
        }
    }

    /// Depth of `v` along this face's outward axis.
    #[inline]
    pub fn depth(self, v: Vec3) -> f32 {
        signed_component(v, VEC_TO_ST[self.index()][2])
    }

    /// Project `v` onto this face's (s, t) plane, dividing by `depth`.
    #[inline]
    pub fn project(self, v: Vec3, depth: f32) -> Vec2 {
        let codes = VEC_TO_ST[self.index()];
        Vec2::new(
            signed_component(v, codes[0]) / depth,
            signed_component(v, codes[1]) / depth,
        )
    }

    /// Map a face-local (s, t, 1) vector, already scaled, to world axes.
    #[inline]
    pub fn unproject(self, b: Vec3) -> Vec3 {
        let codes = ST_TO_VEC[self.index()];
        Vec3::new(
            signed_component(b, codes[0]),
            signed_component(b, codes[1]),
            signed_component(b, codes[2]),
        )
    }

    /// Whether the cloud layer is ever drawn on this face.
    pub fn carries_clouds(self) -> bool {
        self != CubeFace::NegZ
    }
}
