//! Single source of truth for sky tessellation constants.
//! Grid sizes, clip limits and buffer capacities are shared by the
//! clipper, the fillers and the cloud precomputation.

/// Number of grid cells along each edge of a sky face.
pub const SKY_SUBDIVISIONS: usize = 8;

/// Half the subdivision count. Grid indices run from -HALF to +HALF.
pub const HALF_SKY_SUBDIVISIONS: i32 = (SKY_SUBDIVISIONS / 2) as i32;

/// Grid points along each edge of a sky face (SKY_SUBDIVISIONS + 1).
pub const SKY_GRID_SIZE: usize = SKY_SUBDIVISIONS + 1;

/// Number of cube faces the sky is projected onto.
pub const SKY_FACE_COUNT: usize = 6;

/// Faces that carry the cloud layer. The look-down face (index 5) never does.
pub const CLOUD_FACE_COUNT: usize = 5;

/// Number of half-space planes a sky polygon is clipped against.
pub const SKY_CLIP_STAGES: usize = 6;

/// Capacity of a single clip fragment.
pub const MAX_CLIP_VERTS: usize = 64;

/// Largest fragment accepted by the clipper. Leaves room for the two
/// points a convex polygon gains when it crosses one plane.
pub const MAX_CLIP_INPUT_VERTS: usize = MAX_CLIP_VERTS - 2;

/// Signed distance under which a point counts as lying on a clip plane.
pub const ON_EPSILON: f32 = 0.1;

/// Projected depth under which a vertex is left out of the face extents.
pub const PROJECTION_EPSILON: f32 = 0.001;

/// Sentinel for an empty face extent (min side). Max side uses the negation.
pub const EMPTY_EXTENT: f32 = 9999.0;

/// Radius of the world sphere the cloud shell sits on, in world units.
pub const CLOUD_WORLD_RADIUS: f32 = 4096.0;

/// Far clip used to generate the rays for cloud precomputation, so the
/// table does not depend on any particular view.
pub const CLOUD_PRECOMPUTE_Z_FAR: f32 = 1024.0;

/// Texture-coordinate clamp band for the outer skybox pass.
pub const SKYBOX_TEX_CLAMP: (f32, f32) = (0.0, 1.0);

/// Texture-coordinate clamp band for the cloud pass (1/256 .. 255/256).
pub const CLOUD_TEX_CLAMP: (f32, f32) = (1.0 / 256.0, 255.0 / 256.0);

/// Vertex capacity of the shared tessellation buffer.
pub const SHADER_MAX_VERTEXES: usize = 1000;

/// Index capacity of the shared tessellation buffer.
pub const SHADER_MAX_INDEXES: usize = 6 * SHADER_MAX_VERTEXES;

/// Maximum number of stages a sky material may declare.
pub const MAX_SHADER_STAGES: usize = 16;
