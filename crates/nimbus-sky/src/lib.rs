pub mod backend;
pub mod classify;
pub mod clip;
pub mod clouds;
pub mod extents;
pub mod fill;
pub mod iterator;
pub mod material;
pub mod sky_vec;
pub mod tess;

pub use backend::{BackendCall, DepthRange, RecordingBackend, SkyBackend, StagePath};
pub use clouds::{CloudLayer, CloudTexCoords};
pub use extents::{SkyBounds, SubRect};
pub use iterator::{SkyPass, SkyPassReport, SkySurface, SkyView};
pub use material::{load_sky_material_from_str, prepare_sky_material, LoadError, PreparedSky};
pub use tess::{SkyVertex, SurfaceTriangles, TessBuffer};
