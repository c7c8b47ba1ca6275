pub mod constants;
pub mod error;
pub mod face;
pub mod material;
pub mod math;

pub use error::SkyError;
pub use face::{CubeFace, ALL_FACES, SKY_CLIP_PLANES};
pub use material::{OuterBox, SkyMaterial, SkyStage};
