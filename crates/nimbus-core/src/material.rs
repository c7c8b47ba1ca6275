use serde::{Deserialize, Serialize};

/// Outer skybox texture of a sky material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OuterBox {
    /// No outer box configured.
    #[default]
    Absent,
    /// The renderer's black placeholder cube. Never drawn.
    Black,
    /// A cube texture, by name.
    Cube(String),
}

impl OuterBox {
    /// Texture name to bind, if this box should be drawn at all.
    pub fn drawable(&self) -> Option<&str> {
        match self {
            OuterBox::Cube(name) => Some(name.as_str()),
            OuterBox::Absent | OuterBox::Black => None,
        }
    }
}

/// One rendering stage of a sky material. Each stage draws the cloud layer
/// once with its own texture; all stages share the same vertex layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyStage {
    /// Texture name bound for this stage.
    pub map: String,
}

/// A sky material definition loaded from RON data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyMaterial {
    /// Material name, used in log output.
    pub name: String,
    /// Marks the material as a sky surface. Non-sky materials are rejected.
    #[serde(default)]
    pub is_sky: bool,
    /// Outer box drawn behind the clouds.
    #[serde(default)]
    pub outer_box: OuterBox,
    /// Height of the cloud shell above the world sphere. 0 disables clouds.
    #[serde(default)]
    pub cloud_height: f32,
    /// Ordered stages; the count drives repeated cloud fills.
    #[serde(default)]
    pub stages: Vec<SkyStage>,
}

impl SkyMaterial {
    /// Whether this material draws a cloud layer at all.
    pub fn has_clouds(&self) -> bool {
        self.cloud_height != 0.0 && !self.stages.is_empty()
    }
}
