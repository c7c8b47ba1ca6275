use nimbus_core::constants::MAX_SHADER_STAGES;
use nimbus_core::{SkyError, SkyMaterial};
use thiserror::Error;

use crate::clouds::{CloudLayer, CloudTexCoords};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse sky material RON: {0}")]
    ParseError(String),
    #[error("Material '{0}' is not marked as a sky material")]
    NotSky(String),
    #[error("Sky material '{name}' has invalid cloud height {value}")]
    NegativeCloudHeight { name: String, value: f32 },
    #[error("Sky material '{name}' has {count} stages, max is {max}")]
    TooManyStages {
        name: String,
        count: usize,
        max: usize,
    },
    #[error(transparent)]
    Sky(#[from] SkyError),
}

/// Parse a single sky material from a RON string and validate it.
pub fn load_sky_material_from_str(ron_str: &str) -> Result<SkyMaterial, LoadError> {
    let options = ron::Options::default();
    let material: SkyMaterial = options
        .from_str(ron_str)
        .map_err(|e| LoadError::ParseError(e.to_string()))?;
    validate_sky_material(&material)?;
    Ok(material)
}

/// Check a material can drive a sky pass.
pub fn validate_sky_material(material: &SkyMaterial) -> Result<(), LoadError> {
    if !material.is_sky {
        return Err(LoadError::NotSky(material.name.clone()));
    }
    if !material.cloud_height.is_finite() || material.cloud_height < 0.0 {
        return Err(LoadError::NegativeCloudHeight {
            name: material.name.clone(),
            value: material.cloud_height,
        });
    }
    if material.stages.len() > MAX_SHADER_STAGES {
        return Err(LoadError::TooManyStages {
            name: material.name.clone(),
            count: material.stages.len(),
            max: MAX_SHADER_STAGES,
        });
    }
    Ok(())
}

/// Parse, validate and precompute the cloud table for a sky material.
pub fn prepare_sky_material(ron_str: &str) -> Result<PreparedSky, LoadError> {
    let material = load_sky_material_from_str(ron_str)?;
    Ok(PreparedSky::new(material)?)
}

/// A sky material together with the cloud table for its current height.
#[derive(Debug, Clone)]
pub struct PreparedSky {
    material: SkyMaterial,
    clouds: CloudLayer,
}

impl PreparedSky {
    pub fn new(material: SkyMaterial) -> Result<Self, SkyError> {
        let mut sky = Self {
            material,
            clouds: CloudLayer::new(),
        };
        let height = sky.material.cloud_height;
        sky.set_cloud_height(height)?;
        Ok(sky)
    }

    pub fn material(&self) -> &SkyMaterial {
        &self.material
    }

    /// Cloud table, present whenever the cloud height is non-zero.
    pub fn clouds(&self) -> Option<&CloudTexCoords> {
        if self.material.cloud_height == 0.0 {
            return None;
        }
        self.clouds.table()
    }

    /// Change the cloud height, rebuilding the table if it differs.
    /// A height of 0 disables the cloud layer.
    pub fn set_cloud_height(&mut self, height: f32) -> Result<(), SkyError> {
        if height != 0.0 {
            self.clouds.ensure_height(height)?;
        }
        self.material.cloud_height = height;
        Ok(())
    }
}
