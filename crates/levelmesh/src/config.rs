//! Configuration for the level geometry pipeline

use serde::{Deserialize, Serialize};

/// Up-scale factor applied before handing coordinates to the polygon
/// clipper. Results are divided by the same factor on the way out.
pub const DEFAULT_CLIP_SCALE: f32 = 1024.0;

/// Configuration parameters for the polygon pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The maximum number of vertices allowed for polygons produced by
    /// the convex mesh builder
    pub max_verts_per_poly: usize,

    /// Translation applied to world x coordinates before quantizing into
    /// the mesh's 16-bit coordinate space
    pub offset_x: i32,
    /// Translation applied to world y coordinates before quantizing into
    /// the mesh's 16-bit coordinate space
    pub offset_y: i32,

    /// Fixed-point up-scale factor for the boolean/offset stage
    pub clip_scale: f32,

    /// Distance tolerance used by "close enough" point comparisons
    pub weld_epsilon: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_verts_per_poly: 6,
            offset_x: 0,
            offset_y: 0,
            clip_scale: DEFAULT_CLIP_SCALE,
            weld_epsilon: 0.001,
        }
    }
}

impl PipelineConfig {
    /// Creates a new PipelineConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> levelmesh_common::Result<()> {
        use levelmesh_common::Error;

        if self.max_verts_per_poly < 3 {
            return Err(Error::InvalidGeometry(
                "Too few vertices per polygon".to_string(),
            ));
        }

        if self.clip_scale <= 0.0 {
            return Err(Error::InvalidGeometry("Invalid clip scale".to_string()));
        }

        if self.weld_epsilon < 0.0 {
            return Err(Error::InvalidGeometry("Invalid weld epsilon".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_verts_per_poly, 6);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = PipelineConfig::default();
        config.max_verts_per_poly = 2;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.clip_scale = 0.0;
        assert!(config.validate().is_err());
    }
}
