use serde::{Deserialize, Serialize};

/// Packing configuration.
/// Key notes:
///   - `min_dimension` is the side every new atlas starts doubling from
///   - `allow_rotation` lets the fill pass place images rotated by 90°
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Smallest atlas side in pixels. Must be a power of two.
    #[serde(default = "default_min_dimension")]
    pub min_dimension: u32,
    /// Allow 90° rotations when the rotated footprint is lower.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            min_dimension: default_min_dimension(),
            allow_rotation: default_allow_rotation(),
        }
    }
}

impl AtlasConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if `min_dimension` is zero or not a power of two.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if self.min_dimension == 0 {
            return Err(AtlasError::InvalidConfig(
                "min_dimension must be positive".into(),
            ));
        }
        if !self.min_dimension.is_power_of_two() {
            return Err(AtlasError::InvalidConfig(format!(
                "min_dimension ({}) is not a power of two",
                self.min_dimension
            )));
        }
        Ok(())
    }
}

fn default_min_dimension() -> u32 {
    512
}
fn default_allow_rotation() -> bool {
    true
}

/// Builder for `AtlasConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    pub fn min_dimension(mut self, v: u32) -> Self {
        self.cfg.min_dimension = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}

impl AtlasConfig {
    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}
