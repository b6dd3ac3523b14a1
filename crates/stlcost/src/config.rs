//! Pricing policy and default print profile, loaded from TOML.
//!
//! ```toml
//! [pricing]
//! price_per_gram = 5.0
//! currency_symbol = "$"
//!
//! [profile]
//! model = "simple"
//! infill_density = 15.0
//! material = "pla"
//! wall_loops = 2
//! nozzle_diameter = 0.4
//! top_bottom_thickness = 0.8
//! layer_height = 0.2
//!
//! [server]
//! bind = "0.0.0.0:3000"
//! max_upload_bytes = 10485760
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::price::Price;
use crate::profile::{Material, PrintProfile, ProfileModel};
use crate::units::wall_thickness;

/// Errors from loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for [`Config`].
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pricing policy.
    pub pricing: PricingConfig,
    /// Default print profile.
    pub profile: ProfileConfig,
    /// HTTP service settings.
    pub server: ServerConfig,
}

/// Pricing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Price per gram of filament, in minor currency units.
    pub price_per_gram: f64,
    /// Symbol prefixed to formatted prices.
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_gram: 5.0,
            currency_symbol: "$".into(),
        }
    }
}

impl PricingConfig {
    /// Format a price with the configured currency symbol.
    pub fn format(&self, price: Price) -> String {
        price.format_with(&self.currency_symbol)
    }
}

/// Default print profile, in the units a user would configure it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Estimation formula.
    pub model: ProfileModel,
    /// Infill density in percent.
    pub infill_density: f64,
    /// Filament material.
    pub material: Material,
    /// Number of perimeter loops.
    pub wall_loops: u32,
    /// Nozzle diameter (mm).
    pub nozzle_diameter: f64,
    /// Top/bottom shell thickness (mm).
    pub top_bottom_thickness: f64,
    /// Layer height (mm).
    pub layer_height: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            model: ProfileModel::Simple,
            infill_density: 15.0,
            material: Material::Pla,
            wall_loops: 2,
            nozzle_diameter: 0.4,
            top_bottom_thickness: 0.8,
            layer_height: 0.2,
        }
    }
}

/// HTTP service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".into(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The default print profile with the configured price.
    ///
    /// The profile is not validated here; [`crate::estimate`] does that.
    pub fn print_profile(&self) -> PrintProfile {
        let p = &self.profile;
        PrintProfile {
            model: p.model,
            infill_density: p.infill_density,
            wall_thickness: wall_thickness(p.nozzle_diameter, p.wall_loops),
            top_bottom_thickness: p.top_bottom_thickness,
            layer_height: p.layer_height,
            filament_density: p.material.density(),
            price_per_gram: self.pricing.price_per_gram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_matches_default_profile() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.print_profile(), PrintProfile::default());
        assert_eq!(config.server.max_upload_bytes, 10_485_760);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str(
            r#"
            [pricing]
            price_per_gram = 8.5
            currency_symbol = "€"

            [profile]
            model = "shell-aware"
            material = "petg"
            wall_loops = 3
            "#,
        )
        .unwrap();

        let profile = config.print_profile();
        assert_eq!(profile.model, ProfileModel::ShellAware);
        assert_eq!(profile.filament_density, 1.27);
        assert_eq!(profile.price_per_gram, 8.5);
        assert_eq!(profile.infill_density, 15.0);
        assert!((profile.wall_thickness - 1.2).abs() < 1e-12);
        assert_eq!(config.pricing.format(Price::from_minor_units(199)), "€1.99");
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_numeric_material() {
        let config = Config::from_toml_str("[profile]\nmaterial = 1.1\n").unwrap();
        assert_eq!(config.profile.material, Material::Custom(1.1));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_toml_str("[profile]\nmodel = \"fancy\"\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[profile]\nmaterial = \"wood\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/stlcost.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
