//! Print profile: material, shell and pricing parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CostError, Result};
use crate::units::wall_thickness;

/// Filament material, identified by its density.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "MaterialRepr", into = "MaterialRepr")]
pub enum Material {
    /// Polylactic acid, 1.24 g/cm³.
    #[default]
    Pla,
    /// Acrylonitrile butadiene styrene, 1.04 g/cm³.
    Abs,
    /// Polyethylene terephthalate glycol, 1.27 g/cm³.
    Petg,
    /// Any other filament, by density in g/cm³.
    Custom(f64),
}

impl Material {
    /// Filament density in g/cm³.
    pub fn density(&self) -> f64 {
        match self {
            Material::Pla => 1.24,
            Material::Abs => 1.04,
            Material::Petg => 1.27,
            Material::Custom(d) => *d,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Pla => f.write_str("pla"),
            Material::Abs => f.write_str("abs"),
            Material::Petg => f.write_str("petg"),
            Material::Custom(d) => write!(f, "{d}"),
        }
    }
}

impl FromStr for Material {
    type Err = CostError;

    /// Accepts a preset name (case-insensitive) or a density in g/cm³.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "pla" => Ok(Material::Pla),
            "abs" => Ok(Material::Abs),
            "petg" => Ok(Material::Petg),
            _ => s
                .parse::<f64>()
                .map(Material::Custom)
                .map_err(|_| CostError::invalid("material", format!("unknown material `{s}`"))),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MaterialRepr {
    Density(f64),
    Name(String),
}

impl TryFrom<MaterialRepr> for Material {
    type Error = CostError;

    fn try_from(repr: MaterialRepr) -> Result<Self> {
        match repr {
            MaterialRepr::Density(d) => Ok(Material::Custom(d)),
            MaterialRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Material> for MaterialRepr {
    fn from(material: Material) -> Self {
        match material {
            Material::Custom(d) => MaterialRepr::Density(d),
            preset => MaterialRepr::Name(preset.to_string()),
        }
    }
}

/// Which estimation formula to apply.
///
/// Both are historical pricing policies and give different numbers for the
/// same mesh; neither is more correct than the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileModel {
    /// Infill plus walls.
    #[default]
    Simple,
    /// Infill plus walls plus top/bottom shells.
    ShellAware,
}

impl fmt::Display for ProfileModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileModel::Simple => f.write_str("simple"),
            ProfileModel::ShellAware => f.write_str("shell-aware"),
        }
    }
}

impl FromStr for ProfileModel {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" | "a" => Ok(ProfileModel::Simple),
            "shell-aware" | "shell_aware" | "shell" | "b" => Ok(ProfileModel::ShellAware),
            other => Err(CostError::invalid(
                "model",
                format!("unknown model `{other}`, expected `simple` or `shell-aware`"),
            )),
        }
    }
}

/// Parameters of a cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintProfile {
    /// Estimation formula.
    pub model: ProfileModel,
    /// Infill density in percent (0 to 100).
    pub infill_density: f64,
    /// Wall thickness (mm).
    pub wall_thickness: f64,
    /// Top/bottom shell thickness (mm).
    pub top_bottom_thickness: f64,
    /// Layer height (mm).
    pub layer_height: f64,
    /// Filament density (g/cm³).
    pub filament_density: f64,
    /// Price per gram in minor currency units.
    pub price_per_gram: f64,
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self {
            model: ProfileModel::Simple,
            infill_density: 15.0,
            wall_thickness: wall_thickness(0.4, 2),
            top_bottom_thickness: 0.8,
            layer_height: 0.2,
            filament_density: Material::Pla.density(),
            price_per_gram: 5.0,
        }
    }
}

impl PrintProfile {
    /// Use the density of `material`.
    pub fn with_material(mut self, material: Material) -> Self {
        self.filament_density = material.density();
        self
    }

    /// Use the given estimation formula.
    pub fn with_model(mut self, model: ProfileModel) -> Self {
        self.model = model;
        self
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.infill_density.is_finite() || !(0.0..=100.0).contains(&self.infill_density) {
            return Err(CostError::invalid(
                "infill_density",
                format!("{} is not between 0 and 100", self.infill_density),
            ));
        }
        non_negative("wall_thickness", self.wall_thickness)?;
        non_negative("top_bottom_thickness", self.top_bottom_thickness)?;
        non_negative("layer_height", self.layer_height)?;
        non_negative("filament_density", self.filament_density)?;
        non_negative("price_per_gram", self.price_per_gram)?;
        Ok(())
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CostError::invalid(name, format!("{value} is not finite")));
    }
    if value < 0.0 {
        return Err(CostError::invalid(name, format!("{value} is negative")));
    }
    Ok(())
}
