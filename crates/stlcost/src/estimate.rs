//! Filament usage and cost estimation.
//!
//! The formulas are engineering heuristics, not a model of real slicer
//! geometry: wall volume is thickness times `volume^(2/3)` and the
//! top/bottom footprint is `cbrt(6 × volume)`. They are kept exactly as
//! published so that prices stay reproducible.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CostError, Result};
use crate::price::Price;
use crate::profile::{non_negative, PrintProfile, ProfileModel};

/// Number of solid infill layers printed under each top/bottom shell.
const SOLID_LAYERS_UNDER_SHELL: f64 = 2.0;

/// Volume, weight and price of a print, by component.
///
/// Volumes are in cm³, weights in grams. For [`ProfileModel::Simple`] the
/// top/bottom components are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageBreakdown {
    /// Formula that produced this breakdown.
    pub model: ProfileModel,
    /// Enclosed mesh volume the estimate is based on (cm³).
    pub mesh_volume: f64,
    /// Perimeter wall volume (cm³).
    pub wall_volume: f64,
    /// Perimeter wall weight (g).
    pub wall_weight: f64,
    /// Top/bottom shell volume (cm³).
    pub top_bottom_volume: f64,
    /// Top/bottom shell weight (g).
    pub top_bottom_weight: f64,
    /// Infill volume (cm³).
    pub infill_volume: f64,
    /// Infill weight (g).
    pub infill_weight: f64,
    /// Total filament volume (cm³).
    pub total_volume: f64,
    /// Total filament weight (g).
    pub total_weight: f64,
    /// Price rounded to whole minor units.
    pub price: Price,
}

/// Estimate filament usage and price for a solid of `volume_cm3`.
///
/// # Errors
///
/// Returns [`CostError::InvalidParameter`] if the profile fails
/// [`PrintProfile::validate`], if the volume is negative or non-finite, or
/// if the resulting weight or price overflows.
pub fn estimate(volume_cm3: f64, profile: &PrintProfile) -> Result<UsageBreakdown> {
    non_negative("volume", volume_cm3)?;
    profile.validate()?;

    let density = profile.filament_density;

    let infill_volume = volume_cm3 * (profile.infill_density / 100.0);
    let wall_volume = profile.wall_thickness * volume_cm3.powf(2.0 / 3.0);

    let (top_bottom_volume, total_volume) = match profile.model {
        ProfileModel::Simple => (0.0, infill_volume + wall_volume),
        ProfileModel::ShellAware => {
            let footprint = (volume_cm3 * 6.0).cbrt();
            let outer_shell = footprint * profile.layer_height / 10.0;
            let inner_shell = footprint * SOLID_LAYERS_UNDER_SHELL * profile.layer_height / 10.0;
            let top_bottom = outer_shell + inner_shell;
            (top_bottom, wall_volume + top_bottom + infill_volume)
        }
    };

    let total_weight = total_volume * density;
    if !total_weight.is_finite() {
        return Err(CostError::invalid("volume", "estimated weight overflows"));
    }

    let price = Price::round_minor_units(total_weight * profile.price_per_gram)
        .ok_or_else(|| CostError::invalid("price_per_gram", "estimated price overflows"))?;

    debug!(
        model = %profile.model,
        volume_cm3,
        total_weight,
        price = %price,
        "estimated filament usage"
    );

    Ok(UsageBreakdown {
        model: profile.model,
        mesh_volume: volume_cm3,
        wall_volume,
        wall_weight: wall_volume * density,
        top_bottom_volume,
        top_bottom_weight: top_bottom_volume * density,
        infill_volume,
        infill_weight: infill_volume * density,
        total_volume,
        total_weight,
        price,
    })
}
