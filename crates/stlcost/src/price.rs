//! Rounded monetary amounts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::MINOR_PER_MAJOR;

/// A price rounded to whole minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Price {
    minor_units: u64,
}

impl Price {
    /// Price from an exact number of minor units.
    pub fn from_minor_units(minor_units: u64) -> Self {
        Self { minor_units }
    }

    /// Round a non-negative amount of minor units half-up.
    ///
    /// Returns `None` for negative or non-finite amounts and for amounts
    /// that do not fit in `u64`.
    pub fn round_minor_units(amount: f64) -> Option<Self> {
        let rounded = amount.round();
        if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
            return None;
        }
        Some(Self {
            minor_units: rounded as u64,
        })
    }

    /// Whole minor units.
    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    /// Amount in major units (dollars).
    pub fn major(&self) -> f64 {
        self.minor_units as f64 / MINOR_PER_MAJOR as f64
    }

    /// Format with a currency symbol and two decimals, e.g. `€12.05`.
    pub fn format_with(&self, symbol: &str) -> String {
        format!(
            "{symbol}{}.{:02}",
            self.minor_units / MINOR_PER_MAJOR,
            self.minor_units % MINOR_PER_MAJOR
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(Price::round_minor_units(5.89).unwrap().minor_units(), 6);
        assert_eq!(Price::round_minor_units(5.5).unwrap().minor_units(), 6);
        assert_eq!(Price::round_minor_units(5.49).unwrap().minor_units(), 5);
        assert_eq!(Price::round_minor_units(0.0).unwrap().minor_units(), 0);
    }

    #[test]
    fn test_half_cent_rounds_up() {
        assert_eq!(Price::round_minor_units(14.5).unwrap().to_string(), "$0.15");
        assert_eq!(Price::round_minor_units(100.5).unwrap().to_string(), "$1.01");
        assert_eq!(Price::round_minor_units(267.5).unwrap().to_string(), "$2.68");
    }

    #[test]
    fn test_unrepresentable_amounts() {
        assert!(Price::round_minor_units(-3.0).is_none());
        assert!(Price::round_minor_units(f64::NAN).is_none());
        assert!(Price::round_minor_units(f64::INFINITY).is_none());
        assert!(Price::round_minor_units(u64::MAX as f64).is_none());
        assert!(Price::round_minor_units(1.55e32).is_none());
        assert!(Price::round_minor_units(1.0e18).is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_minor_units(6).to_string(), "$0.06");
        assert_eq!(Price::from_minor_units(1205).to_string(), "$12.05");
        assert_eq!(Price::from_minor_units(0).to_string(), "$0.00");
        assert_eq!(Price::from_minor_units(100).format_with("€"), "€1.00");
    }

    #[test]
    fn test_major() {
        assert_eq!(Price::from_minor_units(250).major(), 2.5);
    }
}
