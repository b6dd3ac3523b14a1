//! Unit conversions.

/// Cubic millimeters per cubic centimeter.
pub const MM3_PER_CM3: f64 = 1000.0;

/// Minor currency units per major unit.
pub const MINOR_PER_MAJOR: u64 = 100;

/// Convert mm³ to cm³.
pub fn mm3_to_cm3(mm3: f64) -> f64 {
    mm3 / MM3_PER_CM3
}

/// Wall thickness in mm laid down by `loops` perimeters of a nozzle.
pub fn wall_thickness(nozzle_diameter: f64, loops: u32) -> f64 {
    loops as f64 * nozzle_diameter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm3_to_cm3() {
        assert_eq!(mm3_to_cm3(1000.0), 1.0);
        assert_eq!(mm3_to_cm3(0.0), 0.0);
    }

    #[test]
    fn test_wall_thickness() {
        assert_eq!(wall_thickness(0.4, 2), 0.8);
        assert_eq!(wall_thickness(0.4, 0), 0.0);
    }
}
