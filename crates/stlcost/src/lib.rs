#![warn(missing_docs)]

//! Filament cost estimation for 3D prints from binary STL meshes.
//!
//! Decoding and estimation are pure, synchronous functions: the decoder
//! turns a binary STL buffer into an enclosed volume and the estimator turns
//! a volume and a [`PrintProfile`] into a [`UsageBreakdown`]. Neither knows
//! about the other.
//!
//! # Example
//!
//! ```
//! use stlcost::{cube_triangles, decode_volume, estimate, stl, PrintProfile};
//!
//! let bytes = stl::to_bytes("cube", &cube_triangles([0.0; 3], 10.0));
//! let volume = decode_volume(&bytes)?;
//! let usage = estimate(volume, &PrintProfile::default())?;
//!
//! assert_eq!(usage.price.to_string(), "$0.06");
//! # Ok::<(), stlcost::CostError>(())
//! ```

pub mod config;
pub mod error;
pub mod estimate;
pub mod geometry;
pub mod price;
pub mod profile;
pub mod stl;
pub mod units;

pub use config::{Config, ConfigError, PricingConfig, ProfileConfig, ServerConfig};
pub use error::{CostError, ErrorKind, Result};
pub use estimate::{estimate, UsageBreakdown};
pub use geometry::{cube_triangles, Bounds, Triangle};
pub use price::Price;
pub use profile::{Material, PrintProfile, ProfileModel};
pub use stl::{decode_volume, read_header, read_triangles, StlHeader};

/// Decode a binary STL buffer and estimate its cost in one step.
pub fn quote(buffer: &[u8], profile: &PrintProfile) -> Result<UsageBreakdown> {
    let volume = decode_volume(buffer)?;
    estimate(volume, profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_unit_cube() {
        let bytes = stl::to_bytes("cube", &cube_triangles([0.0, 0.0, 0.0], 10.0));
        let usage = quote(&bytes, &PrintProfile::default()).unwrap();
        assert!((usage.mesh_volume - 1.0).abs() < 1e-9);
        assert!((usage.infill_volume - 0.15).abs() < 1e-9);
        assert!((usage.wall_volume - 0.8).abs() < 1e-9);
        assert!((usage.total_volume - 0.95).abs() < 1e-9);
        assert!((usage.total_weight - 1.178).abs() < 1e-9);
        assert_eq!(usage.price.to_string(), "$0.06");
    }

    #[test]
    fn test_quote_propagates_errors() {
        assert_eq!(
            quote(&[0u8; 10], &PrintProfile::default()).unwrap_err().kind(),
            ErrorKind::MalformedInput
        );

        let bytes = stl::to_bytes("cube", &cube_triangles([0.0, 0.0, 0.0], 10.0));
        let profile = PrintProfile {
            infill_density: 150.0,
            ..Default::default()
        };
        assert_eq!(
            quote(&bytes, &profile).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_quote_price_overflow() {
        let tri = Triangle::new([1e12, 0.0, 0.0], [0.0, 1e12, 0.0], [0.0, 0.0, 1e12]);
        let bytes = stl::to_bytes("huge", &[tri]);
        let volume = decode_volume(&bytes).unwrap();
        assert!(volume.is_finite());

        let err = quote(&bytes, &PrintProfile::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(matches!(
            err,
            CostError::InvalidParameter {
                name: "price_per_gram",
                ..
            }
        ));
    }

    #[test]
    fn test_breakdown_serializes() {
        let usage = estimate(2.0, &PrintProfile::default()).unwrap();
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["model"], "simple");
        assert!(json["total_weight"].is_number());
    }
}
