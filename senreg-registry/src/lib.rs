//! SenReg registry
//!
//! Loads a registry document (a JSON array of sensor records), validates
//! each record with `senreg-core`, and enforces the invariants that span
//! records: unique IDs, unique symbols, append-only evolution.
//!
//! ## Loading
//!
//! ```rust
//! use senreg_registry::{LoadOptions, SensorRegistry};
//! use senreg_core::Value;
//!
//! let json = r#"[
//!     {"sensorId": 1, "symbol": "abc123_temperature", "type": "int16",
//!      "unit": "C", "referenceUnit": "v / 10",
//!      "exampleValues": ["100"], "exampleConverted": ["10"]}
//! ]"#;
//!
//! let (registry, report) = SensorRegistry::from_json_str(json, &LoadOptions::strict())?;
//! assert!(report.is_clean());
//!
//! let table = registry.conversions();
//! assert_eq!(table.convert(1, 215i16)?, Value::F64(21.5));
//! # Ok::<(), senreg_registry::RegistryError>(())
//! ```
//!
//! ## Failure policy
//!
//! [`LoadPolicy::Strict`] aborts on the first bad record.
//! [`LoadPolicy::SkipInvalid`] logs bad records through the `log` facade,
//! collects them in the [`LoadReport`], and keeps loading. Duplicate IDs
//! abort under either policy.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod errors;
pub mod registry;
pub mod table;
pub mod verify;

// Public API
pub use config::{LoadOptions, LoadPolicy, DEFAULT_EXAMPLE_TOLERANCE};
pub use errors::{RegistryError, RegistryResult};
pub use registry::{LoadReport, SensorRegistry};
pub use table::ConversionTable;
pub use verify::verify_examples;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConversionTable>();
        assert_send_sync::<SensorRegistry>();
    }
}
