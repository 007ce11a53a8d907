//! Core of the SenReg sensor registry
//!
//! Validates sensor metadata records and compiles their unit-conversion
//! formulas into typed, reusable evaluators.
//!
//! Key properties:
//! - Pure functions only: no I/O, no logging, no global state
//! - Every failure is a typed error value, never a panic
//! - Compiled conversions are immutable and `Send + Sync`
//!
//! ```rust
//! use senreg_core::{Sensor, Unit, Value};
//!
//! let mut sensor = Sensor::new(3, "abc123_noise", "int16");
//! sensor.unit = "dBFS".to_string();
//! sensor.unit_conversion = "(20 * log10(abs(v)+1)) / 32767".to_string();
//!
//! // Validates the record, then compiles the formula for int16 inputs
//! let unit = Unit::from_sensor(&sensor)?;
//!
//! match unit.convert(1000i16)? {
//!     Value::F64(dbfs) => assert!(dbfs.is_finite()),
//!     other => unreachable!("numeric formulas return f64, got {other:?}"),
//! }
//! # Ok::<(), senreg_core::ConversionError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod convert;
pub mod datatype;
pub mod errors;
pub mod sensor;
pub mod value;

// Public API
pub use convert::{Unit, IDENTITY_FORMULA};
pub use datatype::{DataType, UnknownDataType};
pub use errors::{
    ConversionError, ConversionResult, ParseError, ParseErrorKind, SensorError, SensorResult,
    ValueParseError,
};
pub use sensor::{is_valid_symbol, Sensor};
pub use value::Value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
