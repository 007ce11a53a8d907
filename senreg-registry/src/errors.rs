//! Registry-level errors
//!
//! Record-level failures from the core are wrapped with the ID of the sensor
//! they belong to, so a report over a whole registry stays readable.

use senreg_core::{ConversionError, SensorError, ValueParseError};
use thiserror_no_std::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry operation failed
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Registry document is not valid JSON or not a list of sensors
    #[error("failed to parse registry document: {0}")]
    Json(#[from] serde_json::Error),

    /// Registry document could not be read
    #[error("failed to read registry document: {0}")]
    Io(#[from] std::io::Error),

    /// Sensor record failed validation
    #[error("sensor {id}: {source}")]
    InvalidSensor {
        /// Sensor ID as authored
        id: u32,
        /// Violated invariant
        source: SensorError,
    },

    /// Sensor formula failed to compile or evaluate
    #[error("sensor {id}: {source}")]
    Conversion {
        /// Sensor ID
        id: u32,
        /// Conversion failure
        source: ConversionError,
    },

    /// Two records share an ID
    #[error("sensor ID {0} defined more than once")]
    DuplicateSensorId(u32),

    /// Two records share a symbol, which would collide in generated code
    #[error("symbol '{symbol}' used by sensors {first} and {second}")]
    DuplicateSymbol {
        /// Shared symbol
        symbol: String,
        /// Sensor that already owns the symbol
        first: u32,
        /// Sensor that tried to reuse it
        second: u32,
    },

    /// Example value cannot be read as the sensor's type
    #[error("sensor {id}: example {index}: {source}")]
    InvalidExample {
        /// Sensor ID
        id: u32,
        /// Position in the example arrays
        index: usize,
        /// Parse failure
        source: ValueParseError,
    },

    /// Formula output disagrees with the documented converted example
    #[error("sensor {id}: example {index}: '{raw}' converts to {actual}, documented as {expected}")]
    ExampleMismatch {
        /// Sensor ID
        id: u32,
        /// Position in the example arrays
        index: usize,
        /// Raw example value
        raw: String,
        /// Documented converted value
        expected: String,
        /// Value the formula produced
        actual: String,
    },

    /// No sensor with this ID
    #[error("unknown sensor ID {0}")]
    UnknownSensor(u32),

    /// A newer registry dropped an ID. IDs are append-only.
    #[error("sensor ID {0} was removed; mark it obsolete instead")]
    SensorRemoved(u32),

    /// A newer registry changed what an existing ID emits
    #[error("sensor {id} changed type from '{previous}' to '{current}'")]
    TypeChanged {
        /// Sensor ID
        id: u32,
        /// Type in the older registry
        previous: String,
        /// Type in the newer registry
        current: String,
    },
}

impl RegistryError {
    /// Errors that break registry-wide uniqueness and can never be skipped
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RegistryError::Json(_) | RegistryError::Io(_) | RegistryError::DuplicateSensorId(_)
        )
    }
}
