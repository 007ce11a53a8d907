//! Error types for sensor validation and unit conversion
//!
//! Every failure is a typed value compared by kind, never a shared sentinel
//! compared by identity:
//!
//! ```rust
//! use senreg_core::{Sensor, SensorError};
//!
//! let sensor = Sensor::new(0, "ambient_temperature", "int16");
//! assert!(matches!(sensor.validate(), Err(SensorError::SensorIdZero)));
//! ```
//!
//! ## Error categories
//!
//! ### Record violations ([`SensorError`])
//! Terminal for that one record. The caller decides whether a bad record
//! rejects a whole registry load or only flags the entry.
//!
//! ### Formula failures ([`ConversionError`], construction)
//! `UnknownInputType` and `Parse` mean no [`Unit`](crate::Unit) exists. A
//! malformed formula never yields a usable conversion.
//!
//! ### Evaluation failures ([`ConversionError`], per call)
//! `TypeMismatch`, `WrongParamCount`, `WrongParamType` and `InvalidOperand`
//! concern a single call. The unit stays valid for the next well-typed value.

use thiserror_no_std::Error;

use crate::datatype::DataType;

/// Result type for sensor validation
pub type SensorResult<T> = Result<T, SensorError>;

/// Result type for compiling and evaluating conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// A sensor record violates a registry invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Zero is never a valid sensor ID
    #[error("sensor ID was zero")]
    SensorIdZero,

    /// No data type given
    #[error("data type missing")]
    DataTypeMissing,

    /// Data type given but not one we support
    #[error("data type '{0}' invalid")]
    DataTypeInvalid(String),

    /// Symbol does not follow the naming convention
    #[error("symbol name '{0}' does not conform to naming convention")]
    InvalidSymbolName(String),

    /// Max length is only meaningful for string and bytes
    #[error("max length {max_length} set for {data_type}, which is not variable length")]
    MaxLengthForNonVariableData {
        /// Declared type of the sensor
        data_type: DataType,
        /// Offending max length
        max_length: u32,
    },

    /// Example arrays out of sync
    #[error(
        "different number of entries in example values ({values}) \
         and converted examples ({converted})"
    )]
    ExampleValuesMismatch {
        /// Number of raw example values
        values: usize,
        /// Number of converted example values
        converted: usize,
    },

    /// Datasheet URL present but malformed
    #[error("datasheet URL '{url}' invalid: {source}")]
    InvalidDatasheetUrl {
        /// URL as authored
        url: String,
        /// Parser diagnostic
        source: url::ParseError,
    },
}

/// Why a formula failed to parse
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Character outside the formula alphabet
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    /// Digits that do not form a number
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Token in the wrong place
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar allowed here
        expected: &'static str,
        /// What the formula contained
        found: String,
    },

    /// Formula ended mid-expression
    #[error("unexpected end of formula, expected {0}")]
    UnexpectedEnd(&'static str),

    /// Identifier other than `v` used as a value
    #[error("unknown parameter '{0}', only 'v' is bound")]
    UnknownParameter(String),

    /// Call to a function that is not registered
    #[error("unknown function '{0}', available: {}", crate::convert::function_list())]
    UnknownFunction(String),

    /// Parentheses, calls or unary signs nested past the limit
    #[error("formula nested deeper than {0} levels")]
    TooDeep(usize),

    /// More binary operators than a formula may hold
    #[error("formula has more than {0} operators")]
    TooManyOperators(usize),
}

/// Formula parse failure with byte offset into the formula
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at offset {position}")]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Byte offset where it went wrong
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Compiling or evaluating a conversion failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Input type is the unknown sentinel
    #[error("input type '{0}' unknown")]
    UnknownInputType(DataType),

    /// Formula does not parse
    #[error("invalid formula: {0}")]
    Parse(#[from] ParseError),

    /// Sensor record failed validation before its formula was compiled
    #[error("invalid sensor: {0}")]
    InvalidSensor(#[from] SensorError),

    /// Value type differs from the compiled input type
    #[error("expected input type '{expected}', got '{actual}'")]
    TypeMismatch {
        /// Type the unit was compiled for
        expected: DataType,
        /// Type of the value passed in
        actual: DataType,
    },

    /// Function called with the wrong number of arguments
    #[error("wrong parameter count for {function}: expected {expected}, got {actual}")]
    WrongParamCount {
        /// Function name
        function: &'static str,
        /// Required arity
        expected: usize,
        /// Arguments supplied
        actual: usize,
    },

    /// Function argument is not numeric
    #[error("wrong parameter type for {function}: got {actual}")]
    WrongParamType {
        /// Function name
        function: &'static str,
        /// Type of the offending argument
        actual: DataType,
    },

    /// Arithmetic on a non-numeric value
    #[error("operator '{operator}' cannot be applied to {actual}")]
    InvalidOperand {
        /// Operator symbol
        operator: char,
        /// Type of the offending operand
        actual: DataType,
    },
}

/// Text could not be read as a value of the requested type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueParseError {
    /// Requested type is the unknown sentinel
    #[error("cannot parse a value of unknown type")]
    UnknownType,

    /// Text is not a valid value of the type
    #[error("'{text}' is not a valid {data_type}")]
    Invalid {
        /// Requested type
        data_type: DataType,
        /// Offending text
        text: String,
    },
}
