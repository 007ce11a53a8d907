//! Scalar data types emitted by sensors
//!
//! The set of types is closed. Names are a stable wire format: schema and
//! code-generation tooling keys off the exact spellings returned by
//! [`DataType::name`], so they must never change.
//!
//! Lookup by name never fails. Unrecognized names map to
//! [`DataType::Unknown`] and callers compare against the sentinel:
//!
//! ```rust
//! use senreg_core::DataType;
//!
//! assert_eq!(DataType::by_name("int16"), DataType::Int16);
//! assert_eq!(DataType::by_name("int17"), DataType::Unknown);
//! ```

use core::fmt;
use core::str::FromStr;

use crate::value::Value;

/// Data type of what a sensor emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataType {
    /// Sentinel for unrecognized names, never valid in a sensor record
    Unknown,
    /// 8 bit unsigned integer
    Uint8,
    /// 16 bit unsigned integer
    Uint16,
    /// 32 bit unsigned integer
    Uint32,
    /// 64 bit unsigned integer
    Uint64,
    /// 8 bit signed integer
    Int8,
    /// 16 bit signed integer
    Int16,
    /// 32 bit signed integer
    Int32,
    /// 64 bit signed integer
    Int64,
    /// 32 bit float
    Float32,
    /// 64 bit float
    Float64,
    /// UTF-8 string
    String,
    /// Opaque byte sequence
    Bytes,
    /// Boolean
    Bool,
}

impl DataType {
    /// Every selectable type, in declaration order. Excludes the sentinel.
    pub const SUPPORTED: [DataType; 13] = [
        DataType::Uint8,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Uint64,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Float32,
        DataType::Float64,
        DataType::String,
        DataType::Bytes,
        DataType::Bool,
    ];

    /// Look up a type by its canonical name.
    ///
    /// Returns [`DataType::Unknown`] for anything unrecognized, including the
    /// empty string. Matching is exact: `"Int16"` is not `"int16"`.
    pub fn by_name(name: &str) -> DataType {
        match name {
            "uint8" => DataType::Uint8,
            "uint16" => DataType::Uint16,
            "uint32" => DataType::Uint32,
            "uint64" => DataType::Uint64,
            "int8" => DataType::Int8,
            "int16" => DataType::Int16,
            "int32" => DataType::Int32,
            "int64" => DataType::Int64,
            "float32" => DataType::Float32,
            "float64" => DataType::Float64,
            "string" => DataType::String,
            "bytes" => DataType::Bytes,
            "bool" => DataType::Bool,
            _ => DataType::Unknown,
        }
    }

    /// Infer the type tag of a concrete value.
    ///
    /// Total over [`Value`]: a value of an unsupported kind cannot be built,
    /// so this never yields the sentinel.
    pub fn from_value(value: &Value) -> DataType {
        match value {
            Value::U8(_) => DataType::Uint8,
            Value::U16(_) => DataType::Uint16,
            Value::U32(_) => DataType::Uint32,
            Value::U64(_) => DataType::Uint64,
            Value::I8(_) => DataType::Int8,
            Value::I16(_) => DataType::Int16,
            Value::I32(_) => DataType::Int32,
            Value::I64(_) => DataType::Int64,
            Value::F32(_) => DataType::Float32,
            Value::F64(_) => DataType::Float64,
            Value::Str(_) => DataType::String,
            Value::Bytes(_) => DataType::Bytes,
            Value::Bool(_) => DataType::Bool,
        }
    }

    /// Canonical wire name
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Unknown => "unknown",
            DataType::Uint8 => "uint8",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::String => "string",
            DataType::Bytes => "bytes",
            DataType::Bool => "bool",
        }
    }

    /// True for everything except the sentinel
    pub const fn is_known(self) -> bool {
        !matches!(self, DataType::Unknown)
    }

    /// Types without a fixed byte width, for which a max length makes sense
    pub const fn is_variable_length(self) -> bool {
        matches!(self, DataType::String | DataType::Bytes)
    }

    /// Integer and float types
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            DataType::Uint8
                | DataType::Uint16
                | DataType::Uint32
                | DataType::Uint64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::Float32
                | DataType::Float64
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by [`DataType::from_str`] for unrecognized names
#[derive(Debug, Clone, PartialEq, Eq, thiserror_no_std::Error)]
#[error("unknown data type '{0}'")]
pub struct UnknownDataType(pub String);

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match DataType::by_name(s) {
            DataType::Unknown => Err(UnknownDataType(s.to_string())),
            known => Ok(known),
        }
    }
}
