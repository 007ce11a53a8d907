//! Raw and converted sensor values
//!
//! [`Value`] holds exactly one scalar of a supported [`DataType`]. There is no
//! variant for platform-width or 128 bit integers, so a reading of an
//! unsupported kind cannot reach a conversion at all.
//!
//! The `Display` impl is the default human-readable rendering used by
//! [`Unit::convert_to_string`](crate::Unit::convert_to_string). It has no
//! fixed-precision contract: floats print in their shortest round-trip form.

use core::fmt;

use crate::datatype::DataType;
use crate::errors::ValueParseError;

/// A single typed sensor value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `uint8`
    U8(u8),
    /// `uint16`
    U16(u16),
    /// `uint32`
    U32(u32),
    /// `uint64`
    U64(u64),
    /// `int8`
    I8(i8),
    /// `int16`
    I16(i16),
    /// `int32`
    I32(i32),
    /// `int64`
    I64(i64),
    /// `float32`
    F32(f32),
    /// `float64`
    F64(f64),
    /// `string`
    Str(String),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `bool`
    Bool(bool),
}

impl Value {
    /// Type tag of this value
    pub fn data_type(&self) -> DataType {
        DataType::from_value(self)
    }

    /// Numeric value widened to `f64`, or `None` for strings, bytes and booleans.
    ///
    /// 64 bit integers above 2^53 lose precision here. Formula arithmetic is
    /// always double precision, whatever the input width.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::U8(v) => Some(f64::from(v)),
            Value::U16(v) => Some(f64::from(v)),
            Value::U32(v) => Some(f64::from(v)),
            Value::U64(v) => Some(v as f64),
            Value::I8(v) => Some(f64::from(v)),
            Value::I16(v) => Some(f64::from(v)),
            Value::I32(v) => Some(f64::from(v)),
            Value::I64(v) => Some(v as f64),
            Value::F32(v) => Some(f64::from(v)),
            Value::F64(v) => Some(v),
            Value::Str(_) | Value::Bytes(_) | Value::Bool(_) => None,
        }
    }

    /// Parse the textual form of a raw value of type `data_type`.
    ///
    /// Numbers must fit the exact width (`"300"` is not a `uint8`). Strings
    /// are taken verbatim, bytes are hex (`"0a1b"` or `"0x0a1b"`), booleans
    /// are `true`/`false`.
    pub fn parse(data_type: DataType, text: &str) -> Result<Value, ValueParseError> {
        let invalid = || ValueParseError::Invalid {
            data_type,
            text: text.to_string(),
        };
        let trimmed = text.trim();

        let value = match data_type {
            DataType::Unknown => return Err(ValueParseError::UnknownType),
            DataType::Uint8 => Value::U8(trimmed.parse().map_err(|_| invalid())?),
            DataType::Uint16 => Value::U16(trimmed.parse().map_err(|_| invalid())?),
            DataType::Uint32 => Value::U32(trimmed.parse().map_err(|_| invalid())?),
            DataType::Uint64 => Value::U64(trimmed.parse().map_err(|_| invalid())?),
            DataType::Int8 => Value::I8(trimmed.parse().map_err(|_| invalid())?),
            DataType::Int16 => Value::I16(trimmed.parse().map_err(|_| invalid())?),
            DataType::Int32 => Value::I32(trimmed.parse().map_err(|_| invalid())?),
            DataType::Int64 => Value::I64(trimmed.parse().map_err(|_| invalid())?),
            DataType::Float32 => Value::F32(trimmed.parse().map_err(|_| invalid())?),
            DataType::Float64 => Value::F64(trimmed.parse().map_err(|_| invalid())?),
            DataType::String => Value::Str(text.to_string()),
            DataType::Bytes => Value::Bytes(parse_hex(trimmed).ok_or_else(invalid)?),
            DataType::Bool => match trimmed {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(invalid()),
            },
        };
        Ok(value)
    }
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.len() % 2 != 0 || !digits.is_ascii() {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).ok())
        .collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Bytes(bytes) => {
                f.write_str("[")?;
                for (i, byte) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{byte}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for Value {
                fn from(v: $native) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Vec<u8> => Bytes,
    bool => Bool,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}
