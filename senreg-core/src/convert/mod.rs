//! Conversion Engine: raw sensor values to physical units
//!
//! ## Overview
//!
//! Each sensor carries a formula mapping its raw reading `v` to the unit it
//! reports in, e.g. `v / 10` for a temperature sensor that reports tenths of
//! a degree. A [`Unit`] is that formula compiled once against the sensor's
//! declared [`DataType`] and then evaluated for every reading.
//!
//! ## The formula language
//!
//! Formulas are persisted alongside the registry, so the language is stable:
//! new functions may appear, but existing formulas must keep parsing and
//! evaluating the same way.
//!
//! - infix `+ - * /` with the usual precedence, unary `-`
//! - parentheses
//! - numeric literals (`10`, `0.5`, `1e3`)
//! - the free parameter `v`
//! - registered functions: `log10(x)`, `abs(x)`
//!
//! An empty formula is the identity transform `v`.
//!
//! ## Typing
//!
//! A unit accepts exactly one input type. There is no widening or narrowing
//! at the boundary: a unit compiled for `int8` rejects an `i32`, even `1`.
//! Arithmetic is double precision whatever the input width, so numeric
//! results always come back as [`Value::F64`]. Strings, bytes and booleans
//! pass through the identity formula unchanged.
//!
//! ```rust
//! use senreg_core::{DataType, Unit, Value};
//!
//! let unit = Unit::new("v * 10", DataType::Int8)?;
//! assert_eq!(unit.convert(123i8)?, Value::F64(1230.0));
//! assert_eq!(unit.convert_to_string(123i8)?, "1230");
//! assert!(unit.convert(123i32).is_err());
//! # Ok::<(), senreg_core::ConversionError>(())
//! ```
//!
//! ## Sharing
//!
//! A unit is immutable after construction and holds no interior state, so
//! one instance can be evaluated from any number of threads at once.

mod eval;
mod functions;
mod lexer;
mod parser;

pub use functions::function_names;
pub(crate) use functions::function_list;

use crate::datatype::DataType;
use crate::errors::{ConversionError, ConversionResult};
use crate::sensor::Sensor;
use crate::value::Value;

use parser::Expr;

/// Formula used when a sensor has none
pub const IDENTITY_FORMULA: &str = "v";

/// Compiled, type-bound conversion formula
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    expression: String,
    expr: Expr,
    input_type: DataType,
}

impl Unit {
    /// Compile `expression` for inputs of `input_type`.
    ///
    /// A blank expression compiles as the identity transform.
    pub fn new(expression: &str, input_type: DataType) -> ConversionResult<Self> {
        if !input_type.is_known() {
            return Err(ConversionError::UnknownInputType(input_type));
        }

        let expression = if expression.trim().is_empty() {
            IDENTITY_FORMULA
        } else {
            expression
        };
        let expr = parser::parse(expression)?;

        Ok(Self {
            expression: expression.to_string(),
            expr,
            input_type,
        })
    }

    /// Validate `sensor`, then compile its formula for its type
    pub fn from_sensor(sensor: &Sensor) -> ConversionResult<Self> {
        sensor.validate()?;
        Self::new(&sensor.unit_conversion, sensor.data_type())
    }

    /// Formula this unit was compiled from (`"v"` for the identity)
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The only type [`convert`](Self::convert) accepts
    pub fn input_type(&self) -> DataType {
        self.input_type
    }

    /// True if this unit returns its input unchanged apart from numeric widening
    pub fn is_identity(&self) -> bool {
        self.expr == Expr::Variable
    }

    /// Convert a raw value.
    ///
    /// Fails with [`ConversionError::TypeMismatch`] unless the value's type
    /// is exactly the input type. Numeric results are always `f64`.
    pub fn convert(&self, value: impl Into<Value>) -> ConversionResult<Value> {
        let value = value.into();
        self.check_type(&value)?;
        let result = self.expr.eval(&value)?;
        Ok(result.into_value())
    }

    /// Convert a raw value and render the result as text
    pub fn convert_to_string(&self, value: impl Into<Value>) -> ConversionResult<String> {
        self.convert(value).map(|result| result.to_string())
    }

    fn check_type(&self, value: &Value) -> ConversionResult<()> {
        let actual = value.data_type();
        if actual != self.input_type {
            return Err(ConversionError::TypeMismatch {
                expected: self.input_type,
                actual,
            });
        }
        Ok(())
    }
}
