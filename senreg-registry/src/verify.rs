//! Example verification
//!
//! Each sensor documents a few raw values and what they convert to. Running
//! those pairs through the compiled formula catches formulas that were edited
//! without updating the documentation, and the other way round.

use senreg_core::{Sensor, Unit, Value};

use crate::errors::{RegistryError, RegistryResult};

/// Check every example pair of `sensor` against `unit`.
///
/// Sensors of a numeric type compare within `tolerance` relative to
/// `max(1, |expected|)`; a documented value that is not a number is a
/// mismatch. Strings, bytes and booleans compare as rendered text.
pub fn verify_examples(sensor: &Sensor, unit: &Unit, tolerance: f64) -> RegistryResult<()> {
    let id = sensor.sensor_id;
    let numeric = unit.input_type().is_numeric();
    let pairs = sensor
        .example_values
        .iter()
        .zip(&sensor.examples_converted)
        .enumerate();

    for (index, (raw, expected)) in pairs {
        let value = Value::parse(unit.input_type(), raw)
            .map_err(|source| RegistryError::InvalidExample { id, index, source })?;
        let actual = unit
            .convert(value)
            .map_err(|source| RegistryError::Conversion { id, source })?;

        let matches = if numeric {
            numbers_match(&actual, expected, tolerance)
        } else {
            actual.to_string() == *expected
        };
        if !matches {
            return Err(RegistryError::ExampleMismatch {
                id,
                index,
                raw: raw.clone(),
                expected: expected.clone(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

fn numbers_match(actual: &Value, expected: &str, tolerance: f64) -> bool {
    match (actual.as_f64(), expected.trim().parse::<f64>()) {
        (Some(actual), Ok(expected)) => {
            if actual.is_nan() || expected.is_nan() {
                return actual.is_nan() && expected.is_nan();
            }
            if actual.is_infinite() || expected.is_infinite() {
                return actual == expected;
            }
            (actual - expected).abs() <= tolerance * expected.abs().max(1.0)
        }
        _ => false,
    }
}
