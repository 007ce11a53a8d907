//! Sensor registry entries and their validation
//!
//! A [`Sensor`] is a static fact about one sensor channel: what it emits, how
//! raw readings map to physical units, and the names used to generate code
//! for it. Records are authored once, validated on load and never mutated;
//! a change means superseding the whole record.
//!
//! ## Invariants
//!
//! - The ID is nonzero. Across the registry it is unique and append-only:
//!   IDs are never reassigned or deleted. Retire a sensor with `obsolete`.
//! - The type is a known [`DataType`].
//! - The symbol follows the naming convention (see [`is_valid_symbol`]).
//! - A max length is only set for variable-length types.
//! - Example values and converted examples pair up one to one.
//! - The datasheet URL, if present, is a well-formed URL or relative reference.
//!
//! Uniqueness needs the whole registry and is checked there; everything
//! else is checked per record by [`Sensor::validate`].

use crate::datatype::DataType;
use crate::errors::{SensorError, SensorResult};

use url::Url;

/// Sensor registry entry
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Sensor {
    /// Globally unique sensor ID. New IDs may be added, existing ones are
    /// never deleted or reused.
    pub sensor_id: u32,

    /// Name used when generating source code
    #[cfg_attr(feature = "serde", serde(default))]
    pub symbol: String,

    /// Hardware model, e.g. "BME680". For technical use, not end users.
    #[cfg_attr(feature = "serde", serde(default))]
    pub model: String,

    /// Human-readable name for user interfaces. Free-form, never a symbol.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,

    /// Free-form description
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,

    /// Do not use this ID for new devices. Devices in the wild may still
    /// report it, so backends keep the record.
    #[cfg_attr(feature = "serde", serde(default))]
    pub obsolete: bool,

    /// Data type name as authored. Kept as text so a missing type and an
    /// unsupported one stay distinguishable.
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub data_type: String,

    /// Maximum length for `string` and `bytes`. Zero means unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_length: u32,

    /// Unit of measurement, preferably the SI symbol
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: String,

    /// Formula from raw value `v` to `unit`. Empty means no conversion.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "referenceUnit", alias = "unitConversion", default)
    )]
    pub unit_conversion: String,

    /// Datasheet location, ideally downloadable without login
    #[cfg_attr(feature = "serde", serde(rename = "datasheetUrl", default))]
    pub datasheet_url: String,

    /// Raw example values, for documentation and tests
    #[cfg_attr(feature = "serde", serde(default))]
    pub example_values: Vec<String>,

    /// `example_values` after applying `unit_conversion`, index for index
    #[cfg_attr(feature = "serde", serde(rename = "exampleConverted", default))]
    pub examples_converted: Vec<String>,
}

impl Sensor {
    /// Minimal record with the three fields validation always looks at
    pub fn new(sensor_id: u32, symbol: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            sensor_id,
            symbol: symbol.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    /// Resolved data type, [`DataType::Unknown`] if missing or unsupported
    pub fn data_type(&self) -> DataType {
        DataType::by_name(&self.data_type)
    }

    /// Check the record invariants.
    ///
    /// Stops at the first violation, in this order: zero ID, missing type,
    /// invalid type, symbol, max length, example arrays, datasheet URL.
    pub fn validate(&self) -> SensorResult<()> {
        // zero is a really poor choice for a sensor ID
        if self.sensor_id == 0 {
            return Err(SensorError::SensorIdZero);
        }

        if self.data_type.is_empty() {
            return Err(SensorError::DataTypeMissing);
        }

        let data_type = self.data_type();
        if !data_type.is_known() {
            return Err(SensorError::DataTypeInvalid(self.data_type.clone()));
        }

        if !is_valid_symbol(&self.symbol) {
            return Err(SensorError::InvalidSymbolName(self.symbol.clone()));
        }

        if self.max_length > 0 && !data_type.is_variable_length() {
            return Err(SensorError::MaxLengthForNonVariableData {
                data_type,
                max_length: self.max_length,
            });
        }

        if self.example_values.len() != self.examples_converted.len() {
            return Err(SensorError::ExampleValuesMismatch {
                values: self.example_values.len(),
                converted: self.examples_converted.len(),
            });
        }

        if !self.datasheet_url.is_empty() {
            check_url_reference(&self.datasheet_url).map_err(|source| {
                SensorError::InvalidDatasheetUrl {
                    url: self.datasheet_url.clone(),
                    source,
                }
            })?;
        }

        Ok(())
    }
}

/// Placeholder base for resolving relative datasheet references
const REFERENCE_BASE: &str = "http://localhost/";

/// Accept absolute URLs and relative references such as
/// `datasheets/bme680.pdf`. Relative ones are resolved against a placeholder
/// base only to check their syntax.
fn check_url_reference(text: &str) -> Result<(), url::ParseError> {
    match Url::parse(text) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(REFERENCE_BASE)?;
            Url::options().base_url(Some(&base)).parse(text)?;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Check a symbol against the naming convention.
///
/// The whole string must match `[a-z]+[a-z0-9_]+[a-z0-9]`: lowercase ASCII
/// words separated by underscores, starting with a letter and not ending
/// with an underscore. At least three characters. These rules keep
/// generated identifiers valid in every target language.
pub fn is_valid_symbol(symbol: &str) -> bool {
    let bytes = symbol.as_bytes();
    let (first, rest) = match bytes.split_first() {
        Some(split) => split,
        None => return false,
    };
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return false,
    };

    first.is_ascii_lowercase()
        && !middle.is_empty()
        && middle
            .iter()
            .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        && (last.is_ascii_lowercase() || last.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exterior_temperature() -> Sensor {
        Sensor {
            sensor_id: 1,
            symbol: "exterior_temperature".to_string(),
            name: "Exterior Temperature".to_string(),
            description: "The exterior temperature.".to_string(),
            data_type: "int16".to_string(),
            unit: "C".to_string(),
            unit_conversion: "v / 10".to_string(),
            datasheet_url: "http://example.com/".to_string(),
            ..Sensor::default()
        }
    }

    #[test]
    fn valid_sensor() {
        assert_eq!(exterior_temperature().validate(), Ok(()));
    }

    #[test]
    fn invalid_symbol_names() {
        let symbols = [
            "_ack", "ack_", "Ack", " ack", "ack ", "hackHack", "æøå", "", "9ack", "ab",
        ];
        for symbol in symbols {
            let result = Sensor::new(1, symbol, "int8").validate();
            assert!(
                matches!(result, Err(SensorError::InvalidSymbolName(_))),
                "{symbol:?} accepted"
            );
        }
    }

    #[test]
    fn valid_symbol_names() {
        for symbol in ["abc", "a_1", "abc123_temperature", "a__b", "x9z"] {
            assert!(is_valid_symbol(symbol), "{symbol:?} rejected");
        }
    }

    #[test]
    fn zero_id_reported_first() {
        let mut sensor = Sensor::new(0, "Not Valid", "");
        sensor.max_length = 4;
        assert_eq!(sensor.validate(), Err(SensorError::SensorIdZero));
        assert_eq!(
            Sensor::new(0, "valid", "string").validate(),
            Err(SensorError::SensorIdZero)
        );
    }

    #[test]
    fn missing_and_invalid_types() {
        assert_eq!(
            Sensor::new(1, "valid", "").validate(),
            Err(SensorError::DataTypeMissing)
        );
        assert_eq!(
            Sensor::new(1, "valid", "unknown").validate(),
            Err(SensorError::DataTypeInvalid("unknown".to_string()))
        );
        assert_eq!(
            Sensor::new(1, "valid", "double").validate(),
            Err(SensorError::DataTypeInvalid("double".to_string()))
        );
    }

    #[test]
    fn max_length_only_for_variable_data() {
        let mut sensor = Sensor::new(1, "valid", "uint8");
        sensor.max_length = 1;
        assert!(matches!(
            sensor.validate(),
            Err(SensorError::MaxLengthForNonVariableData { .. })
        ));

        for data_type in ["string", "bytes"] {
            let mut sensor = Sensor::new(1, "valid", data_type);
            sensor.max_length = 1;
            assert_eq!(sensor.validate(), Ok(()));
        }
    }

    #[test]
    fn example_arrays_must_pair_up() {
        let mut sensor = exterior_temperature();
        sensor.example_values = vec!["100".into(), "200".into()];
        sensor.examples_converted = vec!["10".into()];
        assert_eq!(
            sensor.validate(),
            Err(SensorError::ExampleValuesMismatch { values: 2, converted: 1 })
        );
    }

    #[test]
    fn datasheet_url_must_parse() {
        let mut sensor = exterior_temperature();
        sensor.datasheet_url = "http://exa mple.com/".to_string();
        assert!(matches!(
            sensor.validate(),
            Err(SensorError::InvalidDatasheetUrl { .. })
        ));

        sensor.datasheet_url = "http://[::1/datasheet.pdf".to_string();
        assert!(matches!(
            sensor.validate(),
            Err(SensorError::InvalidDatasheetUrl { .. })
        ));

        sensor.datasheet_url.clear();
        assert_eq!(sensor.validate(), Ok(()));
    }

    #[test]
    fn relative_datasheet_references_accepted() {
        let mut sensor = Sensor::new(1, "valid", "int8");
        for reference in [
            "datasheets/bme680.pdf",
            "example.com/datasheet.pdf",
            "/docs/abc123.pdf",
            "../shared/abc123.pdf?rev=2#page=4",
            "//cdn.example.com/abc123.pdf",
        ] {
            sensor.datasheet_url = reference.to_string();
            assert_eq!(sensor.validate(), Ok(()), "{reference:?} rejected");
        }
    }

    #[test]
    fn formula_is_not_checked_by_validate() {
        let mut sensor = exterior_temperature();
        sensor.unit_conversion = "10 /".to_string();
        assert_eq!(sensor.validate(), Ok(()));
    }
}
