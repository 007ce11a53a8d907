//! Shared fixtures for registry integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use senreg_core::Sensor;

/// Path to a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Contents of a fixture file
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture readable")
}

/// Builder for sensor records with sensible defaults
pub struct SensorBuilder {
    sensor: Sensor,
}

impl SensorBuilder {
    pub fn new(id: u32, symbol: &str, data_type: &str) -> Self {
        Self {
            sensor: Sensor::new(id, symbol, data_type),
        }
    }

    pub fn formula(mut self, formula: &str) -> Self {
        self.sensor.unit_conversion = formula.to_string();
        self
    }

    pub fn example(mut self, raw: &str, converted: &str) -> Self {
        self.sensor.example_values.push(raw.to_string());
        self.sensor.examples_converted.push(converted.to_string());
        self
    }

    pub fn max_length(mut self, max_length: u32) -> Self {
        self.sensor.max_length = max_length;
        self
    }

    pub fn obsolete(mut self) -> Self {
        self.sensor.obsolete = true;
        self
    }

    pub fn build(self) -> Sensor {
        self.sensor
    }
}
