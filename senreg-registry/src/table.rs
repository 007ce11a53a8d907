//! Compiled conversions keyed by sensor ID
//!
//! Built once from a loaded registry and then shared read-only by whatever
//! decodes incoming readings. Lookups and evaluations take `&self`, so a
//! table behind an `Arc` serves any number of threads without locking.

use std::collections::HashMap;

use senreg_core::{Unit, Value};

use crate::errors::{RegistryError, RegistryResult};

/// One compiled [`Unit`] per sensor
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    units: HashMap<u32, Unit>,
}

impl ConversionTable {
    pub(crate) fn from_units(units: HashMap<u32, Unit>) -> Self {
        Self { units }
    }

    /// Compiled unit for a sensor
    pub fn get(&self, id: u32) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Convert a raw reading from sensor `id`
    pub fn convert(&self, id: u32, value: impl Into<Value>) -> RegistryResult<Value> {
        self.unit(id)?
            .convert(value)
            .map_err(|source| RegistryError::Conversion { id, source })
    }

    /// Convert a raw reading from sensor `id` and render it as text
    pub fn convert_to_string(&self, id: u32, value: impl Into<Value>) -> RegistryResult<String> {
        self.unit(id)?
            .convert_to_string(value)
            .map_err(|source| RegistryError::Conversion { id, source })
    }

    /// Number of sensors with a compiled unit
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no sensors are loaded
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn unit(&self, id: u32) -> RegistryResult<&Unit> {
        self.units.get(&id).ok_or(RegistryError::UnknownSensor(id))
    }
}
