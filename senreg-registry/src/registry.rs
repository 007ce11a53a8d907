//! Sensor registry with registry-wide invariants
//!
//! A single record can only be checked against itself. The registry adds
//! the invariants that need every record at once:
//!
//! - sensor IDs are unique
//! - symbols are unique, since they become identifiers in generated code
//! - IDs are append-only: a newer registry keeps every ID of an older one
//!   and does not change what type it emits
//!
//! Records are never removed. Retiring a sensor means superseding its record
//! with one that has `obsolete` set.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};
use senreg_core::{Sensor, Unit};

use crate::config::{LoadOptions, LoadPolicy};
use crate::errors::{RegistryError, RegistryResult};
use crate::table::ConversionTable;
use crate::verify::verify_examples;

/// Validated sensor with its compiled conversion
#[derive(Debug, Clone)]
struct Entry {
    sensor: Sensor,
    unit: Unit,
}

/// Outcome of a load that did not abort
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records accepted into the registry
    pub loaded: usize,
    /// Records rejected under [`LoadPolicy::SkipInvalid`], in document order
    pub skipped: Vec<RegistryError>,
}

impl LoadReport {
    /// True if every record was accepted
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Validated sensors ordered by ID
#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    entries: BTreeMap<u32, Entry>,
    symbols: HashMap<String, u32>,
}

impl SensorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from records.
    ///
    /// Duplicate IDs always abort the load, even when the first record
    /// with that ID was itself skipped. Other failures abort under
    /// [`LoadPolicy::Strict`] and are logged and reported under
    /// [`LoadPolicy::SkipInvalid`].
    pub fn from_sensors<I>(
        sensors: I,
        options: &LoadOptions,
    ) -> RegistryResult<(Self, LoadReport)>
    where
        I: IntoIterator<Item = Sensor>,
    {
        let mut registry = Self::new();
        let mut report = LoadReport::default();
        // every ID in the document, skipped records included
        let mut seen = HashSet::new();

        for sensor in sensors {
            let id = sensor.sensor_id;
            if !seen.insert(id) {
                return Err(RegistryError::DuplicateSensorId(id));
            }

            match registry.insert(sensor, options) {
                Ok(()) => report.loaded += 1,
                Err(err) if err.is_fatal() || options.policy == LoadPolicy::Strict => {
                    return Err(err)
                }
                Err(err) => {
                    warn!("skipping sensor {}: {}", id, err);
                    report.skipped.push(err);
                }
            }
        }

        info!(
            "loaded {} sensors, skipped {}",
            report.loaded,
            report.skipped.len()
        );
        Ok((registry, report))
    }

    /// Parse a JSON array of sensor records and load it
    pub fn from_json_str(
        json: &str,
        options: &LoadOptions,
    ) -> RegistryResult<(Self, LoadReport)> {
        let sensors: Vec<Sensor> = serde_json::from_str(json)?;
        Self::from_sensors(sensors, options)
    }

    /// Read a JSON array of sensor records and load it
    pub fn from_reader<R: Read>(
        reader: R,
        options: &LoadOptions,
    ) -> RegistryResult<(Self, LoadReport)> {
        let sensors: Vec<Sensor> = serde_json::from_reader(reader)?;
        Self::from_sensors(sensors, options)
    }

    /// Load a JSON registry document from disk
    pub fn from_path(
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> RegistryResult<(Self, LoadReport)> {
        let path = path.as_ref();
        debug!("reading registry from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }

    /// Add a record with a new ID
    pub fn insert(&mut self, sensor: Sensor, options: &LoadOptions) -> RegistryResult<()> {
        let id = sensor.sensor_id;
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateSensorId(id));
        }

        let unit = admit(&sensor, options)?;
        self.claim_symbol(&sensor)?;

        if unit.is_identity() {
            debug!("loaded sensor {} ({}), no conversion", id, sensor.symbol);
        } else {
            debug!("loaded sensor {} ({}), v -> {}", id, sensor.symbol, unit.expression());
        }
        self.entries.insert(id, Entry { sensor, unit });
        Ok(())
    }

    /// Replace the record for an existing ID, returning the old one.
    ///
    /// The replacement must be valid and keep the type the ID was
    /// published with.
    pub fn supersede(&mut self, sensor: Sensor, options: &LoadOptions) -> RegistryResult<Sensor> {
        let id = sensor.sensor_id;
        let previous = self
            .entries
            .get(&id)
            .ok_or(RegistryError::UnknownSensor(id))?;

        if previous.sensor.data_type != sensor.data_type {
            return Err(RegistryError::TypeChanged {
                id,
                previous: previous.sensor.data_type.clone(),
                current: sensor.data_type,
            });
        }

        let unit = admit(&sensor, options)?;
        let old_symbol = previous.sensor.symbol.clone();
        if sensor.symbol != old_symbol {
            self.claim_symbol(&sensor)?;
            self.symbols.remove(&old_symbol);
        }

        debug!("superseded sensor {} ({})", id, sensor.symbol);
        let old = self.entries.insert(id, Entry { sensor, unit });
        // present: looked up above and nothing removed it since
        old.map(|entry| entry.sensor).ok_or(RegistryError::UnknownSensor(id))
    }

    /// Check that this registry is a valid successor of `previous`:
    /// every old ID still exists with the same type.
    pub fn check_evolution(&self, previous: &SensorRegistry) -> RegistryResult<()> {
        for (id, old) in &previous.entries {
            let current = self
                .entries
                .get(id)
                .ok_or(RegistryError::SensorRemoved(*id))?;

            if current.sensor.data_type != old.sensor.data_type {
                return Err(RegistryError::TypeChanged {
                    id: *id,
                    previous: old.sensor.data_type.clone(),
                    current: current.sensor.data_type.clone(),
                });
            }
        }
        Ok(())
    }

    /// Record by ID
    pub fn get(&self, id: u32) -> Option<&Sensor> {
        self.entries.get(&id).map(|entry| &entry.sensor)
    }

    /// Compiled conversion by ID
    pub fn unit(&self, id: u32) -> Option<&Unit> {
        self.entries.get(&id).map(|entry| &entry.unit)
    }

    /// Record by symbol
    pub fn by_symbol(&self, symbol: &str) -> Option<&Sensor> {
        self.symbols.get(symbol).and_then(|id| self.get(*id))
    }

    /// All records in ID order, obsolete ones included
    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.entries.values().map(|entry| &entry.sensor)
    }

    /// Records not marked obsolete, in ID order
    pub fn active(&self) -> impl Iterator<Item = &Sensor> {
        self.iter().filter(|sensor| !sensor.obsolete)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the registry has no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every compiled conversion for read-time use
    pub fn conversions(&self) -> ConversionTable {
        let units = self
            .entries
            .iter()
            .map(|(id, entry)| (*id, entry.unit.clone()))
            .collect();
        ConversionTable::from_units(units)
    }

    /// Serialize the registry as a JSON array in ID order
    pub fn to_json(&self) -> RegistryResult<String> {
        let sensors: Vec<&Sensor> = self.iter().collect();
        Ok(serde_json::to_string_pretty(&sensors)?)
    }

    fn claim_symbol(&mut self, sensor: &Sensor) -> RegistryResult<()> {
        if let Some(&first) = self.symbols.get(&sensor.symbol) {
            return Err(RegistryError::DuplicateSymbol {
                symbol: sensor.symbol.clone(),
                first,
                second: sensor.sensor_id,
            });
        }
        self.symbols.insert(sensor.symbol.clone(), sensor.sensor_id);
        Ok(())
    }
}

/// Validate, compile and optionally verify a single record
fn admit(sensor: &Sensor, options: &LoadOptions) -> RegistryResult<Unit> {
    let id = sensor.sensor_id;
    sensor
        .validate()
        .map_err(|source| RegistryError::InvalidSensor { id, source })?;

    let unit = Unit::new(&sensor.unit_conversion, sensor.data_type())
        .map_err(|source| RegistryError::Conversion { id, source })?;

    if options.verify_examples {
        verify_examples(sensor, &unit, options.example_tolerance)?;
    }
    Ok(unit)
}
