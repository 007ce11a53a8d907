//! Integration tests for registry loading, evolution and conversion tables

mod common;

use std::io::Write;

use common::{fixture, fixture_path, SensorBuilder};
use proptest::prelude::*;
use senreg_core::{SensorError, Value};
use senreg_registry::{LoadOptions, LoadPolicy, RegistryError, SensorRegistry};
use tempfile::NamedTempFile;

fn load_fixture() -> SensorRegistry {
    let (registry, report) =
        SensorRegistry::from_path(fixture_path("registry.json"), &LoadOptions::strict()).unwrap();
    assert!(report.is_clean());
    registry
}

#[test]
fn fixture_loads_strict_with_examples() {
    let registry = load_fixture();

    assert_eq!(registry.len(), 5);
    assert_eq!(registry.active().count(), 4);
    assert!(registry.get(4).unwrap().obsolete);
    assert_eq!(registry.by_symbol("abc123_noise").unwrap().unit, "dBFS");
    assert_eq!(
        registry.get(1).unwrap().datasheet_url,
        "https://example.com/datasheets/abc123.pdf"
    );
}

#[test]
fn conversion_table_from_fixture() {
    let table = load_fixture().conversions();

    assert_eq!(table.len(), 5);
    assert_eq!(table.convert(1, 215i16).unwrap(), Value::F64(21.5));
    assert_eq!(table.convert_to_string(2, 101325i32).unwrap(), "1013.25");
    assert_eq!(table.convert(5, true).unwrap(), Value::Bool(true));
    assert_eq!(table.convert_to_string(4, "1.2.0").unwrap(), "1.2.0");

    match table.convert(3, 1000i16).unwrap() {
        Value::F64(dbfs) => assert!((dbfs - 0.0018313755165131498).abs() < 1e-15),
        other => panic!("expected f64, got {other:?}"),
    }

    assert!(matches!(
        table.convert(1, 215i32),
        Err(RegistryError::Conversion { id: 1, .. })
    ));
    assert!(matches!(table.convert(9, 1u8), Err(RegistryError::UnknownSensor(9))));
}

#[test]
fn loads_from_temp_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(fixture("registry.json").as_bytes()).unwrap();
    file.flush().unwrap();

    let (registry, _) = SensorRegistry::from_path(file.path(), &LoadOptions::strict()).unwrap();
    assert_eq!(registry.len(), 5);
}

#[test]
fn missing_file_and_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(
        SensorRegistry::from_path(&missing, &LoadOptions::lenient()),
        Err(RegistryError::Io(_))
    ));

    assert!(matches!(
        SensorRegistry::from_json_str("{\"sensorId\": 1}", &LoadOptions::lenient()),
        Err(RegistryError::Json(_))
    ));
    assert!(matches!(
        SensorRegistry::from_json_str("[{\"symbol\": \"no_id\"}]", &LoadOptions::lenient()),
        Err(RegistryError::Json(_))
    ));
}

fn mixed_records() -> Vec<senreg_core::Sensor> {
    vec![
        SensorBuilder::new(1, "good_one", "int16").formula("v / 10").build(),
        SensorBuilder::new(0, "zero_id", "int16").build(),
        SensorBuilder::new(2, "bad_formula", "int16").formula("v +").build(),
        SensorBuilder::new(3, "good_one", "uint8").build(),
        SensorBuilder::new(4, "Bad_Symbol", "uint8").build(),
        SensorBuilder::new(5, "good_two", "bytes").max_length(64).build(),
    ]
}

#[test]
fn strict_aborts_on_first_bad_record() {
    match SensorRegistry::from_sensors(mixed_records(), &LoadOptions::strict()) {
        Err(RegistryError::InvalidSensor { id: 0, source }) => {
            assert_eq!(source, SensorError::SensorIdZero);
        }
        other => panic!("expected invalid sensor 0, got {other:?}"),
    }
}

#[test]
fn lenient_skips_and_reports() {
    let (registry, report) =
        SensorRegistry::from_sensors(mixed_records(), &LoadOptions::lenient()).unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped.len(), 4);
    assert!(matches!(report.skipped[0], RegistryError::InvalidSensor { id: 0, .. }));
    assert!(matches!(report.skipped[1], RegistryError::Conversion { id: 2, .. }));
    assert!(matches!(
        report.skipped[2],
        RegistryError::DuplicateSymbol { first: 1, second: 3, .. }
    ));
    assert!(matches!(
        report.skipped[3],
        RegistryError::InvalidSensor { id: 4, source: SensorError::InvalidSymbolName(_) }
    ));

    let ids: Vec<_> = registry.iter().map(|s| s.sensor_id).collect();
    assert_eq!(ids, vec![1, 5]);
}

#[test]
fn duplicate_id_is_fatal_under_any_policy() {
    let records = vec![
        SensorBuilder::new(1, "first_sensor", "int8").build(),
        SensorBuilder::new(1, "second_sensor", "int8").build(),
    ];
    for options in [LoadOptions::strict(), LoadOptions::lenient()] {
        assert!(matches!(
            SensorRegistry::from_sensors(records.clone(), &options),
            Err(RegistryError::DuplicateSensorId(1))
        ));
    }
}

#[test]
fn duplicate_of_a_skipped_record_is_fatal() {
    let records = vec![
        SensorBuilder::new(5, "Bad_Symbol", "int16").build(),
        SensorBuilder::new(5, "good_sensor", "int16").build(),
    ];
    assert!(matches!(
        SensorRegistry::from_sensors(records, &LoadOptions::lenient()),
        Err(RegistryError::DuplicateSensorId(5))
    ));

    // a bad formula is skipped the same way and still holds the ID
    let records = vec![
        SensorBuilder::new(7, "noise_level", "int16").formula("log10(").build(),
        SensorBuilder::new(8, "other_level", "int16").build(),
        SensorBuilder::new(7, "noise_level", "int16").formula("v").build(),
    ];
    assert!(matches!(
        SensorRegistry::from_sensors(records, &LoadOptions::lenient()),
        Err(RegistryError::DuplicateSensorId(7))
    ));
}

#[test]
fn example_verification_is_configurable() {
    let records = vec![SensorBuilder::new(1, "scaled_sensor", "uint16")
        .formula("v * 2")
        .example("10", "20")
        .example("21", "40")
        .build()];

    assert!(matches!(
        SensorRegistry::from_sensors(records.clone(), &LoadOptions::strict()),
        Err(RegistryError::ExampleMismatch { id: 1, index: 1, .. })
    ));

    let unchecked = LoadOptions::strict().with_example_verification(false);
    let (registry, _) = SensorRegistry::from_sensors(records.clone(), &unchecked).unwrap();
    assert_eq!(registry.len(), 1);

    let skipping = LoadOptions::strict().with_policy(LoadPolicy::SkipInvalid);
    let (registry, report) = SensorRegistry::from_sensors(records, &skipping).unwrap();
    assert!(registry.is_empty());
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn evolution_against_previous_release() {
    let v1 = load_fixture();
    let options = LoadOptions::strict();

    let mut v2 = v1.clone();
    v2.insert(
        SensorBuilder::new(6, "abc123_humidity", "uint16")
            .formula("v / 100")
            .example("4550", "45.5")
            .build(),
        &options,
    )
    .unwrap();

    let mut retired = v2.get(1).unwrap().clone();
    retired.obsolete = true;
    v2.supersede(retired, &options).unwrap();

    assert!(v2.check_evolution(&v1).is_ok());
    assert!(matches!(v1.check_evolution(&v2), Err(RegistryError::SensorRemoved(6))));

    let mut retyped = v2.get(2).unwrap().clone();
    retyped.data_type = "int64".to_string();
    assert!(matches!(
        v2.supersede(retyped, &options),
        Err(RegistryError::TypeChanged { id: 2, .. })
    ));
}

#[test]
fn json_output_reloads_identically() {
    let registry = load_fixture();
    let json = registry.to_json().unwrap();

    let (reloaded, report) = SensorRegistry::from_json_str(&json, &LoadOptions::strict()).unwrap();
    assert!(report.is_clean());
    assert!(registry.iter().eq(reloaded.iter()));
}

proptest! {
    #[test]
    fn scaled_sensors_convert_like_f64(
        factors in prop::collection::vec(1u16..1000, 1..32),
        raw in any::<i32>(),
    ) {
        let records: Vec<_> = factors
            .iter()
            .enumerate()
            .map(|(i, factor)| {
                SensorBuilder::new(i as u32 + 1, &format!("scaled_{i}"), "int32")
                    .formula(&format!("v * {factor}"))
                    .build()
            })
            .collect();

        let (registry, report) =
            SensorRegistry::from_sensors(records, &LoadOptions::strict()).unwrap();
        prop_assert_eq!(report.loaded, factors.len());

        let table = registry.conversions();
        for (i, factor) in factors.iter().enumerate() {
            let converted = table.convert(i as u32 + 1, raw).unwrap();
            prop_assert_eq!(converted, Value::F64(raw as f64 * *factor as f64));
        }
    }
}
