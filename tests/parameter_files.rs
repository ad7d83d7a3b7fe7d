use std::fs;

use cylinder_pricing::pricing::{
    calculate, load_parameters, save_parameters, ConfigurationError, CylinderDimensions,
    CylinderType, MaterialType, MountingType, ParameterFileError, ParameterStore,
    PricingParameters,
};

#[test]
fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let params = load_parameters(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(params, PricingParameters::default());
}

#[test]
fn saved_file_loads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.toml");
    let mut params = PricingParameters::default();
    params.mounting_prices.trunnion = 555.0;
    params.input_limits.stroke_length.max = 8000.0;
    save_parameters(&path, &params).unwrap();
    assert_eq!(load_parameters(&path).unwrap(), params);
}

#[test]
fn partial_file_changes_only_named_prices() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.toml");
    fs::write(&path, "[mounting_prices]\nflange = 500.0\n").unwrap();
    let params = load_parameters(&path).unwrap();

    let dims = CylinderDimensions::new(80.0, 50.0, 400.0);
    let base = calculate(
        &dims,
        MaterialType::Steel,
        CylinderType::DoubleActing,
        MountingType::Flange,
        0.25,
        &PricingParameters::default(),
    )
    .unwrap();
    let changed = calculate(
        &dims,
        MaterialType::Steel,
        CylinderType::DoubleActing,
        MountingType::Flange,
        0.25,
        &params,
    )
    .unwrap();
    assert_eq!(changed.cost_breakdown.mounting_cost, 500.0);
    assert_eq!(
        changed.cost_breakdown.tube_cost,
        base.cost_breakdown.tube_cost
    );
    assert!((changed.subtotal - base.subtotal - 50.0).abs() < 1e-9);
}

#[test]
fn inverted_limits_are_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.toml");
    fs::write(&path, "[input_limits.bore_diameter]\nmin = 600.0\nmax = 500.0\n").unwrap();
    let err = load_parameters(&path).unwrap_err();
    assert!(matches!(
        err,
        ParameterFileError::Configuration(ConfigurationError::InvertedLimit { .. })
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.toml");
    fs::write(&path, "[labor_rates\nmachining = ").unwrap();
    assert!(matches!(
        load_parameters(&path),
        Err(ParameterFileError::Parse(_))
    ));
}

#[test]
fn store_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.toml");
    fs::write(&path, "assembly_hours = 2.0\n").unwrap();
    let store = ParameterStore::load(&path).unwrap();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.parameters.assembly_hours, 2.0);
}
