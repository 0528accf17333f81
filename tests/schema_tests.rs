use std::path::Path;

use parameter_study::schema::{GeneratorKind, ParameterSchema, ParameterSpec, read_raw_schema_from};
use parameter_study::{Error, ParameterGenerator};

fn yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_missing_num_simulations_is_a_missing_key() {
    let raw = yaml(r#"{"parameter_1": {"distribution": "norm", "kwarg1": 1}}"#);
    for kind in [GeneratorKind::LatinHypercube, GeneratorKind::SobolSequence] {
        let err = ParameterSchema::validate(&raw, kind).unwrap_err();
        match err {
            Error::MissingKey { key, .. } => assert_eq!(key, "num_simulations"),
            other => panic!("expected a missing key error, got {other:?}"),
        }
    }
}

#[test]
fn test_generator_builder_fails_before_sampling() {
    let raw = yaml(r#"{"parameter_1": {"distribution": "norm", "kwarg1": 1}}"#);
    let result = ParameterGenerator::builder(GeneratorKind::LatinHypercube).build(&raw);
    assert!(matches!(result, Err(Error::MissingKey { .. })));
}

#[test]
fn test_unexpected_kwarg_is_a_distribution_error() {
    let raw = yaml("{num_simulations: 2, parameter_1: {distribution: norm, kwarg1: 1}}");
    let err = ParameterSchema::validate(&raw, GeneratorKind::LatinHypercube).unwrap_err();
    assert!(matches!(err, Error::InvalidDistribution { .. }), "{err:?}");
    assert!(err.is_schema_error());
}

#[test]
fn test_distribution_schema_resolves_catalog() {
    let raw = yaml(
        "{num_simulations: 3, \
          a: {distribution: norm, loc: 1, scale: 2}, \
          b: {distribution: poisson, mu: 4}}",
    );
    let schema = ParameterSchema::validate(&raw, GeneratorKind::SobolSequence).unwrap();
    assert_eq!(schema.num_simulations(), Some(3));
    let names: Vec<&str> = schema
        .parameters()
        .iter()
        .map(|p| match &p.spec {
            ParameterSpec::Distribution(d) => d.name(),
            other => panic!("unexpected spec {other:?}"),
        })
        .collect();
    assert_eq!(names, ["norm", "poisson"]);
}

#[test]
fn test_each_generator_rejects_non_mapping_input() {
    for kind in GeneratorKind::ALL {
        let err = ParameterSchema::validate(&yaml("just a string"), kind).unwrap_err();
        assert!(matches!(err, Error::SchemaType { .. }), "{}", kind.as_str());
    }
}

#[test]
fn test_distribution_parameter_must_be_a_mapping() {
    let raw = yaml("{num_simulations: 2, a: [1, 2]}");
    let err = ParameterSchema::validate(&raw, GeneratorKind::LatinHypercube).unwrap_err();
    assert!(matches!(err, Error::SchemaType { .. }));
}

#[test]
fn test_kwarg_values_must_be_numbers() {
    let raw = yaml("{num_simulations: 2, a: {distribution: norm, loc: high}}");
    let err = ParameterSchema::validate(&raw, GeneratorKind::LatinHypercube).unwrap_err();
    assert!(matches!(err, Error::SchemaType { .. }));
}

#[test]
fn test_cartesian_values_must_be_scalars() {
    let raw = yaml("{a: [[1, 2]]}");
    let err = ParameterSchema::validate(&raw, GeneratorKind::CartesianProduct).unwrap_err();
    assert!(matches!(err, Error::SchemaType { .. }));
}

#[test]
fn test_dash_and_no_path_read_stdin() {
    for path in [None, Some(Path::new("-"))] {
        let raw = read_raw_schema_from(path, "{a: [1, 2]}".as_bytes()).unwrap();
        let schema = ParameterSchema::validate(&raw, GeneratorKind::CartesianProduct).unwrap();
        assert_eq!(schema.parameter_names(), ["a"]);
    }
}

#[test]
fn test_schema_file_takes_precedence_over_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.yaml");
    std::fs::write(&path, "{b: [x]}").unwrap();
    let raw = read_raw_schema_from(Some(&path), "{a: [1]}".as_bytes()).unwrap();
    assert!(raw.get("b").is_some());
    assert!(raw.get("a").is_none());

    let missing = dir.path().join("absent.yaml");
    let err = read_raw_schema_from(Some(&missing), "{a: [1]}".as_bytes()).unwrap_err();
    assert!(matches!(err, Error::InputNotFound(p) if p == missing));
}
