use std::collections::BTreeMap;

use parameter_study::sampler::{CustomStudy, Sampler};
use parameter_study::schema::GeneratorKind;
use parameter_study::{Error, ParameterGenerator, Value};

use super::schema;

fn row(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
}

#[test]
fn test_custom_explicit_rows_pass_through() {
    let schema = schema(GeneratorKind::CustomStudy, "{num_simulations: 1, parameter_1: [1, 2]}");
    let table = CustomStudy::new()
        .with_rows(vec![row(&[("parameter_1", Value::Int(1))])])
        .sample(&schema)
        .unwrap();
    assert_eq!(table.parameter_names, ["parameter_1"]);
    assert_eq!(table.rows, vec![vec![Value::Int(1)]]);
}

#[test]
fn test_custom_explicit_rows_through_the_generator() {
    let raw = serde_yaml::from_str("{num_simulations: 1, parameter_1: [1, 2]}").unwrap();
    let generator = ParameterGenerator::builder(GeneratorKind::CustomStudy)
        .sampler(CustomStudy::new().with_rows(vec![row(&[("parameter_1", Value::Int(1))])]))
        .build(&raw)
        .unwrap();
    let study = generator.generate(None).unwrap();
    assert_eq!(study.set_names(), ["parameter_set0"]);
    assert_eq!(study.sets()[0].get("parameter_1"), Some(&Value::Int(1)));
}

#[test]
fn test_custom_rows_from_schema_table() {
    let schema = schema(
        GeneratorKind::CustomStudy,
        "{parameter_names: [width, label], parameter_samples: [[1.5, a], [2.5, b], [1.5, a]]}",
    );
    let table = CustomStudy::new().sample(&schema).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows[1], vec![Value::Float(2.5), Value::from("b")]);
    assert_eq!(table.rows[0], table.rows[2]);
}

#[test]
fn test_custom_row_missing_a_parameter() {
    let schema = schema(GeneratorKind::CustomStudy, "{a: [1], b: [2]}");
    let err = CustomStudy::new()
        .with_rows(vec![row(&[("a", Value::Int(1))])])
        .sample(&schema)
        .unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref key, .. } if key == "b"));
}

#[test]
fn test_custom_row_with_undeclared_parameter() {
    let schema = schema(GeneratorKind::CustomStudy, "{a: [1]}");
    let err = CustomStudy::new()
        .with_rows(vec![row(&[("a", Value::Int(1)), ("z", Value::Int(0))])])
        .sample(&schema)
        .unwrap_err();
    assert!(matches!(err, Error::SchemaType { .. }));
}

#[test]
fn test_custom_without_any_rows() {
    let schema = schema(GeneratorKind::CustomStudy, "{a: [1]}");
    let sampler = CustomStudy::new();
    assert!(matches!(sampler.check(&schema), Err(Error::MissingKey { .. })));
}
