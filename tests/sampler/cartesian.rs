use std::collections::HashSet;

use parameter_study::Value;
use parameter_study::sampler::{CartesianProduct, Sampler};
use parameter_study::schema::GeneratorKind;

use super::schema;

#[test]
fn test_cartesian_row_count_is_product_of_lengths() {
    let schema = schema(
        GeneratorKind::CartesianProduct,
        "{a: [1, 2, 3], b: [x, y], c: [true, false], d: [0.5]}",
    );
    let table = CartesianProduct::new().sample(&schema).unwrap();
    assert_eq!(table.len(), 3 * 2 * 2);
    assert_eq!(table.parameter_names, ["a", "b", "c", "d"]);
}

#[test]
fn test_cartesian_every_combination_exactly_once() {
    let schema = schema(GeneratorKind::CartesianProduct, "{a: [1, 2, 3], b: [x, y, z, w]}");
    let table = CartesianProduct::new().sample(&schema).unwrap();

    let seen: HashSet<String> = table
        .rows
        .iter()
        .map(|row| format!("{}|{}", row[0], row[1]))
        .collect();
    assert_eq!(seen.len(), table.len());
    for a in ["1", "2", "3"] {
        for b in ["x", "y", "z", "w"] {
            assert!(seen.contains(&format!("{a}|{b}")), "missing {a}|{b}");
        }
    }
}

#[test]
fn test_cartesian_last_parameter_varies_fastest() {
    let schema = schema(GeneratorKind::CartesianProduct, "{outer: [1, 2], inner: [a, b, c]}");
    let table = CartesianProduct::new().sample(&schema).unwrap();
    let outer: Vec<&Value> = table.rows.iter().map(|row| &row[0]).collect();
    let inner: Vec<&Value> = table.rows.iter().map(|row| &row[1]).collect();
    assert_eq!(
        outer,
        [&Value::Int(1), &Value::Int(1), &Value::Int(1), &Value::Int(2), &Value::Int(2), &Value::Int(2)]
    );
    assert_eq!(inner[..3], [&Value::from("a"), &Value::from("b"), &Value::from("c")]);
}

#[test]
fn test_cartesian_keeps_value_types() {
    let schema = schema(GeneratorKind::CartesianProduct, "{mixed: [1, 1.0, '1', true]}");
    let table = CartesianProduct::new().sample(&schema).unwrap();
    let values: Vec<&Value> = table.rows.iter().map(|row| &row[0]).collect();
    assert_eq!(
        values,
        [&Value::Int(1), &Value::Float(1.0), &Value::from("1"), &Value::Bool(true)]
    );
    assert!(table.quantiles.is_none());
}

#[test]
fn test_cartesian_empty_list_yields_empty_table() {
    let schema = schema(GeneratorKind::CartesianProduct, "{a: [1, 2], b: []}");
    assert!(CartesianProduct::new().sample(&schema).unwrap().is_empty());
}

#[test]
fn test_cartesian_rejects_schema_validated_for_other_kind() {
    let schema = schema(GeneratorKind::CustomStudy, "{a: [1, 2]}");
    assert!(CartesianProduct::new().sample(&schema).is_err());
}
