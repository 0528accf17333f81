use parameter_study::Value;
use parameter_study::sampler::{LatinHypercube, Sampler};
use parameter_study::schema::GeneratorKind;

use super::schema;

const SCHEMA: &str = "{num_simulations: 20, \
    width: {distribution: uniform, loc: 1, scale: 2}, \
    height: {distribution: norm, loc: 50, scale: 1}, \
    count: {distribution: randint, low: 0, high: 4}}";

#[test]
fn test_lhs_same_seed_is_reproducible() {
    let schema = schema(GeneratorKind::LatinHypercube, SCHEMA);
    let a = LatinHypercube::with_seed(42).sample(&schema).unwrap();
    let b = LatinHypercube::with_seed(42).sample(&schema).unwrap();
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.quantiles, b.quantiles);
}

#[test]
fn test_lhs_different_seeds_differ() {
    let schema = schema(GeneratorKind::LatinHypercube, SCHEMA);
    let a = LatinHypercube::with_seed(1).sample(&schema).unwrap();
    let b = LatinHypercube::with_seed(2).sample(&schema).unwrap();
    assert_ne!(a.quantiles, b.quantiles);
}

#[test]
fn test_lhs_one_point_per_stratum() {
    let schema = schema(GeneratorKind::LatinHypercube, SCHEMA);
    let table = LatinHypercube::with_seed(7).sample(&schema).unwrap();
    let quantiles = table.quantiles.unwrap();
    let n = quantiles.len();
    assert_eq!(n, 20);

    for column in 0..3 {
        let mut hits = vec![0; n];
        for row in &quantiles {
            let q = row[column];
            assert!((0.0..1.0).contains(&q));
            hits[(q * n as f64).floor() as usize] += 1;
        }
        assert!(hits.iter().all(|&h| h == 1), "column {column}: {hits:?}");
    }
}

#[test]
fn test_lhs_values_follow_distributions() {
    let schema = schema(GeneratorKind::LatinHypercube, SCHEMA);
    let table = LatinHypercube::with_seed(3).sample(&schema).unwrap();
    for row in &table.rows {
        match &row[0] {
            Value::Float(w) => assert!((1.0..=3.0).contains(w), "width {w}"),
            other => panic!("width should be a float, got {other:?}"),
        }
        match &row[2] {
            Value::Int(c) => assert!((0..4).contains(c), "count {c}"),
            other => panic!("count should be an integer, got {other:?}"),
        }
    }
    let mean: f64 = table
        .rows
        .iter()
        .map(|row| row[1].as_f64().unwrap())
        .sum::<f64>()
        / table.len() as f64;
    assert!((mean - 50.0).abs() < 0.5, "height mean {mean}");
}

#[test]
fn test_lhs_zero_simulations() {
    let schema = schema(
        GeneratorKind::LatinHypercube,
        "{num_simulations: 0, x: {distribution: norm}}",
    );
    assert!(LatinHypercube::new().sample(&schema).unwrap().is_empty());
}
