use parameter_study::sampler::{Sampler, SobolSequence};
use parameter_study::schema::GeneratorKind;

use super::schema;

const SCHEMA: &str = "{num_simulations: 16, \
    x: {distribution: uniform}, \
    y: {distribution: expon, scale: 2}}";

#[test]
fn test_sobol_same_seed_is_reproducible() {
    let schema = schema(GeneratorKind::SobolSequence, SCHEMA);
    let a = SobolSequence::with_seed(11).sample(&schema).unwrap();
    let b = SobolSequence::with_seed(11).sample(&schema).unwrap();
    assert_eq!(a.rows, b.rows);
}

#[test]
fn test_sobol_fills_every_interval() {
    let schema = schema(GeneratorKind::SobolSequence, SCHEMA);
    let table = SobolSequence::with_seed(5).sample(&schema).unwrap();
    let quantiles = table.quantiles.unwrap();

    // 16 points of a (0, 2)-sequence in base 2 hit each of 16 equal
    // intervals once per dimension.
    for column in 0..2 {
        let mut hits = [0; 16];
        for row in &quantiles {
            hits[(row[column] * 16.0).floor() as usize] += 1;
        }
        assert!(hits.iter().all(|&h| h == 1), "column {column}: {hits:?}");
    }
}

#[test]
fn test_sobol_values_follow_distributions() {
    let schema = schema(GeneratorKind::SobolSequence, SCHEMA);
    let table = SobolSequence::with_seed(5).sample(&schema).unwrap();
    for row in &table.rows {
        let x = row[0].as_f64().unwrap();
        let y = row[1].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&x));
        assert!(y >= 0.0);
    }
}
