use parameter_study::prelude::*;
use parameter_study::study::{BINARY_MAGIC, read_study, study_from_bytes, study_to_bytes};

fn yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).unwrap()
}

fn sampled_study() -> ParameterStudy {
    ParameterGenerator::builder(GeneratorKind::SobolSequence)
        .seed(3)
        .build(&yaml(
            "{num_simulations: 8, \
              width: {distribution: lognorm, s: 0.5}, \
              count: {distribution: binom, n: 10, p: 0.3}}",
        ))
        .unwrap()
        .generate(None)
        .unwrap()
}

fn assert_same_study(a: &ParameterStudy, b: &ParameterStudy) {
    assert_eq!(a.parameter_names(), b.parameter_names());
    assert_eq!(a.len(), b.len());
    for (x, y) in a.sets().iter().zip(b.sets()) {
        assert_eq!(x.id(), y.id());
        assert_eq!(x.name(), y.name());
        assert_eq!(x.hash(), y.hash());
        for name in a.parameter_names() {
            let (vx, vy) = (x.get(name).unwrap(), y.get(name).unwrap());
            assert!(vx == vy || (vx.is_missing() && vy.is_missing()), "{name}: {vx:?} != {vy:?}");
        }
    }
}

#[test]
fn test_yaml_round_trip_as_previous_study() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.yaml");
    let study = sampled_study();
    std::fs::write(&path, study_to_bytes(&study, OutputFormat::Yaml).unwrap()).unwrap();

    let back = read_study(&path).unwrap();
    assert_same_study(&study, &back);
    assert!(!back.has_quantiles());
}

#[test]
fn test_binary_round_trip_keeps_quantiles() {
    let study = sampled_study();
    let bytes = study_to_bytes(&study, OutputFormat::Binary).unwrap();
    assert!(bytes.starts_with(&BINARY_MAGIC));

    let back = study_from_bytes(&bytes).unwrap();
    assert_same_study(&study, &back);
    for (x, y) in study.sets().iter().zip(back.sets()) {
        assert_eq!(x.quantiles(), y.quantiles());
    }
}

#[test]
fn test_padded_columns_survive_both_formats() {
    let previous = ParameterGenerator::builder(GeneratorKind::CartesianProduct)
        .build(&yaml("{a: [1, 2]}"))
        .unwrap()
        .generate(None)
        .unwrap();
    let grown = ParameterGenerator::builder(GeneratorKind::CustomStudy)
        .build(&yaml("{parameter_names: [a, b], parameter_samples: [[1, 0.5]]}"))
        .unwrap();
    let merged = grown.generate(Some(&previous)).unwrap();
    let combined = ParameterStudy::new(
        merged.parameter_names().to_vec(),
        previous.sets().iter().chain(merged.sets()).cloned().collect(),
    )
    .unwrap();
    assert!(combined.sets()[0].get("b").unwrap().is_missing());

    for format in OutputFormat::ALL {
        let bytes = study_to_bytes(&combined, format).unwrap();
        assert_same_study(&combined, &study_from_bytes(&bytes).unwrap());
    }
}

#[test]
fn test_merge_against_read_back_study_reuses_all_ids() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("study.h5");
    let schema = "{num_simulations: 5, x: {distribution: norm}, y: {distribution: gamma, a: 2}}";
    let builder = || {
        ParameterGenerator::builder(GeneratorKind::LatinHypercube)
            .seed(77)
            .output_file(&file)
            .output_format(OutputFormat::Binary)
            .previous_study(&file)
    };

    let first = builder().build(&yaml(schema)).unwrap();
    let study = first.run().unwrap();
    first.write_to(&study, &mut std::io::sink()).unwrap();

    let second = builder().require_previous_study(true).build(&yaml(schema)).unwrap();
    let again = second.run().unwrap();
    assert_same_study(&study, &again);
    let report = second.write_to(&again, &mut std::io::sink()).unwrap();
    assert_eq!(report.files[0].1, WriteStatus::Unchanged);
}

#[test]
fn test_missing_previous_file_is_input_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_study(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
}

#[test]
fn test_garbage_is_rejected() {
    assert!(study_from_bytes(b"\xff\xfe not yaml").is_err());
    assert!(study_from_bytes(b"parameter_names: [a]\nparameter_sets: 3\n").is_err());
}
