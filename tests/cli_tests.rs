#![cfg(feature = "cli")]

use std::path::Path;

use clap::Parser;
use parameter_study::cli::{self, Cli, RunStatus};
use parameter_study::study::read_study;

fn run_cli(args: &[&str]) -> (anyhow::Result<RunStatus>, String) {
    let mut argv = vec!["parameter-study"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let status = cli::run(cli, &mut out);
    (status, String::from_utf8(out).unwrap())
}

fn write_schema(dir: &Path, text: &str) -> String {
    let path = dir.join("schema.yaml");
    std::fs::write(&path, text).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_cartesian_product_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), "{a: [1, 2], b: [x]}");
    let (status, out) = run_cli(&["cartesian_product", &schema]);
    assert_eq!(status.unwrap(), RunStatus::Success);
    assert!(out.contains("parameter_set0"));
    assert!(out.contains("parameter_set1"));
}

#[test]
fn test_missing_schema_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    let (status, _) = run_cli(&["cartesian_product", missing.to_str().unwrap()]);
    let err = status.unwrap_err();
    assert!(format!("{err:#}").contains("does not exist"));
}

#[test]
fn test_invalid_schema_reports_the_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), "{parameter_1: {distribution: norm}}");
    let (status, _) = run_cli(&["latin_hypercube", &schema]);
    let err = status.unwrap_err();
    assert!(format!("{err:#}").contains("num_simulations"));
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(
        dir.path(),
        "{num_simulations: 4, x: {distribution: norm, loc: 2}}",
    );
    let (_, first) = run_cli(&["sobol_sequence", &schema, "--seed", "12"]);
    let (_, second) = run_cli(&["sobol_sequence", &schema, "--seed", "12"]);
    assert_eq!(first, second);
}

#[test]
fn test_dry_run_prints_paths() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), "{a: [1, 2]}");
    let template = dir.path().join("out/set@number.yaml");
    let (status, out) = run_cli(&[
        "cartesian_product",
        &schema,
        "-o",
        template.to_str().unwrap(),
        "--dry-run",
    ]);
    assert_eq!(status.unwrap(), RunStatus::Success);
    assert_eq!(out.lines().count(), 2);
    assert!(out.lines().next().unwrap().ends_with("set0.yaml"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_conflicts_change_the_run_status() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("set@number.yaml");
    let template = template.to_str().unwrap();

    let schema = write_schema(dir.path(), "{a: [1]}");
    let (status, _) = run_cli(&["cartesian_product", &schema, "-o", template]);
    assert_eq!(status.unwrap(), RunStatus::Success);

    let schema = write_schema(dir.path(), "{a: [9]}");
    let (status, _) = run_cli(&["cartesian_product", &schema, "-o", template]);
    assert_eq!(status.unwrap(), RunStatus::Conflicts);

    let (status, _) = run_cli(&["cartesian_product", &schema, "-o", template, "--overwrite"]);
    assert_eq!(status.unwrap(), RunStatus::Success);
}

#[test]
fn test_dry_run_over_changed_sets_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("set@number.yaml");
    let template = template.to_str().unwrap();

    let schema = write_schema(dir.path(), "{a: [1, 2]}");
    let (status, _) = run_cli(&["cartesian_product", &schema, "-o", template]);
    assert_eq!(status.unwrap(), RunStatus::Success);

    let schema = write_schema(dir.path(), "{a: [1, 5]}");
    let (status, out) = run_cli(&["cartesian_product", &schema, "-o", template, "--dry-run"]);
    assert_eq!(status.unwrap(), RunStatus::Success);
    assert!(out.is_empty());
    let kept = std::fs::read_to_string(dir.path().join("set1.yaml")).unwrap();
    assert!(kept.contains('2'));
}

#[test]
fn test_previous_study_keeps_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    let study = dir.path().join("study.yaml");
    let study = study.to_str().unwrap();

    let schema = write_schema(dir.path(), "{a: [1, 2]}");
    run_cli(&["cartesian_product", &schema, "-f", study]).0.unwrap();

    let schema = write_schema(dir.path(), "{a: [0, 2]}");
    run_cli(&["cartesian_product", &schema, "-f", study, "-p", study])
        .0
        .unwrap();

    let merged = read_study(Path::new(study)).unwrap();
    let ids: Vec<(String, u64)> = merged
        .sets()
        .iter()
        .map(|set| (set.get("a").unwrap().to_string(), set.id()))
        .collect();
    assert_eq!(ids, [("2".to_owned(), 1), ("0".to_owned(), 2)]);
}

#[test]
fn test_required_previous_study_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(dir.path(), "{a: [1]}");
    let previous = dir.path().join("previous.yaml");
    let (status, _) = run_cli(&[
        "cartesian_product",
        &schema,
        "-p",
        previous.to_str().unwrap(),
        "-R",
    ]);
    assert!(status.is_err());

    let (status, _) = run_cli(&["cartesian_product", &schema, "-p", previous.to_str().unwrap()]);
    assert_eq!(status.unwrap(), RunStatus::Success);
}

#[test]
fn test_binary_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_schema(
        dir.path(),
        "{num_simulations: 3, x: {distribution: uniform}}",
    );
    let output = dir.path().join("study.h5");
    let (status, _) = run_cli(&[
        "latin_hypercube",
        &schema,
        "-f",
        output.to_str().unwrap(),
        "-t",
        "h5",
        "--seed",
        "1",
        "--write-meta",
    ]);
    assert_eq!(status.unwrap(), RunStatus::Success);
    let study = read_study(&output).unwrap();
    assert_eq!(study.len(), 3);
    assert!(study.has_quantiles());
    assert!(dir.path().join("parameter_study_meta.txt").is_file());
}
