//! Integration tests for artifact persistence and settings files.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use hazardscan::artifacts::{
    MetricsArtifact, RuntimeRecord, Stage2InputsArtifact, gather_metrics, metrics_path, read_json,
    write_json,
};
use hazardscan::settings::Settings;
use hazardscan_core::{
    Enumerator, Experiment, HazardError, UnsafeSummary, run_baseline,
};
use std::num::NonZeroUsize;

fn exp1_run() -> hazardscan_core::BaselineRun {
    let enumerator = Enumerator::for_experiment(Experiment::Exp1).unwrap();
    run_baseline(&enumerator, NonZeroUsize::MIN).unwrap()
}

// =============================================================================
// METRICS ARTIFACT TESTS
// =============================================================================

#[test]
fn test_metrics_artifact_roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let run = exp1_run();
    let metrics = MetricsArtifact::from_report(&run.report, "classical");

    let path = metrics_path(&dir.path().join("nested"), Experiment::Exp1);
    write_json(&path, &metrics).unwrap();
    let loaded: MetricsArtifact = read_json(&path).unwrap();

    assert_eq!(loaded, metrics);
    assert_eq!(loaded.domain_size, 128);
    assert_eq!(loaded.stage1.count, 32);
    assert_eq!(loaded.stage2.count, 35);
    assert_eq!(loaded.recall.stage1_permille, 1000);
}

#[test]
fn test_metrics_artifact_field_layout() {
    let run = exp1_run();
    let metrics = MetricsArtifact::from_report(&run.report, "classical");
    let value = serde_json::to_value(&metrics).unwrap();

    assert_eq!(value["experiment"], "exp1");
    assert_eq!(value["engine"], "classical");
    assert_eq!(value["width"], 7);
    assert_eq!(value["unsafe_signatures"][0], "0000111");
    assert!(value["stage1"].get("runtime_ns").is_some());
    assert!(value["stage1"].get("per_input_ps").is_some());
    assert!(value["stage1"].get("inputs_per_sec").is_some());
    assert_eq!(value["stage2_only"]["examples"][2], "0111000");
    assert_eq!(value["recall"]["stage2_permille"], 1000);
}

#[test]
fn test_summary_artifact_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let run = exp1_run();
    let path = dir.path().join("exp1_baseline_summary.json");
    write_json(&path, &run.summary).unwrap();
    let loaded: UnsafeSummary = read_json(&path).unwrap();
    assert_eq!(loaded, run.summary);
}

#[test]
fn test_stage2_dump_respects_limit() {
    let run = exp1_run();
    let dump = Stage2InputsArtifact::from_run(&run, 4);
    assert_eq!(dump.count, 35);
    let examples: Vec<String> = dump.examples.iter().map(|b| b.to_string()).collect();
    assert_eq!(examples, vec!["0100110", "0100111", "0111000", "1100000"]);
}

#[test]
fn test_read_json_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken_metrics.json");
    std::fs::write(&path, "{ not json").unwrap();
    let result: Result<MetricsArtifact, _> = read_json(&path);
    assert!(matches!(result, Err(HazardError::DeserializationError(_))));
}

// =============================================================================
// GATHER TESTS
// =============================================================================

#[test]
fn test_gather_groups_by_experiment_and_engine() {
    let dir = tempfile::tempdir().unwrap();
    let run = exp1_run();
    let metrics = MetricsArtifact::from_report(&run.report, "classical");
    write_json(&metrics_path(dir.path(), Experiment::Exp1), &metrics).unwrap();

    std::fs::write(
        dir.path().join("exp1_cai_metrics.json"),
        r#"{"experiment":"exp1","engine":"cai","stage1":{"runtime_ns":5},"stage2":{"runtime_ns":9}}"#,
    )
    .unwrap();
    // No labels: experiment from the file name, engine defaults to classical.
    std::fs::write(
        dir.path().join("exp2_baseline_metrics.json"),
        r#"{"stage1":{"runtime_ns":1000},"stage2":{"runtime_ns":2000}}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("exp2_baseline_summary.json"), "ignored").unwrap();

    let table = gather_metrics(dir.path()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table["exp1"]["cai"],
        RuntimeRecord {
            stage1_ns: 5,
            stage2_ns: 9
        }
    );
    assert_eq!(
        table["exp1"]["classical"].stage1_ns,
        run.report.timing_stage1.total_ns
    );
    assert_eq!(
        table["exp2"]["classical"],
        RuntimeRecord {
            stage1_ns: 1000,
            stage2_ns: 2000
        }
    );
}

#[test]
fn test_gather_reads_millisecond_artifacts_beside_native_ones() {
    let dir = tempfile::tempdir().unwrap();
    let run = exp1_run();
    let metrics = MetricsArtifact::from_report(&run.report, "classical");
    write_json(&metrics_path(dir.path(), Experiment::Exp1), &metrics).unwrap();

    // `exp` label and decimal `runtime_ms`, as written by the other engines.
    std::fs::write(
        dir.path().join("exp1_quantum_metrics.json"),
        r#"{"exp":"exp1","engine":"quantum","stage1":{"runtime_ms":1.5},"stage2":{"runtime_ms":2.0}}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("exp2_cai_metrics.json"),
        r#"{"exp":"exp2","engine":"cai","stage1":{"runtime_ms":0.061,"us_per_input":0.004},"stage2":{"runtime_ms":3}}"#,
    )
    .unwrap();

    let table = gather_metrics(dir.path()).unwrap();
    assert_eq!(
        table["exp1"]["quantum"],
        RuntimeRecord {
            stage1_ns: 1_500_000,
            stage2_ns: 2_000_000
        }
    );
    assert_eq!(
        table["exp1"]["classical"].stage2_ns,
        run.report.timing_stage2.total_ns
    );
    assert_eq!(
        table["exp2"]["cai"],
        RuntimeRecord {
            stage1_ns: 61_000,
            stage2_ns: 3_000_000
        }
    );
}

#[test]
fn test_gather_skips_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("exp1_broken_metrics.json"), "{ not json").unwrap();
    std::fs::write(
        dir.path().join("exp1_empty_metrics.json"),
        r#"{"exp":"exp1","engine":"empty","stage1":{},"stage2":{}}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("exp1_cai_metrics.json"),
        r#"{"exp":"exp1","engine":"cai","stage1":{"runtime_ms":1},"stage2":{"runtime_ms":2}}"#,
    )
    .unwrap();

    let table = gather_metrics(dir.path()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table["exp1"].keys().collect::<Vec<_>>(), vec!["cai"]);
}

#[test]
fn test_gather_missing_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let table = gather_metrics(&dir.path().join("absent")).unwrap();
    assert!(table.is_empty());
}

// =============================================================================
// SETTINGS FILE TESTS
// =============================================================================

#[test]
fn test_settings_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hazardscan.toml");
    std::fs::write(
        &path,
        "results_dir = \"out\"\ndefault_experiment = \"exp2\"\nstage2_dump_limit = 4\nworkers = 3\n",
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.results_dir, std::path::PathBuf::from("out"));
    assert_eq!(settings.default_experiment, Experiment::Exp2);
    assert_eq!(settings.stage2_dump_limit, 4);
    assert_eq!(settings.workers, 3);
    assert_eq!(settings.engine, "classical");
}

#[test]
fn test_settings_explicit_file_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let result = Settings::load(Some(&dir.path().join("missing.toml")));
    assert!(matches!(result, Err(HazardError::ConfigError(_))));
}

#[test]
fn test_settings_flag_beats_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "results_dir = \"from-file\"\n").unwrap();

    let flag = dir.path().join("from-flag");
    let settings = Settings::resolve(Some(&path), Some(flag.clone())).unwrap();
    assert_eq!(settings.results_dir, flag);
}

#[test]
fn test_settings_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "results_dir = [").unwrap();
    assert!(matches!(
        Settings::load(Some(&path)),
        Err(HazardError::ConfigError(_))
    ));
}
