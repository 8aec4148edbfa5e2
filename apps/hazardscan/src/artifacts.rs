//! # JSON Artifacts
//!
//! Persisted records of baseline runs, and the reader that gathers them back
//! for cross-engine comparison.
//!
//! | File                            | Content                          |
//! |---------------------------------|----------------------------------|
//! | `<exp>_baseline_metrics.json`   | [`MetricsArtifact`]              |
//! | `<exp>_baseline_summary.json`   | `UnsafeSummary`                  |
//! | `<exp>_stage2_inputs.json`      | [`Stage2InputsArtifact`]         |
//!
//! All durations and rates are integers; `inputs_per_sec` is `null` when the
//! measured duration was zero.

use crate::settings::ENGINE_CLASSICAL;
use hazardscan_core::{
    BaselineReport, BaselineRun, BitVector, Experiment, HazardError, StageId, Timing,
    UnsafeSetSummary,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Suffix identifying metrics artifacts in a results directory.
pub const METRICS_SUFFIX: &str = "_metrics.json";

/// Preferred engine order in comparisons; unknown engines follow, sorted.
pub const ENGINE_ORDER: [&str; 3] = [ENGINE_CLASSICAL, "cai", "quantum"];

/// Maximum artifact size read back by `gather_metrics` (16 MB).
const MAX_ARTIFACT_SIZE: u64 = 16 * 1024 * 1024;

/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: u64 = 1_000_000;

// =============================================================================
// ARTIFACT TYPES
// =============================================================================

/// Per-stage section of a metrics artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMetrics {
    /// Number of unsafe inputs.
    pub count: usize,
    /// First unsafe inputs, ascending.
    pub examples: Vec<BitVector>,
    /// Enumeration wall-clock time, ns.
    pub runtime_ns: u64,
    /// Mean time per input, ps.
    pub per_input_ps: u64,
    /// Throughput, inputs per second; `None` when unbounded.
    pub inputs_per_sec: Option<u64>,
}

impl StageMetrics {
    fn new(set: &UnsafeSetSummary, timing: &Timing) -> Self {
        Self {
            count: set.count,
            examples: set.examples.clone(),
            runtime_ns: timing.total_ns,
            per_input_ps: timing.per_input_ps,
            inputs_per_sec: timing.inputs_per_sec,
        }
    }
}

/// Recall section of a metrics artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallRecord {
    /// Stage-1 recall, permille.
    pub stage1_permille: u32,
    /// Stage-2 recall, permille.
    pub stage2_permille: u32,
}

/// `<exp>_baseline_metrics.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsArtifact {
    /// Experiment identifier.
    pub experiment: Experiment,
    /// Engine that produced the numbers.
    pub engine: String,
    /// Input width.
    pub width: usize,
    /// Number of enumerated inputs.
    pub domain_size: u64,
    /// Configured stage-1 unsafe signatures.
    pub unsafe_signatures: Vec<BitVector>,
    /// Stage-1 results and timing.
    pub stage1: StageMetrics,
    /// Stage-2 results and timing.
    pub stage2: StageMetrics,
    /// Inputs unsafe at stage 2 only.
    pub stage2_only: UnsafeSetSummary,
    /// Recall against ground truth.
    pub recall: RecallRecord,
}

impl MetricsArtifact {
    /// Flatten a report into its persisted form.
    #[must_use]
    pub fn from_report(report: &BaselineReport, engine: &str) -> Self {
        Self {
            experiment: report.experiment,
            engine: engine.to_string(),
            width: report.width,
            domain_size: report.domain_size,
            unsafe_signatures: report.unsafe_signatures.clone(),
            stage1: StageMetrics::new(&report.stage1, report.timing(StageId::One)),
            stage2: StageMetrics::new(&report.stage2, report.timing(StageId::Two)),
            stage2_only: report.stage2_only.clone(),
            recall: RecallRecord {
                stage1_permille: report.recall_stage1_permille,
                stage2_permille: report.recall_stage2_permille,
            },
        }
    }
}

/// `<exp>_stage2_inputs.json`: a longer listing of stage-2 unsafe inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage2InputsArtifact {
    /// Experiment identifier.
    pub experiment: Experiment,
    /// Input width.
    pub width: usize,
    /// Number of stage-2 unsafe inputs.
    pub count: usize,
    /// First `limit` stage-2 unsafe inputs, ascending.
    pub examples: Vec<BitVector>,
}

impl Stage2InputsArtifact {
    /// Take the first `limit` stage-2 unsafe inputs of `run`.
    #[must_use]
    pub fn from_run(run: &BaselineRun, limit: usize) -> Self {
        let listing = UnsafeSetSummary::with_limit(&run.stage2_inputs, limit);
        Self {
            experiment: run.report.experiment,
            width: run.report.width,
            count: listing.count,
            examples: listing.examples,
        }
    }
}

// =============================================================================
// PATHS & I/O
// =============================================================================

/// Path of the metrics artifact of `experiment`.
#[must_use]
pub fn metrics_path(dir: &Path, experiment: Experiment) -> PathBuf {
    dir.join(format!("{}_baseline{}", experiment, METRICS_SUFFIX))
}

/// Path of the summary artifact of `experiment`.
#[must_use]
pub fn summary_path(dir: &Path, experiment: Experiment) -> PathBuf {
    dir.join(format!("{}_baseline_summary.json", experiment))
}

/// Path of the stage-2 input dump of `experiment`.
#[must_use]
pub fn stage2_inputs_path(dir: &Path, experiment: Experiment) -> PathBuf {
    dir.join(format!("{}_stage2_inputs.json", experiment))
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), HazardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            HazardError::IoError(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HazardError::SerializationError(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| HazardError::IoError(format!("Cannot write {}: {}", path.display(), e)))
}

/// Read a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, HazardError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| HazardError::IoError(format!("Cannot read {}: {}", path.display(), e)))?;
    if metadata.len() > MAX_ARTIFACT_SIZE {
        return Err(HazardError::DeserializationError(format!(
            "{} is {} bytes, limit is {}",
            path.display(),
            metadata.len(),
            MAX_ARTIFACT_SIZE
        )));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| HazardError::IoError(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| {
        HazardError::DeserializationError(format!("{}: {}", path.display(), e))
    })
}

// =============================================================================
// COMPARISON
// =============================================================================

/// Stage runtimes of one engine on one experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeRecord {
    /// Stage-1 runtime, ns.
    pub stage1_ns: u64,
    /// Stage-2 runtime, ns.
    pub stage2_ns: u64,
}

/// experiment → engine → runtimes.
pub type RuntimeTable = BTreeMap<String, BTreeMap<String, RuntimeRecord>>;

/// Minimal view of a metrics artifact from any engine.
///
/// Other engines only share the experiment/engine labels and per-stage
/// runtimes with this crate's [`MetricsArtifact`]. Older artifacts label the
/// experiment `exp` and record `runtime_ms` as a decimal.
#[derive(Debug, Deserialize)]
struct RuntimeView {
    #[serde(alias = "exp")]
    experiment: Option<String>,
    engine: Option<String>,
    stage1: StageRuntimeView,
    stage2: StageRuntimeView,
}

#[derive(Debug, Deserialize)]
struct StageRuntimeView {
    runtime_ns: Option<u64>,
    runtime_ms: Option<serde_json::Number>,
}

impl StageRuntimeView {
    fn nanos(&self) -> Option<u64> {
        self.runtime_ns
            .or_else(|| self.runtime_ms.as_ref().and_then(millis_to_nanos))
    }
}

/// Decimal milliseconds to nanoseconds without floating point.
///
/// Digits past the nanosecond are dropped. Negative values and exponent
/// notation are rejected.
fn millis_to_nanos(millis: &serde_json::Number) -> Option<u64> {
    if let Some(whole) = millis.as_u64() {
        return whole.checked_mul(NANOS_PER_MILLI);
    }
    let text = millis.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let fraction: String = fraction.chars().chain(std::iter::repeat('0')).take(6).collect();
    let whole: u64 = whole.parse().ok()?;
    let fraction: u64 = fraction.parse().ok()?;
    whole.checked_mul(NANOS_PER_MILLI)?.checked_add(fraction)
}

/// Collect the runtimes of every `*_metrics.json` under `dir`.
///
/// The experiment defaults to the file-name prefix and the engine to
/// `classical`. A missing directory yields an empty table. Files that cannot
/// be read or carry no runtimes are skipped with a warning.
pub fn gather_metrics(dir: &Path) -> Result<RuntimeTable, HazardError> {
    let mut table = RuntimeTable::new();
    if !dir.is_dir() {
        return Ok(table);
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| HazardError::IoError(format!("Cannot list {}: {}", dir.display(), e)))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(METRICS_SUFFIX))
        })
        .collect();
    paths.sort();

    for path in paths {
        let view: RuntimeView = match read_json(&path) {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(error = %e, "skipping metrics file");
                continue;
            }
        };
        let (Some(stage1_ns), Some(stage2_ns)) = (view.stage1.nanos(), view.stage2.nanos())
        else {
            tracing::warn!(path = %path.display(), "skipping metrics file without runtimes");
            continue;
        };
        let experiment = view.experiment.unwrap_or_else(|| file_prefix(&path));
        let engine = view.engine.unwrap_or_else(|| ENGINE_CLASSICAL.to_string());
        table.entry(experiment).or_default().insert(
            engine,
            RuntimeRecord {
                stage1_ns,
                stage2_ns,
            },
        );
    }
    Ok(table)
}

fn file_prefix(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('_').next())
        .unwrap_or_default()
        .to_string()
}

/// Engines present in `table`, in `ENGINE_ORDER` first, then by name.
#[must_use]
pub fn ordered_engines(table: &RuntimeTable) -> Vec<String> {
    let mut seen: Vec<String> = table
        .values()
        .flat_map(|engines| engines.keys().cloned())
        .collect();
    seen.sort();
    seen.dedup();
    seen.sort_by_key(|engine| {
        ENGINE_ORDER
            .iter()
            .position(|known| *known == engine.as_str())
            .unwrap_or(ENGINE_ORDER.len())
    });
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_file_names() {
        let dir = Path::new("out");
        assert_eq!(
            metrics_path(dir, Experiment::Exp1),
            PathBuf::from("out/exp1_baseline_metrics.json")
        );
        assert_eq!(
            summary_path(dir, Experiment::Exp2),
            PathBuf::from("out/exp2_baseline_summary.json")
        );
        assert_eq!(
            stage2_inputs_path(dir, Experiment::Exp2),
            PathBuf::from("out/exp2_stage2_inputs.json")
        );
    }

    #[test]
    fn engines_follow_preferred_order() {
        let mut table = RuntimeTable::new();
        let record = RuntimeRecord {
            stage1_ns: 1,
            stage2_ns: 2,
        };
        let engines = table.entry("exp1".to_string()).or_default();
        for engine in ["quantum", "zeta", "classical", "alpha", "cai"] {
            engines.insert(engine.to_string(), record);
        }
        assert_eq!(
            ordered_engines(&table),
            vec!["classical", "cai", "quantum", "alpha", "zeta"]
        );
    }

    fn millis(json: &str) -> Option<u64> {
        millis_to_nanos(&serde_json::from_str(json).expect("number"))
    }

    #[test]
    fn decimal_millis_to_nanos() {
        assert_eq!(millis("2"), Some(2_000_000));
        assert_eq!(millis("1.5"), Some(1_500_000));
        assert_eq!(millis("0.061"), Some(61_000));
        assert_eq!(millis("12.3456789"), Some(12_345_678));
        assert_eq!(millis("-1.5"), None);
    }

    #[test]
    fn prefix_from_file_name() {
        assert_eq!(file_prefix(Path::new("r/exp2_cai_metrics.json")), "exp2");
    }
}
