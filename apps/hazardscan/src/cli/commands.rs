//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::StageView;
use crate::artifacts::{
    MetricsArtifact, Stage2InputsArtifact, gather_metrics, metrics_path, stage2_inputs_path,
    summary_path, write_json,
};
use crate::render::{
    render_comparison, render_report, render_signals, render_stage2_line, render_trace,
};
use crate::settings::Settings;
use hazardscan_core::{
    BitVector, Enumerator, Experiment, HazardError, StageId, experiment_config, run_baseline,
};
use std::num::NonZeroUsize;

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), HazardError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| HazardError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Enumerate both stages of `experiment`, print the selected view and write
/// the artifacts.
pub fn cmd_run(
    settings: &Settings,
    json_mode: bool,
    experiment: Experiment,
    view: StageView,
    workers: Option<usize>,
) -> Result<(), HazardError> {
    let workers = NonZeroUsize::new(workers.unwrap_or(settings.workers))
        .ok_or_else(|| HazardError::ConfigError("workers must be at least 1".to_string()))?;

    let enumerator = Enumerator::for_experiment(experiment)?;
    let domain = enumerator.domain()?;
    tracing::info!(
        %experiment,
        width = domain.width(),
        domain_size = domain.size(),
        workers = workers.get(),
        "enumerating"
    );

    let run = run_baseline(&enumerator, workers)?;
    let report = &run.report;
    for (stage, found) in [(StageId::One, &report.stage1), (StageId::Two, &report.stage2)] {
        tracing::info!(
            %experiment,
            stage = stage.as_str(),
            unsafe_inputs = found.count,
            runtime_ns = report.timing(stage).total_ns,
            "stage enumerated"
        );
    }

    let metrics = MetricsArtifact::from_report(report, &settings.engine);
    let dir = settings.results_dir.as_path();
    let metrics_file = metrics_path(dir, experiment);
    let summary_file = summary_path(dir, experiment);
    write_json(&metrics_file, &metrics)?;
    write_json(&summary_file, &run.summary)?;
    tracing::info!(path = %metrics_file.display(), "wrote metrics");
    tracing::info!(path = %summary_file.display(), "wrote summary");

    let dump = if view.stage() == Some(StageId::Two) {
        let dump = Stage2InputsArtifact::from_run(&run, settings.stage2_dump_limit);
        let dump_file = stage2_inputs_path(dir, experiment);
        write_json(&dump_file, &dump)?;
        tracing::info!(path = %dump_file.display(), count = dump.count, "wrote stage-2 inputs");
        Some(dump)
    } else {
        None
    };

    if json_mode {
        let output = serde_json::json!({
            "metrics": metrics,
            "stage2_inputs": dump,
        });
        return print_json(&output);
    }

    match view.stage() {
        Some(StageId::Two) => println!("{}", render_stage2_line(report)),
        _ => print!("{}", render_report(report)),
    }
    Ok(())
}

// =============================================================================
// SIGNALS COMMAND
// =============================================================================

/// Show both stage orders and their unsafe signatures.
pub fn cmd_signals(json_mode: bool, experiment: Experiment) -> Result<(), HazardError> {
    let config = experiment_config(experiment)?;

    if json_mode {
        let stages: Vec<_> = StageId::ALL
            .iter()
            .map(|&stage| {
                let stage_config = config.stage(stage);
                serde_json::json!({
                    "stage": stage,
                    "width": stage_config.width(),
                    "order": stage_config.order().names(),
                    "unsafe_signatures": stage_config.unsafe_set(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "experiment": experiment,
            "stages": stages,
        });
        return print_json(&output);
    }

    print!("{}", render_signals(config)?);
    Ok(())
}

// =============================================================================
// CLASSIFY COMMAND
// =============================================================================

/// Trace one input through both stages.
pub fn cmd_classify(json_mode: bool, experiment: Experiment, bits: &str) -> Result<(), HazardError> {
    let input: BitVector = bits.trim().parse()?;
    let enumerator = Enumerator::for_experiment(experiment)?;
    let trace = enumerator.trace(&input)?;
    tracing::debug!(
        %experiment,
        input = %trace.input,
        unsafe_at_stage1 = trace.unsafe_at_stage1,
        unsafe_at_stage2 = trace.unsafe_at_stage2,
        "classified"
    );

    if json_mode {
        return print_json(&trace);
    }

    print!("{}", render_trace(&trace, enumerator.pipeline().config())?);
    Ok(())
}

// =============================================================================
// COMPARE COMMAND
// =============================================================================

/// Gather every metrics artifact in the results directory and compare
/// runtimes per experiment and engine.
pub fn cmd_compare(settings: &Settings, json_mode: bool) -> Result<(), HazardError> {
    let table = gather_metrics(&settings.results_dir)?;
    tracing::info!(
        dir = %settings.results_dir.display(),
        experiments = table.len(),
        "gathered metrics"
    );

    if json_mode {
        return print_json(&table);
    }

    print!("{}", render_comparison(&table));
    Ok(())
}
