//! # Console Rendering
//!
//! Plain-text tables for the CLI. Every number is formatted with integer
//! arithmetic: durations in fixed three-decimal milliseconds or microseconds,
//! throughput with thousands separators, recall with two decimals.

use crate::artifacts::{RuntimeTable, ordered_engines};
use hazardscan_core::{
    BaselineReport, BitVector, ExperimentConfig, HazardError, PipelineTrace, Signal, StageId,
};

/// Nanoseconds per millisecond, picoseconds per microsecond.
const PER_MILLI: u64 = 1_000_000;

// =============================================================================
// NUMBER FORMATTING
// =============================================================================

/// `value / per_unit` rounded to three decimals.
///
/// `per_unit` must be a multiple of 1000 for exact rounding.
#[must_use]
pub fn fixed3(value: u64, per_unit: u64) -> String {
    let step = (per_unit / 1000).max(1);
    let thousandths = value.saturating_add(step / 2) / step;
    format!("{}.{:03}", thousandths / 1000, thousandths % 1000)
}

/// Nanoseconds as milliseconds, e.g. `1234567` → `1.235`.
#[must_use]
pub fn format_ms(ns: u64) -> String {
    fixed3(ns, PER_MILLI)
}

/// Picoseconds as microseconds, e.g. `61035` → `0.061`.
#[must_use]
pub fn format_us(ps: u64) -> String {
    fixed3(ps, PER_MILLI)
}

/// `1234567` → `1,234,567`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Throughput, `inf` when unbounded.
#[must_use]
pub fn format_rate(inputs_per_sec: Option<u64>) -> String {
    inputs_per_sec.map_or_else(|| "inf".to_string(), group_thousands)
}

/// Permille as a two-decimal fraction, `1000` → `1.00`.
#[must_use]
pub fn format_recall(permille: u32) -> String {
    let hundredths = permille.saturating_add(5) / 10;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

// =============================================================================
// TABLE
// =============================================================================

/// Minimal boxed ASCII table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Table with the given column headers.
    #[must_use]
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Set a title printed above the table.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a row; missing cells render empty, extra cells are dropped.
    pub fn row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Render with `|` separators and `+--+` rules.
    #[must_use]
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule = widths.iter().fold(String::from("+"), |mut acc, w| {
            acc.push_str(&"-".repeat(w + 2));
            acc.push('+');
            acc
        });
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .fold(String::from("|"), |mut acc, (cell, w)| {
                    acc.push_str(&format!(" {:<w$} |", cell, w = *w));
                    acc
                })
        };

        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(title);
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&line(&self.headers));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}

// =============================================================================
// REPORTS
// =============================================================================

fn join_bits(bits: &[BitVector]) -> String {
    bits.iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_signals(signals: &[Signal]) -> String {
    if signals.is_empty() {
        return "-".to_string();
    }
    signals
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header block and two-stage metrics table of a baseline report.
#[must_use]
pub fn render_report(report: &BaselineReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("exp           {}\n", report.experiment));
    out.push_str(&format!("n             {}\n", report.width));
    out.push_str(&format!("total inputs  {}\n", report.domain_size));
    out.push_str(&format!("|U|           {}\n", report.unsafe_signatures.len()));
    out.push_str(&format!("U             {}\n", join_bits(&report.unsafe_signatures)));
    out.push('\n');

    let (t1, t2) = (report.timing(StageId::One), report.timing(StageId::Two));
    let mut table = Table::new(["metric", "stage 1", "stage 2"]).titled("Classical Baseline 2 stage");
    table.row([
        "unsafe inputs".to_string(),
        report.stage1.count.to_string(),
        report.stage2.count.to_string(),
    ]);
    table.row([
        "new at stage 2 only".to_string(),
        "-".to_string(),
        report.stage2_only.count.to_string(),
    ]);
    table.row(["runtime ms".to_string(), format_ms(t1.total_ns), format_ms(t2.total_ns)]);
    table.row([
        "us per input".to_string(),
        format_us(t1.per_input_ps),
        format_us(t2.per_input_ps),
    ]);
    table.row([
        "inputs per sec".to_string(),
        format_rate(t1.inputs_per_sec),
        format_rate(t2.inputs_per_sec),
    ]);
    table.row([
        "recall vs gt".to_string(),
        format_recall(report.recall_stage1_permille),
        format_recall(report.recall_stage2_permille),
    ]);
    out.push_str(&table.render());
    out
}

/// One-line stage-2 summary.
#[must_use]
pub fn render_stage2_line(report: &BaselineReport) -> String {
    format!(
        "exp {} n {} stage2 count {} runtime_ms {}",
        report.experiment,
        report.width,
        report.stage2.count,
        format_ms(report.timing(StageId::Two).total_ns)
    )
}

/// Signal orders and unsafe signatures of both stages.
pub fn render_signals(config: &ExperimentConfig) -> Result<String, HazardError> {
    let mut out = String::new();
    for stage in StageId::ALL {
        let stage_config = config.stage(stage);
        let order = stage_config.order();
        out.push_str(&format!(
            "{} {} ({} bits): {}\n",
            config.experiment(),
            stage,
            order.width(),
            order.names().join(" ")
        ));

        let mut table = Table::new(["signature", "high signals"]);
        for signature in stage_config.unsafe_set() {
            let state = order.decode(signature)?;
            table.row([signature.to_string(), join_signals(&state.high_signals())]);
        }
        out.push_str(&table.render());
        out.push('\n');
    }
    Ok(out)
}

/// Outputs and verdicts of one input traced through both stages.
pub fn render_trace(trace: &PipelineTrace, config: &ExperimentConfig) -> Result<String, HazardError> {
    let order1 = config.stage(StageId::One).order();
    let order2 = config.stage(StageId::Two).order();
    let verdict = |unsafe_: bool| if unsafe_ { "UNSAFE" } else { "safe" };

    let mut table = Table::new(["step", "bits", "high signals", "verdict"])
        .titled(format!("{} trace", trace.experiment));
    table.row([
        "input".to_string(),
        trace.input.to_string(),
        join_signals(&order1.decode(&trace.input)?.high_signals()),
        String::new(),
    ]);
    table.row([
        "stage 1".to_string(),
        trace.stage1_output.to_string(),
        join_signals(&order1.decode(&trace.stage1_output)?.high_signals()),
        verdict(trace.unsafe_at_stage1).to_string(),
    ]);
    table.row([
        "stage 2".to_string(),
        trace.stage2_output.to_string(),
        join_signals(&order2.decode(&trace.stage2_output)?.high_signals()),
        verdict(trace.unsafe_at_stage2).to_string(),
    ]);
    Ok(table.render())
}

/// Runtime table per experiment, one column per engine and stage.
#[must_use]
pub fn render_comparison(table: &RuntimeTable) -> String {
    if table.is_empty() {
        return "no metrics found\n".to_string();
    }
    let engines = ordered_engines(table);

    let mut out = String::new();
    for (experiment, runs) in table {
        let mut rendered = Table::new(["engine", "stage 1 ms", "stage 2 ms"])
            .titled(format!("{} runtime", experiment));
        for engine in &engines {
            if let Some(record) = runs.get(engine) {
                rendered.row([
                    engine.clone(),
                    format_ms(record.stage1_ns),
                    format_ms(record.stage2_ns),
                ]);
            }
        }
        out.push_str(&rendered.render());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_three_decimals_round_half_up() {
        assert_eq!(format_ms(0), "0.000");
        assert_eq!(format_ms(1_234_567), "1.235");
        assert_eq!(format_ms(1_234_499), "1.234");
        assert_eq!(format_ms(12_000_000_000), "12000.000");
        assert_eq!(format_us(61_035), "0.061");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(16_384_000), "16,384,000");
        assert_eq!(format_rate(None), "inf");
    }

    #[test]
    fn recall_two_decimals() {
        assert_eq!(format_recall(1000), "1.00");
        assert_eq!(format_recall(333), "0.33");
        assert_eq!(format_recall(0), "0.00");
    }

    #[test]
    fn table_pads_columns() {
        let mut table = Table::new(["a", "bb"]);
        table.row(["long", "x"]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "+------+----+");
        assert_eq!(lines[1], "| a    | bb |");
        assert_eq!(lines[3], "| long | x  |");
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn empty_comparison() {
        assert_eq!(render_comparison(&RuntimeTable::new()), "no metrics found\n");
    }
}
