// src/report.rs
// =============================================================================
// Everything the user sees once the sweep is running:
// - a progress line on stderr, driven by the scheduler's progress counter
// - the final results as a table or as JSON on stdout
// - the process exit code derived from the results
// =============================================================================

use anyhow::Result;
use std::io::{self, Write};
use tokio::sync::watch;

use crate::sweep::{Classification, ProbeOutcome, Progress};

const ENDPOINT_WIDTH: usize = 60;
const BAR_WIDTH: usize = 40;

/// Prints the results either as a table or JSON
pub fn print_results(results: &[ProbeOutcome], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        println!("\n📊 Results:");
        print!("{}", render_table(results));
    }
    Ok(())
}

/// Renders one row per outcome followed by a summary.
pub fn render_table(results: &[ProbeOutcome]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<60} {:<28} {:<12} {:<14}\n",
        "Endpoint", "Result", "HTTP Status", "Response Time"
    ));
    out.push_str(&format!("{}\n", "=".repeat(117)));

    for outcome in results {
        out.push_str(&format!(
            "{:<60} {:<28} {:<12} {:<14}\n",
            truncate(&outcome.endpoint, ENDPOINT_WIDTH),
            result_label(outcome),
            outcome
                .http_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            outcome
                .elapsed
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "-".to_string()),
        ));
    }

    let count = |class: Classification| {
        results
            .iter()
            .filter(|o| o.classification == class)
            .count()
    };

    out.push('\n');
    out.push_str(&format!(
        "✅ UP: {}   ⏱️  TIMEOUT: {}   ❌ DOWN: {}   📋 Total: {}\n",
        count(Classification::Up),
        count(Classification::Timeout),
        count(Classification::Down),
        results.len()
    ));
    out
}

// "DOWN (connection_refused)" for failures, the bare class otherwise
fn result_label(outcome: &ProbeOutcome) -> String {
    match &outcome.error_detail {
        Some(detail) => format!("{} ({})", outcome.classification, detail),
        None => outcome.classification.to_string(),
    }
}

// Shortens long endpoints so the columns stay aligned
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

/// 0 when every endpoint is up, 1 otherwise
pub fn exit_code(results: &[ProbeOutcome]) -> i32 {
    if results.iter().all(ProbeOutcome::is_up) {
        0
    } else {
        1
    }
}

/// Redraws a progress bar on stderr until the run is complete or the
/// scheduler goes away.
pub async fn show_progress(mut progress: watch::Receiver<Progress>) {
    while progress.changed().await.is_ok() {
        let current = *progress.borrow_and_update();
        if current.total == 0 {
            break;
        }

        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r{}", render_progress(current));
        let _ = stderr.flush();

        if current.is_done() {
            let _ = writeln!(stderr);
            break;
        }
    }
}

pub fn render_progress(progress: Progress) -> String {
    let filled = if progress.total == 0 {
        BAR_WIDTH
    } else {
        progress.completed.min(progress.total) * BAR_WIDTH / progress.total
    };
    format!(
        "Progress: [{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.completed,
        progress.total
    )
}
