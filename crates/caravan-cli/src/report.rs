//! Trip report file writer

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use caravan_core::{CrewOutput, ProviderConfig, TripRequest};

const RULE: &str =
    "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Render the full report: header, run metadata, caveats, and the plan
pub fn render(request: &TripRequest, config: &ProviderConfig, output: &CrewOutput) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("\nCaravan Travel Planning Crew - Execution Report\n");
    report.push_str(&format!(
        "Planning a {}-day trip to {}\n",
        request.duration_days, request.destination
    ));
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Execution time: {}\n", Local::now()));
    report.push_str(&format!(
        "Provider: {} (model: {})\n",
        config.provider, config.model
    ));
    report.push_str(&format!(
        "Usage: {} API calls, {} tokens in, {} tokens out, {} tool calls\n\n",
        output.usage.api_calls,
        output.usage.input_tokens,
        output.usage.output_tokens,
        output.usage.tool_calls.len(),
    ));

    report.push_str("IMPORTANT NOTES:\n");
    report.push_str("- Prices and availability are current as of the execution time above\n");
    report.push_str("- Hotel availability and prices may vary by booking date\n");
    report.push_str("- Weather conditions and attraction hours should be verified before travel\n\n");

    report.push_str("FINAL TRAVEL PLAN REPORT:\n");
    report.push_str(THIN_RULE);
    report.push('\n');
    report.push_str(output.final_report().unwrap_or("(no completed tasks)"));
    report.push('\n');
    report.push_str(THIN_RULE);
    report.push('\n');

    report
}

/// Write the rendered report to disk
pub async fn write(
    path: &Path,
    request: &TripRequest,
    config: &ProviderConfig,
    output: &CrewOutput,
) -> Result<()> {
    let report = render(request, config, output);
    tokio::fs::write(path, report)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
