use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use caravan_core::{OpenAiClient, ProviderConfig, ToolRegistry, TripRequest, resolve, travel_crew};

mod report;

#[derive(Parser)]
#[command(name = "caravan")]
#[command(version)]
#[command(about = "Caravan: a multi-agent travel planning crew")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip with the full crew and write the report
    Plan {
        #[arg(long, default_value = "Iceland")]
        destination: String,

        #[arg(long, default_value = "New York")]
        departure_city: String,

        #[arg(long, default_value = "January 15-20, 2025")]
        dates: String,

        #[arg(long, default_value_t = 5)]
        duration_days: u32,

        #[arg(long, default_value_t = 2)]
        travelers: u32,

        /// Budget preference: budget, mid-range, or luxury
        #[arg(long, default_value = "mid-range")]
        budget: String,

        /// Where to write the trip report
        #[arg(short, long, default_value = "trip_plan.txt")]
        output: PathBuf,
    },

    /// Show the resolved configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before resolution so resolver warnings are visible.
    // The DEBUG/VERBOSE env vars get their authoritative parse in resolve();
    // this pre-read only picks the filter level.
    let env: HashMap<String, String> = std::env::vars().collect();
    let debug = cli.debug || env.get("DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let verbose = env
        .get("VERBOSE")
        .map_or(true, |v| v.eq_ignore_ascii_case("true"));
    let filter = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = resolve(&env).context("Configuration error")?;

    match cli.command {
        Commands::Config => cmd_config(&config),
        Commands::Plan {
            destination,
            departure_city,
            dates,
            duration_days,
            travelers,
            budget,
            output,
        } => {
            let request = TripRequest {
                destination,
                departure_city,
                dates,
                duration_days,
                travelers,
                budget_preference: budget,
            };
            cmd_plan(&config, &request, &output).await
        }
    }
}

fn cmd_config(config: &ProviderConfig) -> Result<()> {
    println!("{}", config.summary());
    if !config.validate() {
        eprintln!("\n{}", ProviderConfig::remediation());
        std::process::exit(1);
    }
    Ok(())
}

async fn cmd_plan(config: &ProviderConfig, request: &TripRequest, output_path: &Path) -> Result<()> {
    // Hard stop before any network call
    if !config.validate() {
        eprintln!("{}", ProviderConfig::remediation());
        std::process::exit(1);
    }

    println!("Caravan Travel Planning Crew");
    println!(
        "Planning a {}-day trip to {} for {} travelers",
        request.duration_days, request.destination, request.travelers
    );
    println!(
        "Task sequence: Flight Specialist -> Accommodation Specialist -> Travel Planner -> Financial Advisor\n"
    );

    if config.verbose {
        println!("{}\n", config.summary());
    }

    let provider = OpenAiClient::from_config(config);
    let registry = ToolRegistry::with_research_tools();
    let crew = travel_crew(request)?;

    let output = crew.kickoff(&provider, &registry, &request.context()).await;

    for result in &output.results {
        info!(
            "Task {} ({}) {}",
            result.task, result.agent, result.status
        );
    }

    if !output.is_success() {
        let failed = output
            .results
            .iter()
            .find(|r| r.status == caravan_core::TaskStatus::Failed);
        let detail = failed.map_or(String::new(), |r| {
            format!(" at task '{}' ({}): {}", r.task, r.agent, r.output)
        });
        anyhow::bail!("Crew execution failed{}", detail);
    }

    let final_report = output
        .final_report()
        .context("Crew completed but produced no report")?;

    println!("\nFINAL TRAVEL PLAN REPORT:");
    println!("{}\n", final_report);

    report::write(output_path, request, config, &output).await?;
    println!("Report saved to {}", output_path.display());

    println!(
        "Done. {} API calls, {} tokens total.",
        output.usage.api_calls,
        output.usage.total_tokens()
    );
    Ok(())
}
