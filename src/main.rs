// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env, set up logging, parse command-line arguments
// 2. Read the endpoint list (a missing file stops everything right here)
// 3. Sweep all endpoints with the scheduler while a progress bar runs
// 4. Print the results and exit (0 = all up, 1 = some not up, 2 = error)
// =============================================================================

mod cli;
mod config;
mod report;
mod source;
mod sweep;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use sweep::Scheduler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Values already present in the environment win over the .env file
    let _ = dotenvy::dotenv();
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only ever carries the table or JSON
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.probe_config()?;

    let endpoints = source::load_endpoints(&cli.file)?;

    // Keep stdout clean for machine-readable output
    if !cli.json {
        println!(
            "🔍 Checking {} endpoints concurrently (max_workers={}, timeout={}s)...\n",
            endpoints.len(),
            config.max_concurrency(),
            config.timeout().as_secs()
        );
    }

    let scheduler = Scheduler::new(config)?;

    let progress = if cli.no_progress {
        None
    } else {
        Some(tokio::spawn(report::show_progress(scheduler.subscribe())))
    };

    let results = scheduler.run(endpoints).await;

    // Dropping the scheduler closes the progress channel
    drop(scheduler);
    if let Some(handle) = progress {
        let _ = handle.await;
    }

    report::print_results(&results, cli.json)?;
    Ok(report::exit_code(&results))
}
