use iss_flyover::config::FlyoverConfig;
use iss_flyover::error::FlyoverError;
use iss_flyover::fetcher::HttpFetcher;
use iss_flyover::logging;
use iss_flyover::pipeline::{FlyoverPipeline, PipelineState};

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use iss_common::FlyoverPass;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "iss-flyover")]
#[command(about = "Print upcoming ISS passes over your current location")]
struct Cli {
    /// TOML config file; defaults apply when it does not exist
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Print pass times in UTC instead of local time
    #[arg(long)]
    utc: bool,

    /// Exit non-zero when the lookup fails
    #[arg(long)]
    exit_code: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Print upcoming passes (default)
    Passes,
    /// Print the result of every lookup stage as it completes
    Trace,
}

fn pass_line(pass: &FlyoverPass, utc: bool) -> String {
    if utc {
        pass.describe(&Utc)
    } else {
        pass.describe(&Local)
    }
}

/// Lines the `trace` command prints when the pipeline enters `state`.
fn state_lines(state: &PipelineState, utc: bool) -> Vec<String> {
    match state {
        PipelineState::Start => Vec::new(),
        PipelineState::IpResolved { ip } => vec![format!("It worked! Returned IP: {}", ip)],
        PipelineState::CoordinatesResolved { coordinates, .. } => {
            vec![format!("Coordinates: {}", coordinates)]
        }
        PipelineState::PassesResolved { passes } => std::iter::once("ISS flyover times:".to_string())
            .chain(passes.iter().map(|pass| format!("  {}", pass_line(pass, utc))))
            .collect(),
        PipelineState::Failed { stage } => vec![format!("Stopped at the {} stage", stage)],
    }
}

fn error_line(err: &FlyoverError) -> String {
    format!("It didn't work: {}", err)
}

/// Exit status after a failed run; zero unless either flag asks otherwise.
fn failure_exit(cli_flag: bool, config_flag: bool) -> ExitCode {
    if cli_flag || config_flag {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = FlyoverConfig::load(&cli.config)?;

    let _logging_guard = logging::init_logging(&config.log_dir, "iss-flyover", &config.log_level)?;

    tracing::info!("ISS flyover lookup starting...");
    tracing::debug!("Endpoints: {:?}", config.endpoints);

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let pipeline = FlyoverPipeline::new(fetcher, config.endpoints.clone());

    let result = match cli.command.unwrap_or(Commands::Passes) {
        Commands::Passes => pipeline.run().await.map(|passes| {
            for pass in &passes {
                println!("{}", pass_line(pass, cli.utc));
            }
        }),
        Commands::Trace => pipeline
            .run_observed(|state| {
                for line in state_lines(state, cli.utc) {
                    println!("{}", line);
                }
            })
            .await
            .map(|_| ()),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", error_line(&e));
            Ok(failure_exit(cli.exit_code, config.exit_code_on_failure))
        }
    }
}
