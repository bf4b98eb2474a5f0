//! Shabd - English to Hindi Phrase-Based Lookup Translation
//!
//! Command line entry point: translation of text and files, training data import,
//! model rebuild and status reporting.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use shabd::cli::{Args, Commands};
use shabd::config::Config;
use shabd::error::ShabdError;
use shabd::workflow::Workflow;

const DEFAULT_CONFIG_FILE: &str = "shabd.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting Shabd - English to Hindi lookup translation");

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Wrote configuration to {}", output.display());
        }
        Commands::Translate { text, input, output, flatten } => {
            let preserve_formatting = !flatten && config.engine.preserve_formatting;
            let workflow = Workflow::new(config)?;
            let translation = match (text, input) {
                (Some(text), _) => {
                    let response = workflow.service().translate(&text, preserve_formatting);
                    if !response.success {
                        let message = response.error.unwrap_or_default();
                        return Err(anyhow::anyhow!("Translation failed: {}", message));
                    }
                    if let Some(output) = &output {
                        tokio::fs::write(output, &response.translation).await?;
                    }
                    response.translation
                }
                (None, Some(input)) => {
                    info!("Translating file: {}", input.display());
                    workflow
                        .translate_file(&input, output.as_deref(), preserve_formatting)
                        .await?
                }
                (None, None) => {
                    return Err(ShabdError::Config(
                        "Provide either --text or --input".to_string(),
                    )
                    .into());
                }
            };

            if output.is_none() {
                println!("{}", translation);
            }
        }
        Commands::Batch { input_dir, output_dir } => {
            info!("Processing directory: {}", input_dir.display());
            let workflow = Workflow::new(config)?;
            let count = workflow.translate_directory(&input_dir, output_dir.as_ref()).await?;
            println!("Translated {} files", count);
        }
        Commands::Train { input, rebuild } => {
            info!("Importing training data: {}", input.display());
            let workflow = Workflow::new(config)?;
            let summary = workflow.import_training_file(&input, rebuild).await?;

            println!("\nTraining Data Import:");
            println!("Submitted pairs: {}", summary.submitted);
            println!("Accepted pairs: {}", summary.accepted);
            println!("Rejected pairs: {}", summary.rejected);
            println!("Corpus size: {}", summary.corpus_size);

            if let Some(rebuild) = summary.rebuild {
                println!("{}", rebuild.message);
                println!("Word map size: {}", rebuild.word_map_size);
                println!("Phrase map size: {}", rebuild.phrase_map_size);
            }
        }
        Commands::Rebuild => {
            let workflow = Workflow::new(config)?;
            let response = workflow.service().rebuild_model();
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.success {
                return Err(anyhow::anyhow!("Rebuild failed: {}", response.message));
            }
        }
        Commands::Health => {
            let workflow = Workflow::new(config)?;
            let response = workflow.service().health();
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Status => {
            let workflow = Workflow::new(config)?;
            let response = workflow.service().data_status();
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    info!("Shabd completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".shabd").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "shabd.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so translations on stdout stay clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber.try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("shabd.log").display());

    Ok(())
}
