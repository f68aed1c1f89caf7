use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ghostwriter::config::AppConfig;
use ghostwriter::llm::OllamaClient;
use ghostwriter::models::DraftMode;
use ghostwriter::pipeline::{Pipeline, ProjectStatus, StdinAnswers};
use ghostwriter::prompts::PromptBuilder;
use ghostwriter::store::ProjectStore;

#[derive(Parser)]
#[command(name = "ghostwriter")]
#[command(about = "A multi-phase ghostwriting tool using local LLMs")]
struct Cli {
    /// LLM model name (default: dolphin-llama3:8b)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Check that the model is installed before running
    #[arg(long, global = true)]
    check_model: bool,

    /// Ollama generate endpoint (the tags endpoint follows its host)
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Ollama model-listing endpoint used by --check-model
    #[arg(long, global = true)]
    ollama_tags_url: Option<String>,

    /// Attempts per completion
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an outline from raw text
    Outline {
        /// The path to the project directory
        project_path: PathBuf,
    },
    /// Conduct an interview based on the outline
    Interview {
        /// The path to the project directory
        project_path: PathBuf,
    },
    /// Write the draft from the interview data
    Write {
        /// The path to the project directory
        project_path: PathBuf,

        /// Append to the existing draft or replace it
        #[arg(long, value_enum)]
        draft_mode: Option<DraftMode>,
    },
    /// Show how far a project has progressed
    Status {
        /// The path to the project directory
        project_path: PathBuf,
    },
}

/// Phases that talk to the model.
enum Phase {
    Outline,
    Interview,
    Write,
}

/// Initialize tracing with output to stderr (for interviews) or stdout
fn init_tracing(use_stderr: bool, verbose: bool) {
    let default = if verbose {
        "ghostwriter=debug"
    } else {
        "ghostwriter=info"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    if use_stderr {
        // Interview mode: keep stdout for the questions
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Commands::Interview { .. });
    init_tracing(use_stderr, cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref());
    config.apply_env();
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(url) = cli.ollama_url {
        config.set_generate_url(url);
    }
    if let Some(url) = cli.ollama_tags_url {
        config.tags_url = url;
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }

    let (project_path, phase) = match cli.command {
        Commands::Status { project_path } => return show_status(&project_path),
        Commands::Outline { project_path } => (project_path, Phase::Outline),
        Commands::Interview { project_path } => (project_path, Phase::Interview),
        Commands::Write {
            project_path,
            draft_mode,
        } => {
            if let Some(mode) = draft_mode {
                config.draft_mode = mode;
            }
            (project_path, Phase::Write)
        }
    };

    let client =
        OllamaClient::new(config.completion_config()).context("Failed to create HTTP client")?;

    if cli.check_model {
        tracing::info!("Checking availability of model: {}", client.model());
        if !client.check_availability().await {
            anyhow::bail!("Model {} is not available", client.model());
        }
    }

    let prompts =
        PromptBuilder::new(config.author.clone()).context("Failed to load prompt templates")?;
    let pipeline = Pipeline::new(ProjectStore::new(project_path), client, prompts)
        .with_max_retries(config.max_retries)
        .with_draft_mode(config.draft_mode);

    match phase {
        Phase::Outline => {
            let report = pipeline.outline().await?;
            tracing::info!("Outline has {} points", report.points);
        }
        Phase::Interview => {
            let mut answers = StdinAnswers::new();
            let report = pipeline.interview(&mut answers).await?;
            tracing::info!(
                "Interviewed {} points ({} already done, {} failed)",
                report.interviewed,
                report.skipped,
                report.failed
            );
        }
        Phase::Write => {
            let report = pipeline.write().await?;
            tracing::info!(
                "Drafted {} scenes ({} failed, draft mode: {})",
                report.drafted,
                report.failed,
                config.draft_mode.as_str()
            );
        }
    }

    Ok(())
}

fn show_status(project_path: &Path) -> anyhow::Result<()> {
    let status = ProjectStatus::collect(&ProjectStore::new(project_path))?;
    println!("Project: {}", project_path.display());
    print!("{}", status.render());
    Ok(())
}
