//! NovaDesk command-line host.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use novadesk::models::Settings;
use novadesk::utils::config;
use novadesk::Engine;

#[derive(Parser)]
#[command(name = "novadesk", version, about = "Voice/text command launcher")]
struct Cli {
    /// Settings file (defaults to NOVADESK_CONFIG or the per-user data dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding onnx/model.onnx and tokenizer.json.
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Classify with knowledge-base word statistics instead of the model.
    #[arg(long, global = true)]
    lexical: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an utterance and act on it.
    Run {
        utterance: Vec<String>,

        /// Launch suggestion number N instead of just listing it.
        #[arg(long)]
        pick: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show how an utterance is classified without acting on it.
    Classify {
        utterance: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Interactive prompt.
    Repl {
        #[arg(long)]
        json: bool,
    },

    /// List the discovered applications.
    Apps {
        /// Only keys containing this text; also shows the best match.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Download the embedding model files.
    FetchModel {
        /// Re-download files that already exist.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Run { utterance, pick, json } => {
            let engine = start_engine(settings).await?;
            commands::intent::run_once(&engine, &utterance.join(" "), pick, json);
        }
        Commands::Classify { utterance, json } => {
            let engine = start_engine(settings).await?;
            let result = engine.classify(&utterance.join(" "));
            commands::intent::print_classification(&result, json);
        }
        Commands::Repl { json } => {
            let engine = start_engine(settings).await?;
            tokio::task::spawn_blocking(move || commands::intent::repl(&engine, json))
                .await
                .context("Prompt loop panicked")?
                .context("Failed to read from stdin")?;
        }
        Commands::Apps { filter } => {
            let index = commands::apps::build_index(&settings);
            commands::apps::list_apps(&index, filter.as_deref());
        }
        Commands::FetchModel { force } => {
            let fetched = commands::model::fetch_model(&settings, force).await?;
            println!("Fetched {} file(s) into {}", fetched, settings.model.dir.display());
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = config::settings_path(cli.config.as_deref());
    let mut settings = config::load_settings(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;

    if let Some(dir) = &cli.model_dir {
        settings.model.dir = dir.clone();
    }
    if cli.lexical {
        settings.model.lexical = true;
    }
    Ok(settings)
}

async fn start_engine(settings: Settings) -> Result<Engine> {
    println!("Initializing Brain... please wait");
    let engine = Engine::spawn_load(settings)
        .await
        .context("Failed to initialize the intent engine")?;
    log::info!("Engine ready");
    Ok(engine)
}
