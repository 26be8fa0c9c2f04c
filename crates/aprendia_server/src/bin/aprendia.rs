//! Aprendia - bilingual story and quiz generation service.

use aprendia_core::{
    DEFAULT_CONVERSATION_TYPE, LevelParams, MetricsExporter, init_observability,
};
use aprendia_models::{GeminiClient, GoogleGenerationClient};
use aprendia_pipeline::{new_story_prompt, parse_pairs, title_prompt};
use aprendia_server::{AppConfig, build_app};
use aprendia_storage::InMemoryRepository;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "aprendia")]
#[command(about = "Aprendia - leveled bilingual stories with audio")]
#[command(version)]
struct Cli {
    /// Path to configuration file (default: aprendia.toml if present)
    #[arg(short, long, global = true, env = "APRENDIA_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print a rendered prompt
    Prompt {
        #[command(subcommand)]
        kind: PromptKind,
    },
    /// Generate one chapter with the live provider and print its pairs
    Generate(ChapterArgs),
    /// Print the effective configuration with keys masked
    Config,
}

#[derive(Subcommand, Debug)]
enum PromptKind {
    /// First chapter of a new story
    NewStory(ChapterArgs),
    /// Story title suggestion
    Title {
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "A1")]
        language_level: String,
        #[arg(long, default_value = "toddler")]
        age_level: String,
        #[arg(long, default_value = DEFAULT_CONVERSATION_TYPE)]
        conversation_type: String,
    },
}

#[derive(Args, Debug)]
struct ChapterArgs {
    #[arg(long, default_value = "en")]
    source_locale: String,
    #[arg(long, default_value = "es")]
    target_locale: String,
    #[arg(long, default_value = "A1")]
    language_level: String,
    #[arg(long, default_value = "toddler")]
    age_level: String,
    #[arg(long)]
    topic: String,
    #[arg(long, default_value = DEFAULT_CONVERSATION_TYPE)]
    conversation_type: String,
    #[arg(long, default_value_t = 3)]
    min_sentence_length: u32,
    #[arg(long, default_value_t = 10)]
    max_sentence_length: u32,
}

impl ChapterArgs {
    fn params(&self) -> LevelParams {
        LevelParams::new(
            self.language_level.clone(),
            self.age_level.clone(),
            self.topic.clone(),
            self.conversation_type.clone(),
            self.min_sentence_length,
            self.max_sentence_length,
        )
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Prompt { kind } => {
            let prompt = match kind {
                PromptKind::NewStory(args) => {
                    new_story_prompt(&args.source_locale, &args.target_locale, &args.params())
                }
                PromptKind::Title {
                    topic,
                    language_level,
                    age_level,
                    conversation_type,
                } => title_prompt(&topic, &language_level, &age_level, &conversation_type),
            };
            println!("{}", prompt);
        }
        Command::Config => {
            let config = AppConfig::load(cli.config.as_deref())?;
            println!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Command::Generate(args) => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let client = GeminiClient::new(config.gemini_config()?)?;
            let prompt = new_story_prompt(&args.source_locale, &args.target_locale, &args.params());

            info!(model = client.model_name(), topic = %args.topic, "Generating chapter");
            let raw = client.generate(&prompt).await?;
            let pairs = parse_pairs(&raw);
            if pairs.is_empty() {
                warn!("No sentence pairs in output; raw text follows");
                println!("{}", raw);
            }
            for pair in pairs {
                println!("{:>2}. {}\n    {}", pair.order + 1, pair.first, pair.second);
            }
        }
        Command::Serve { bind } => {
            let mut config = AppConfig::load(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config = config.with_bind_address(bind);
            }
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let _observability = match init_observability(
        "aprendia",
        MetricsExporter::from_env(),
        60,
    ) {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!(error = %e, "Metrics export disabled");
            None
        }
    };

    let client = Arc::new(GoogleGenerationClient::new(
        config.gemini_config()?,
        config.tts_config()?,
    )?);
    let repository = Arc::new(InMemoryRepository::new());

    tokio::fs::create_dir_all(config.audio_dir()).await?;
    let (_service, router) = build_app(&config, client, repository);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(
        address = %config.bind_address(),
        audio_dir = %config.audio_dir().display(),
        max_concurrent_jobs = config.max_concurrent_jobs(),
        "Aprendia listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await?;
    Ok(())
}
