//! Banter server binary: loads configuration, wires the scoring engine
//! to its completion provider, and serves the HTTP API.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use banter_server::{build_router, state::AppState};

use banter_core::{
    ContentJudge, DebateOpponent, DebateScorer, EngineConfig, OpenAiCompletionClient,
    ProsodyAnalyzer, SpeechSynthesizer,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "banter-server",
    version,
    about = "Debate practice backend with AI opponent and performance scoring"
)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Path to a TOML engine config; defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter_server=debug,banter_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let api_base = env::var("OPENAI_API_BASE")
        .or_else(|_| env::var("OPENAI_BASE_URL"))
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
    let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();

    let (judge, opponent) = if api_key.is_empty() {
        warn!("OPENAI_API_KEY not set; content judging and the debate opponent are disabled");
        (ContentJudge::disabled(), None)
    } else {
        let judge_client = OpenAiCompletionClient::new(
            &api_base,
            &api_key,
            &config.judge.model,
            config.judge.timeout(),
        )?;
        let opponent_client = OpenAiCompletionClient::new(
            &api_base,
            &api_key,
            &config.opponent.model,
            config.opponent.timeout(),
        )?;
        (
            ContentJudge::new(Arc::new(judge_client)),
            Some(DebateOpponent::new(
                Arc::new(opponent_client),
                config.opponent.max_tokens,
            )),
        )
    };

    let scorer = DebateScorer::new(ProsodyAnalyzer::new(config.prosody.clone()), judge);

    let speech = if config.voice.enabled {
        match SpeechSynthesizer::new(&config.voice.voice).await {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("TTS unavailable, voice rebuttals disabled: {e}");
                None
            }
        }
    } else {
        None
    };

    let app = build_router(AppState::new(scorer, opponent, speech));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
