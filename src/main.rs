//! Application entry point for Presentation Coach.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (writes the defaults on first run) and
//!    apply API-key environment overrides.
//! 3. Read the session JSON named on the command line.
//! 4. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the embedding and LLM clients from config.
//! 6. Run [`SessionAnalyzer::analyze`] and print the report as JSON.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use presentation_coach::{
    config::{AppConfig, AppPaths},
    embedding::{ApiEmbedder, EmbeddingProvider},
    llm::{ApiLlmClient, LlmClient},
    pipeline::{SessionAnalyzer, SessionInput},
};

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Presentation Coach starting up");

    // 2. Configuration
    let settings_file = AppPaths::new().settings_file;
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if !settings_file.exists() {
        match config.save() {
            Ok(()) => log::info!("Wrote default settings to {}", settings_file.display()),
            Err(e) => log::warn!("Could not write default settings: {e}"),
        }
    }
    config.apply_env_overrides();

    // 3. Session input
    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: presentation-coach <session.json>");
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read session file {path}"))?;
    let input: SessionInput =
        serde_json::from_str(&raw).with_context(|| format!("invalid session file {path}"))?;

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Providers
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(ApiEmbedder::from_config(&config.embedding));
    let llm: Arc<dyn LlmClient> = Arc::new(ApiLlmClient::from_config(&config.llm));
    let analyzer = SessionAnalyzer::new(embedder, llm, &config);

    // 6. Analysis
    let report = rt.block_on(analyzer.analyze(&input)).map_err(|e| {
        log::error!("analysis failed ({:?}): {e}", e.kind());
        anyhow::anyhow!("{}: {e}", e.kind().user_message())
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
