//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides [`LlmConfig::api_key`].
pub const LLM_API_KEY_ENV: &str = "COACH_LLM_API_KEY";
/// Environment variable that overrides [`EmbeddingConfig::api_key`].
pub const EMBEDDING_API_KEY_ENV: &str = "COACH_EMBEDDING_API_KEY";

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection settings for the language model that classifies slides,
/// suggests talking points and writes coaching feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (`/v1/chat/completions` is
    /// appended).
    pub base_url: String,
    /// API key, `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Maximum seconds to wait for a single completion.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:7b".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// EmbeddingConfig
// ---------------------------------------------------------------------------

/// Connection settings for the sentence-embedding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible API (`/v1/embeddings` is appended).
    pub base_url: String,
    /// API key, `None` for local providers.
    pub api_key: Option<String>,
    /// Embedding model identifier.
    pub model: String,
    /// Maximum seconds to wait for one batch.
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            api_key: None,
            model: "sentence-transformers/all-MiniLM-L6-v2".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AlignmentConfig
// ---------------------------------------------------------------------------

/// Thresholds for outline matching and slide block grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Segments whose best cosine similarity falls strictly below this value
    /// are reported as off-topic.
    pub similarity_threshold: f64,
    /// Number of transcript sentences per block for slide checks.
    pub block_size: usize,
    /// Minimum trimmed outline length accepted by the analyzer.
    pub min_outline_chars: usize,
    /// Block classification calls allowed in flight per slide.
    pub max_concurrent_checks: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.45,
            block_size: 3,
            min_outline_chars: 20,
            max_concurrent_checks: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// RetryConfig
// ---------------------------------------------------------------------------

/// Backoff applied to rate-limited feedback requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay_secs: u64,
    /// Factor applied to the delay after every failed attempt.
    pub multiplier: u32,
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_secs: 5,
            multiplier: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// MetricsConfig
// ---------------------------------------------------------------------------

/// Filler-word vocabularies, stored as comma-separated lists so they are easy
/// to edit by hand in `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub filler_words_tr: String,
    pub filler_words_en: String,
}

impl MetricsConfig {
    /// Turkish then English filler words, trimmed, empties removed.
    pub fn filler_words(&self) -> Vec<String> {
        self.filler_words_tr
            .split(',')
            .chain(self.filler_words_en.split(','))
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            filler_words_tr: "yani,şey,işte,hani,ee,ııı,mmm,aaa".into(),
            filler_words_en: "um,uh,like,you know,basically,actually,literally,so".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use presentation_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.alignment.similarity_threshold > 0.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub alignment: AlignmentConfig,
    pub retry: RetryConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace API keys with values from the environment when set and
    /// non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(LLM_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = lookup(EMBEDDING_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.embedding.api_key = Some(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
