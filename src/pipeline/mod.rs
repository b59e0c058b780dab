//! Request-level orchestration.
//!
//! [`SessionAnalyzer`] wires metrics, outline alignment, feedback and the
//! optional slide-by-slide analysis into one call and reports failures with a
//! [`FailureKind`] the caller can turn into a user-facing message.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use presentation_coach::config::AppConfig;
//! use presentation_coach::embedding::ApiEmbedder;
//! use presentation_coach::llm::ApiLlmClient;
//! use presentation_coach::pipeline::{SessionAnalyzer, SessionInput};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let analyzer = SessionAnalyzer::new(
//!         Arc::new(ApiEmbedder::from_config(&config.embedding)),
//!         Arc::new(ApiLlmClient::from_config(&config.llm)),
//!         &config,
//!     );
//!
//!     let input: SessionInput = serde_json::from_str(
//!         r#"{"outline_text": "Intro\nBody\nConclusion",
//!             "transcript": {"text": "", "segments": [], "duration": 0.0}}"#,
//!     )
//!     .unwrap();
//!     let report = analyzer.analyze(&input).await.unwrap();
//!     println!("{}", report.alignment_summary.coverage_rate);
//! }
//! ```

pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{AnalysisReport, FailureKind, PipelineError, SessionAnalyzer, SessionInput};
