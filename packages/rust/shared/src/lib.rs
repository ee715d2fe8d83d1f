//! Shared types, error model, and configuration for postbrief.
//!
//! This crate is the foundation depended on by all other postbrief crates.
//! It provides:
//! - [`PostbriefError`]: the unified error type
//! - Domain types ([`BlogPost`], [`SummaryResult`], [`ScoreRecord`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, HashnodeConfig, LlmConfig, SummaryConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_api_key, validate_api_key,
};
pub use error::{PostbriefError, Result};
pub use types::{BlogPost, RunId, ScoreRecord, SummaryResult};
