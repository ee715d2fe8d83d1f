//! Application configuration for postbrief.
//!
//! User config lives at `~/.postbrief/postbrief.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PostbriefError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "postbrief.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".postbrief";

// ---------------------------------------------------------------------------
// Config structs (matching postbrief.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Publishing platform API settings.
    #[serde(default)]
    pub hashnode: HashnodeConfig,

    /// Language-model backend settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Summarization agent settings.
    #[serde(default)]
    pub summary: SummaryConfig,
}

/// `[hashnode]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashnodeConfig {
    /// GraphQL endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for HashnodeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://gql.hashnode.com".into()
}
fn default_fetch_timeout() -> u64 {
    30
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used by the summarization agent.
    #[serde(default = "default_agent_model")]
    pub agent_model: String,

    /// Model used by the LLM-judged scorers.
    #[serde(default = "default_judge_model")]
    pub judge_model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            agent_model: default_agent_model(),
            judge_model: default_judge_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_api_key_env() -> String {
    "GROQ_API_KEY".into()
}
fn default_agent_model() -> String {
    "llama-3.3-70b-versatile".into()
}
fn default_judge_model() -> String {
    "openai/gpt-oss-20b".into()
}
fn default_llm_timeout() -> u64 {
    120
}

/// `[summary]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Post bodies are cut to this many characters before reaching the model.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Upper bound on model round-trips per agent call.
    #[serde(default = "default_max_tool_steps")]
    pub max_tool_steps: u32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            max_tool_steps: default_max_tool_steps(),
        }
    }
}

fn default_max_content_chars() -> usize {
    10_000
}
fn default_max_tool_steps() -> u32 {
    5
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.postbrief/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PostbriefError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.postbrief/postbrief.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PostbriefError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PostbriefError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PostbriefError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PostbriefError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PostbriefError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the model API key from the configured env var.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.llm.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(PostbriefError::config(format!(
            "model API key not found. Set the {var_name} environment variable."
        ))),
    }
}

/// Check that the model API key env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    resolve_api_key(config).map(|_| ())
}
