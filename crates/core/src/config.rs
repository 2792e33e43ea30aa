use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
pub const STAGING_DIR_VAR: &str = "POLICY_STAGING_DIR";
pub const EMBEDDING_ENDPOINT_VAR: &str = "EMBEDDING_ENDPOINT";

pub const DEFAULT_STAGING_DIR: &str = "data/uploads";

/// Runtime configuration for the policy assistant.
#[derive(Debug)]
pub struct Config {
    /// Credential for the Groq answer-generation API. Required; checked
    /// before any generation call is attempted.
    pub groq_api_key: String,
    /// Directory where uploaded PDFs are staged before parsing.
    pub staging_dir: PathBuf,
    /// Optional remote embedding endpoint. Absent means the local
    /// deterministic embedder is used.
    pub embedding_endpoint: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, failing fast on a
    /// missing credential.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            groq_api_key: load_env(GROQ_API_KEY_VAR)?,
            staging_dir: load_env_optional(STAGING_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR)),
            embedding_endpoint: load_env_optional(EMBEDDING_ENDPOINT_VAR),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
