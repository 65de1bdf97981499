use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.wanikani.com/v2";
pub const DEFAULT_REVIEW_PATH: &str = "review.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Run-scoped configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    /// Path to a jmdict-simplified JSON file.
    pub dict_path: PathBuf,
    /// Where the pre-push review document is written.
    pub review_path: PathBuf,
    pub synonym_capacity: usize,
    pub max_definitions: usize,
    pub max_definition_len: usize,
}

impl Config {
    /// Missing credentials or dictionary path abort the run before any
    /// network call is made.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("WANIKANI_API_KEY")?;
        let dict_path = required("DICT_PATH")?.into();

        let api_url = env::var("WANIKANI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let review_path = env::var("REVIEW_PATH")
            .unwrap_or_else(|_| DEFAULT_REVIEW_PATH.to_string())
            .into();

        Ok(Config {
            api_key,
            api_url,
            dict_path,
            review_path,
            synonym_capacity: parsed_var("SYNONYM_CAPACITY", 8),
            max_definitions: parsed_var("MAX_DEFINITIONS", 5),
            max_definition_len: parsed_var("MAX_DEFINITION_LEN", 64),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parsed_var(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
