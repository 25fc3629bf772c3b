use std::fmt;

/// Variables that must be set before starting a client.
pub const REQUIRED_VARS: [&str; 4] = [
    "AZURE_OPENAI_API_KEY",
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_VERSION",
    "AZURE_OPENAI_DEPLOYMENT",
];

/// Read by other OpenAI client libraries; accepted when the Azure one is absent.
pub const FALLBACK_API_VERSION_VAR: &str = "OPENAI_API_VERSION";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config.missing_variable: {0}")]
    Missing(&'static str),
    #[error("config.invalid_variable: {0}")]
    Invalid(&'static str),
}

/// Configuration for Azure OpenAI API access.
#[derive(Clone)]
pub struct AzureOpenAIConfig {
    pub api_key: String,
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    pub temperature: f32,
}

impl AzureOpenAIConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - AZURE_OPENAI_API_KEY, AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_DEPLOYMENT: required
    /// - AZURE_OPENAI_API_VERSION: required, falls back to OPENAI_API_VERSION
    /// - AZURE_OPENAI_TEMPERATURE: sampling temperature (default: 0.7)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let api_version = match get("AZURE_OPENAI_API_VERSION") {
            Some(version) => version,
            None => get(FALLBACK_API_VERSION_VAR)
                .ok_or(ConfigError::Missing("AZURE_OPENAI_API_VERSION"))?,
        };

        let temperature = match get("AZURE_OPENAI_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|_| ConfigError::Invalid("AZURE_OPENAI_TEMPERATURE"))?,
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            api_key: require("AZURE_OPENAI_API_KEY")?,
            endpoint: require("AZURE_OPENAI_ENDPOINT")?,
            deployment: require("AZURE_OPENAI_DEPLOYMENT")?,
            api_version,
            temperature,
        })
    }
}

impl fmt::Debug for AzureOpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Required variables absent from the environment.
pub fn missing_required_vars() -> Vec<&'static str> {
    missing_vars_in(|key| std::env::var(key).ok())
}

/// Logs one warning per required variable absent from the environment.
pub fn warn_missing_vars() {
    for var in missing_required_vars() {
        tracing::warn!(
            "Warning: {} not found in environment. Please set it in your .env file.",
            var
        );
    }
}

pub fn missing_vars_in(lookup: impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
    let is_set = |key: &str| lookup(key).is_some_and(|value| !value.trim().is_empty());

    REQUIRED_VARS
        .into_iter()
        .filter(|key| match *key {
            "AZURE_OPENAI_API_VERSION" => {
                !is_set("AZURE_OPENAI_API_VERSION") && !is_set(FALLBACK_API_VERSION_VAR)
            }
            other => !is_set(other),
        })
        .collect()
}
