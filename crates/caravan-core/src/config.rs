//! Provider configuration resolver
//!
//! Turns optional environment input into a single validated, immutable
//! [`ProviderConfig`]. Two OpenAI-compatible providers are supported: OpenAI
//! as the primary and Groq as the fallback. The Groq key takes precedence
//! whenever it is present and non-empty.
//!
//! Resolution is a pure function over an injected environment map, so tests
//! never touch process-wide state. Malformed numeric overrides fail fast
//! instead of silently falling back to defaults.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

const GROQ_API_KEY: &str = "GROQ_API_KEY";
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const GROQ_API_BASE: &str = "GROQ_API_BASE";
const OPENAI_API_BASE: &str = "OPENAI_API_BASE";
const GROQ_MODEL: &str = "GROQ_MODEL";
const OPENAI_MODEL: &str = "OPENAI_MODEL";
const AGENT_TEMPERATURE: &str = "AGENT_TEMPERATURE";
const AGENT_MAX_TOKENS: &str = "AGENT_MAX_TOKENS";
const AGENT_TIMEOUT: &str = "AGENT_TIMEOUT";
const VERBOSE: &str = "VERBOSE";
const DEBUG: &str = "DEBUG";

/// Error raised when an environment override cannot be used as configured
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric override was present but failed to parse
    #[error("invalid value {value:?} for {key}: expected a number")]
    Malformed { key: &'static str, value: String },

    /// A numeric override parsed but lies outside its documented domain
    #[error("value {value:?} for {key} is out of range: expected {expected}")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// The LLM API provider serving this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Default provider, used when no Groq credential is supplied
    OpenAi,
    /// OpenAI-compatible fallback, preferred whenever its key is set
    Groq,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_API_KEY,
            Self::Groq => GROQ_API_KEY,
        }
    }

    fn default_api_base(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4-turbo-preview",
            Self::Groq => "llama-3.3-70b-versatile",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved connection and generation parameters, immutable after [`resolve`]
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub verbose: bool,
    pub debug: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.masked_api_key())
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("verbose", &self.verbose)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Resolve a configuration from an environment mapping.
///
/// Selection rule: if `GROQ_API_KEY` is present and non-empty the provider is
/// Groq, otherwise OpenAI. Defaults apply only to variables that are entirely
/// absent; a present-but-malformed numeric override is an error.
pub fn resolve(env: &HashMap<String, String>) -> Result<ProviderConfig, ConfigError> {
    let groq_key = non_empty(env, GROQ_API_KEY);
    let provider = if groq_key.is_some() {
        Provider::Groq
    } else {
        Provider::OpenAi
    };

    let api_key = match provider {
        Provider::Groq => groq_key.unwrap_or_default(),
        Provider::OpenAi => non_empty(env, OPENAI_API_KEY).unwrap_or_default(),
    };

    let (base_var, model_var) = match provider {
        Provider::Groq => (GROQ_API_BASE, GROQ_MODEL),
        Provider::OpenAi => (OPENAI_API_BASE, OPENAI_MODEL),
    };

    let api_base = env
        .get(base_var)
        .cloned()
        .unwrap_or_else(|| provider.default_api_base().to_string());

    let model = match env.get(model_var) {
        Some(m) => m.clone(),
        None => {
            warn!(
                "{} not set, using default model {}",
                model_var,
                provider.default_model()
            );
            provider.default_model().to_string()
        }
    };

    let temperature = parse_f64(env, AGENT_TEMPERATURE, 0.7)?;
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ConfigError::OutOfRange {
            key: AGENT_TEMPERATURE,
            value: temperature.to_string(),
            expected: "0.0 to 2.0",
        });
    }

    let max_tokens = parse_u32(env, AGENT_MAX_TOKENS, 2000)?;
    if max_tokens == 0 {
        return Err(ConfigError::OutOfRange {
            key: AGENT_MAX_TOKENS,
            value: "0".to_string(),
            expected: "a positive integer",
        });
    }

    let timeout_secs = parse_u64(env, AGENT_TIMEOUT, 300)?;
    if timeout_secs == 0 {
        return Err(ConfigError::OutOfRange {
            key: AGENT_TIMEOUT,
            value: "0".to_string(),
            expected: "a positive integer",
        });
    }

    Ok(ProviderConfig {
        provider,
        api_key,
        api_base,
        model,
        temperature,
        max_tokens,
        timeout_secs,
        verbose: parse_bool(env, VERBOSE, true),
        debug: parse_bool(env, DEBUG, false),
    })
}

impl ProviderConfig {
    /// Resolve from the process environment. Library code and tests should
    /// prefer [`resolve`] with an explicit map.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        resolve(&env)
    }

    /// Whether the active provider has a usable credential.
    ///
    /// A defaulted model is deliberately not a failure; resolution already
    /// warned about it.
    pub fn validate(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("no API key configured for provider {}", self.provider);
            return false;
        }
        true
    }

    /// API key redacted for display: first 7 and last 4 characters when the
    /// key is longer than 11 characters, otherwise reported as not set.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() > 11 {
            let prefix: String = chars[..7].iter().collect();
            let suffix: String = chars[chars.len() - 4..].iter().collect();
            format!("{}***{}", prefix, suffix)
        } else {
            "NOT SET".to_string()
        }
    }

    /// Human-readable summary with the API key redacted
    pub fn summary(&self) -> String {
        format!(
            "Configuration Summary\n\
             ─────────────────────\n\
               Provider:     {}\n\
               API Key:      {}\n\
               API Base:     {}\n\
               Model:        {}\n\
               Temperature:  {}\n\
               Max Tokens:   {}\n\
               Timeout:      {}s\n\
               Verbose:      {}\n\
               Debug:        {}",
            self.provider,
            self.masked_api_key(),
            self.api_base,
            self.model,
            self.temperature,
            self.max_tokens,
            self.timeout_secs,
            self.verbose,
            self.debug,
        )
    }

    /// Operator guidance printed when [`validate`](Self::validate) fails
    pub fn remediation() -> &'static str {
        "No API key is configured.\n\
         \n\
         To fix this, either:\n\
         \n\
           Option 1 - Groq (OpenAI-compatible, free tier available):\n\
             export GROQ_API_KEY=gsk-your-groq-key\n\
             Optional: export GROQ_MODEL=llama-3.3-70b-versatile\n\
             Get a key at https://console.groq.com\n\
         \n\
           Option 2 - OpenAI:\n\
             export OPENAI_API_KEY=sk-your-openai-key\n\
             Optional: export OPENAI_MODEL=gpt-4-turbo-preview\n\
             Get a key at https://platform.openai.com/api-keys"
    }
}

fn non_empty(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty()).cloned()
}

fn parse_f64(
    env: &HashMap<String, String>,
    key: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    match env.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Malformed {
            key,
            value: raw.clone(),
        }),
    }
}

fn parse_u32(
    env: &HashMap<String, String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    match env.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Malformed {
            key,
            value: raw.clone(),
        }),
    }
}

fn parse_u64(
    env: &HashMap<String, String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match env.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Malformed {
            key,
            value: raw.clone(),
        }),
    }
}

// Matches the conventional env-var semantics: only a case-insensitive
// "true" is true, anything else present is false.
fn parse_bool(env: &HashMap<String, String>, key: &str, default: bool) -> bool {
    match env.get(key) {
        None => default,
        Some(raw) => raw.eq_ignore_ascii_case("true"),
    }
}
