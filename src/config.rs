//! Configuration loaded from health_compass.toml and environment variables.
//!
//! The credential and other runtime-only values never live in the TOML file;
//! they are read from the environment once at startup into an explicit config
//! object, so nothing downstream touches `std::env` implicitly.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub assessment: AssessmentConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Assessment provider settings. `temperature` is a policy knob, fixed low to
/// bias toward consistent output; it is configuration, never user-facing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssessmentConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout_ms: u64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.2,
            request_timeout_ms: 30_000,
        }
    }
}

/// Terminal UI settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Event poll interval in milliseconds
    pub tick_ms: u64,
    /// Diagnostics go to this file; stderr would corrupt the alternate screen
    pub log_file: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            log_file: "health-compass.log".to_string(),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gemini_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            log_level: "health_compass=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    fn load_from_env() -> Self {
        let mut runtime = Self::default();

        runtime.gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !is_placeholder(k));

        if let Ok(level) = std::env::var("HC_LOG")
            && !level.trim().is_empty()
        {
            runtime.log_level = level;
        }

        runtime
    }
}

/// Keys copied from a template `.env` are as good as absent.
pub(crate) fn is_placeholder(s: &str) -> bool {
    let t = s.trim();
    t.is_empty()
        || t.contains("${")
        || t.eq_ignore_ascii_case("your-api-key-here")
        || t.eq_ignore_ascii_case("changeme")
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses HEALTH_COMPASS_CONFIG or defaults to "health_compass.toml".
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("HEALTH_COMPASS_CONFIG")
            .unwrap_or_else(|_| "health_compass.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        // Env overrides (env-first)
        if let Ok(provider) = std::env::var("HC_PROVIDER") {
            config.assessment.provider = provider;
        }
        if let Ok(model) = std::env::var("HC_MODEL") {
            config.assessment.model = model;
        }
        if let Some(temp) = std::env::var("HC_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
        {
            config.assessment.temperature = temp;
        }
        if let Some(timeout) = std::env::var("HC_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.assessment.request_timeout_ms = timeout;
        }

        config.runtime = RuntimeConfig::load_from_env();

        // Validate and clamp
        if !(0.0..=1.0).contains(&config.assessment.temperature) {
            tracing::warn!(
                "temperature {} outside [0.0, 1.0], clamping",
                config.assessment.temperature
            );
            config.assessment.temperature = config.assessment.temperature.clamp(0.0, 1.0);
        }
        if config.assessment.request_timeout_ms < 1_000 {
            tracing::warn!(
                "request_timeout_ms {} too low, raising to 1000",
                config.assessment.request_timeout_ms
            );
            config.assessment.request_timeout_ms = 1_000;
        }
        if config.assessment.model.trim().is_empty() {
            anyhow::bail!("assessment.model must not be empty");
        }
        if config.ui.tick_ms == 0 {
            config.ui.tick_ms = 100;
        }

        Ok(config)
    }
}
