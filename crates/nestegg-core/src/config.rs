//! Configuration loading
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path (`--config`), which must exist
//! 2. The user config file (~/.config/nestegg/config.toml on Linux)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default. Environment variables
//! (`NESTEGG_AI_HOST`, `NESTEGG_AI_MODEL`) override the `[ai]` section last.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ai::DEFAULT_MODEL;
use crate::error::{Error, Result};
use crate::insights::RuleThresholds;
use crate::periods::{Granularity, WeekStart};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/nestegg.toml");

pub const DEFAULT_API_KEY_ENV: &str = "NESTEGG_AI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodsConfig {
    pub week_start: WeekStart,
    pub default_granularity: Granularity,
}

impl Default for PeriodsConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Monday,
            default_granularity: Granularity::Monthly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiConfig {
    /// Chat completions server; AI features are off when unset
    pub host: Option<String>,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            host: None,
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.7,
        }
    }
}

impl AiConfig {
    /// Bearer token from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("NESTEGG_AI_HOST").filter(|h| !h.trim().is_empty()) {
            self.host = Some(host);
        }
        if let Some(model) = lookup("NESTEGG_AI_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub periods: PeriodsConfig,
    pub insights: RuleThresholds,
    /// Renewals due within this many days are "upcoming"
    pub upcoming_days: i64,
    pub ai: AiConfig,
    /// File the config was read from; `None` for embedded defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            periods: PeriodsConfig::default(),
            insights: RuleThresholds::default(),
            upcoming_days: 7,
            ai: AiConfig::default(),
            source: None,
        }
    }
}

impl Config {
    /// Load from `explicit`, the user config file, or embedded defaults,
    /// then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = load_file(explicit)?;
        config.ai.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Embedded defaults only, no environment
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Parse TOML content over the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default user config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nestegg").join("config.toml"))
}

fn load_file(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return read_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => {
            debug!("Using embedded default config");
            parse_config(DEFAULT_CONFIG)
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let mut config = parse_config(&content)?;
    config.source = Some(path.to_path_buf());
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    periods: Option<RawPeriods>,
    insights: Option<RawInsights>,
    subscriptions: Option<RawSubscriptions>,
    ai: Option<RawAi>,
}

#[derive(Debug, Deserialize)]
struct RawPeriods {
    week_start: Option<String>,
    default_granularity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    weekend_ratio: Option<f64>,
    category_growth_percent: Option<f64>,
    front_loaded_percent: Option<f64>,
    improvement_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSubscriptions {
    upcoming_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawAi {
    host: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(periods) = raw.periods {
        if let Some(value) = periods.week_start {
            match value.parse::<WeekStart>() {
                Ok(week_start) => config.periods.week_start = week_start,
                Err(e) => warn!(error = %e, "Ignoring periods.week_start"),
            }
        }
        if let Some(value) = periods.default_granularity {
            match value.parse::<Granularity>() {
                Ok(granularity) => config.periods.default_granularity = granularity,
                Err(e) => warn!(error = %e, "Ignoring periods.default_granularity"),
            }
        }
    }

    if let Some(insights) = raw.insights {
        let t = &mut config.insights;
        if let Some(v) = insights.weekend_ratio {
            t.weekend_ratio = v;
        }
        if let Some(v) = insights.category_growth_percent {
            t.category_growth_percent = v;
        }
        if let Some(v) = insights.front_loaded_percent {
            t.front_loaded_percent = v;
        }
        if let Some(v) = insights.improvement_percent {
            t.improvement_percent = v;
        }
    }

    if let Some(days) = raw.subscriptions.and_then(|s| s.upcoming_days) {
        if days < 0 {
            warn!(days, "Ignoring negative subscriptions.upcoming_days");
        } else {
            config.upcoming_days = days;
        }
    }

    if let Some(ai) = raw.ai {
        if let Some(host) = ai.host.filter(|h| !h.trim().is_empty()) {
            config.ai.host = Some(host);
        }
        if let Some(model) = ai.model {
            config.ai.model = model;
        }
        if let Some(env) = ai.api_key_env {
            config.ai.api_key_env = env;
        }
        if let Some(temperature) = ai.temperature {
            config.ai.temperature = temperature;
        }
    }

    Ok(config)
}
