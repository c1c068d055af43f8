use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::insights::InsightConfig;
use crate::recommend::DEFAULT_TOP_K;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub recommend: RecommendConfig,
    pub insights: InsightConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommendConfig {
    pub top_k: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub top_k: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recommend: RecommendConfig { top_k: DEFAULT_TOP_K },
            insights: InsightConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    recommend: Option<RecommendPatch>,
    insights: Option<InsightsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendPatch {
    top_k: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct InsightsPatch {
    combo_keyword: Option<String>,
    combo_min_customers: Option<usize>,
    budget_gap_keywords: Option<Vec<String>>,
    budget_gap_threshold: Option<f64>,
    cross_sell_keywords: Option<Vec<String>>,
    cross_sell_min_customers: Option<usize>,
    stock_alert_keywords: Option<Vec<String>>,
    stock_demand_supply_ratio: Option<f64>,
    premium_budget_threshold: Option<f64>,
    premium_min_customers: Option<usize>,
    relevance_alert_floor: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("marketlens.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(recommend) = patch.recommend {
            if let Some(top_k) = recommend.top_k {
                self.recommend.top_k = top_k;
            }
        }

        if let Some(insights) = patch.insights {
            if let Some(combo_keyword) = insights.combo_keyword {
                self.insights.combo_keyword = combo_keyword;
            }
            if let Some(combo_min_customers) = insights.combo_min_customers {
                self.insights.combo_min_customers = combo_min_customers;
            }
            if let Some(budget_gap_keywords) = insights.budget_gap_keywords {
                self.insights.budget_gap_keywords = budget_gap_keywords;
            }
            if let Some(budget_gap_threshold) = insights.budget_gap_threshold {
                self.insights.budget_gap_threshold = budget_gap_threshold;
            }
            if let Some(cross_sell_keywords) = insights.cross_sell_keywords {
                self.insights.cross_sell_keywords = cross_sell_keywords;
            }
            if let Some(cross_sell_min_customers) = insights.cross_sell_min_customers {
                self.insights.cross_sell_min_customers = cross_sell_min_customers;
            }
            if let Some(stock_alert_keywords) = insights.stock_alert_keywords {
                self.insights.stock_alert_keywords = stock_alert_keywords;
            }
            if let Some(stock_demand_supply_ratio) = insights.stock_demand_supply_ratio {
                self.insights.stock_demand_supply_ratio = stock_demand_supply_ratio;
            }
            if let Some(premium_budget_threshold) = insights.premium_budget_threshold {
                self.insights.premium_budget_threshold = premium_budget_threshold;
            }
            if let Some(premium_min_customers) = insights.premium_min_customers {
                self.insights.premium_min_customers = premium_min_customers;
            }
            if let Some(relevance_alert_floor) = insights.relevance_alert_floor {
                self.insights.relevance_alert_floor = relevance_alert_floor;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MARKETLENS_RECOMMEND_TOP_K") {
            self.recommend.top_k = parse_usize("MARKETLENS_RECOMMEND_TOP_K", &value)?;
        }
        if let Some(value) = read_env("MARKETLENS_INSIGHTS_PREMIUM_BUDGET_THRESHOLD") {
            self.insights.premium_budget_threshold =
                parse_f64("MARKETLENS_INSIGHTS_PREMIUM_BUDGET_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("MARKETLENS_INSIGHTS_BUDGET_GAP_THRESHOLD") {
            self.insights.budget_gap_threshold =
                parse_f64("MARKETLENS_INSIGHTS_BUDGET_GAP_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("MARKETLENS_INSIGHTS_RELEVANCE_ALERT_FLOOR") {
            self.insights.relevance_alert_floor =
                parse_f64("MARKETLENS_INSIGHTS_RELEVANCE_ALERT_FLOOR", &value)?;
        }

        let log_level =
            read_env("MARKETLENS_LOGGING_LEVEL").or_else(|| read_env("MARKETLENS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MARKETLENS_LOGGING_FORMAT").or_else(|| read_env("MARKETLENS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(top_k) = overrides.top_k {
            self.recommend.top_k = top_k;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recommend.top_k == 0 {
            return Err(ConfigError::Validation(
                "recommend.top_k must be greater than zero".to_string(),
            ));
        }
        if self.insights.stock_demand_supply_ratio <= 0.0 {
            return Err(ConfigError::Validation(
                "insights.stock_demand_supply_ratio must be positive".to_string(),
            ));
        }
        if self.insights.budget_gap_threshold < 0.0 {
            return Err(ConfigError::Validation(
                "insights.budget_gap_threshold must be non-negative".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.insights.relevance_alert_floor) {
            return Err(ConfigError::Validation(
                "insights.relevance_alert_floor must be within [0, 100]".to_string(),
            ));
        }
        if self.insights.budget_gap_keywords.is_empty()
            || self.insights.cross_sell_keywords.is_empty()
            || self.insights.stock_alert_keywords.is_empty()
        {
            return Err(ConfigError::Validation(
                "insight keyword segments must be non-empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("logging.level must be non-empty".to_string()));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("marketlens.toml"), PathBuf::from("config/marketlens.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
