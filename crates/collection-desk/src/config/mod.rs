use std::env;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the desk engine and its batch jobs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub distribution: DistributionConfig,
    pub forecast: ForecastConfig,
    pub approval_model_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let mut telemetry = TelemetryConfig::for_environment(environment, log_level);
        if let Ok(raw) = env::var("APP_LOG_FORMAT") {
            telemetry.format =
                LogFormat::parse(&raw).ok_or(ConfigError::UnknownLogFormat(raw))?;
        }

        let defaults = DistributionConfig::default();
        let distribution = DistributionConfig {
            max_load: parse_env("DESK_MAX_LOAD", defaults.max_load)?,
            high_tier_percent: parse_env("DESK_HIGH_TIER_PERCENT", defaults.high_tier_percent)?,
            medium_tier_percent: parse_env(
                "DESK_MEDIUM_TIER_PERCENT",
                defaults.medium_tier_percent,
            )?,
        };
        distribution.validate()?;

        let defaults = ForecastConfig::default();
        let forecast = ForecastConfig {
            annual_discount_rate: parse_env("FORECAST_DISCOUNT_RATE", defaults.annual_discount_rate)?,
            collection_cost_ratio: parse_env(
                "FORECAST_COLLECTION_COST",
                defaults.collection_cost_ratio,
            )?,
        };

        let approval_model_path = env::var("APPROVAL_MODEL_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            telemetry,
            distribution,
            forecast,
            approval_model_path,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Line layout for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event.
    Compact,
    /// Multi-line events with source locations.
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl TelemetryConfig {
    /// Pretty, colored output while developing; plain compact lines for test
    /// runs and production, where logs are captured rather than read live.
    pub fn for_environment(environment: AppEnvironment, log_level: String) -> Self {
        match environment {
            AppEnvironment::Development => Self {
                log_level,
                format: LogFormat::Pretty,
                ansi: true,
            },
            AppEnvironment::Test | AppEnvironment::Production => Self {
                log_level,
                format: LogFormat::Compact,
                ansi: false,
            },
        }
    }
}

/// Capacity and banding dials for a distribution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub max_load: u32,
    pub high_tier_percent: u8,
    pub medium_tier_percent: u8,
}

impl DistributionConfig {
    pub fn with_max_load(max_load: u32) -> Self {
        Self {
            max_load,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if u16::from(self.high_tier_percent) + u16::from(self.medium_tier_percent) > 100 {
            return Err(ConfigError::InvalidTierSplit {
                high: self.high_tier_percent,
                medium: self.medium_tier_percent,
            });
        }
        Ok(())
    }
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            max_load: 60,
            high_tier_percent: 30,
            medium_tier_percent: 40,
        }
    }
}

/// Financial parameters for the return forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub annual_discount_rate: f64,
    pub collection_cost_ratio: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            annual_discount_rate: 0.15,
            collection_cost_ratio: 0.15,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str },
    InvalidTierSplit { high: u8, medium: u8 },
    UnknownLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a valid number"),
            ConfigError::InvalidTierSplit { high, medium } => write!(
                f,
                "tier split {high}% + {medium}% exceeds 100% of the credit pool"
            ),
            ConfigError::UnknownLogFormat(raw) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty', got '{raw}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
