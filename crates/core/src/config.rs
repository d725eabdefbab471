use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::SalaryBand;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct PolicyConfig {
    pub lower_multiplier: Decimal,
    pub upper_multiplier: Decimal,
    pub max_reporting_depth: u32,
}

impl PolicyConfig {
    pub fn band(&self) -> SalaryBand {
        SalaryBand {
            lower_multiplier: self.lower_multiplier,
            upper_multiplier: self.upper_multiplier,
        }
    }
}

#[derive(Clone, Debug)]
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
    pub lower_multiplier: Option<Decimal>,
    pub upper_multiplier: Option<Decimal>,
    pub max_reporting_depth: Option<u32>,
    pub log_level: Option<String>,
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
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig {
                lower_multiplier: Decimal::new(12, 1),
                upper_multiplier: Decimal::new(15, 1),
                max_reporting_depth: 4,
            },
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

impl AppConfig {
    /// Precedence: defaults < file < environment < programmatic
    /// overrides; validated last.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("orglens.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(policy) = patch.policy {
            if let Some(value) = policy.lower_multiplier {
                self.policy.lower_multiplier = parse_decimal("policy.lower_multiplier", &value)?;
            }
            if let Some(value) = policy.upper_multiplier {
                self.policy.upper_multiplier = parse_decimal("policy.upper_multiplier", &value)?;
            }
            if let Some(value) = policy.max_reporting_depth {
                self.policy.max_reporting_depth = value;
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

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ORGLENS_POLICY_LOWER_MULTIPLIER") {
            self.policy.lower_multiplier =
                parse_decimal("ORGLENS_POLICY_LOWER_MULTIPLIER", &value)?;
        }
        if let Some(value) = read_env("ORGLENS_POLICY_UPPER_MULTIPLIER") {
            self.policy.upper_multiplier =
                parse_decimal("ORGLENS_POLICY_UPPER_MULTIPLIER", &value)?;
        }
        if let Some(value) = read_env("ORGLENS_POLICY_MAX_REPORTING_DEPTH") {
            self.policy.max_reporting_depth =
                parse_u32("ORGLENS_POLICY_MAX_REPORTING_DEPTH", &value)?;
        }

        let log_level =
            read_env("ORGLENS_LOGGING_LEVEL").or_else(|| read_env("ORGLENS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ORGLENS_LOGGING_FORMAT").or_else(|| read_env("ORGLENS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(lower_multiplier) = overrides.lower_multiplier {
            self.policy.lower_multiplier = lower_multiplier;
        }
        if let Some(upper_multiplier) = overrides.upper_multiplier {
            self.policy.upper_multiplier = upper_multiplier;
        }
        if let Some(max_reporting_depth) = overrides.max_reporting_depth {
            self.policy.max_reporting_depth = max_reporting_depth;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_policy(&self.policy)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("orglens.toml"), PathBuf::from("config/orglens.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    if policy.lower_multiplier <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "policy.lower_multiplier must be greater than zero".to_string(),
        ));
    }

    if policy.lower_multiplier > policy.upper_multiplier {
        return Err(ConfigError::Validation(
            "policy.lower_multiplier must not exceed policy.upper_multiplier".to_string(),
        ));
    }

    if policy.max_reporting_depth > 1000 {
        return Err(ConfigError::Validation(
            "policy.max_reporting_depth must be at most 1000".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

// Multipliers travel as strings so the file and env paths share one
// exact-decimal parse, instead of going through a float.
fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.trim().parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    policy: Option<PolicyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyPatch {
    lower_multiplier: Option<String>,
    upper_multiplier: Option<String>,
    max_reporting_depth: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
