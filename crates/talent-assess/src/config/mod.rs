use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::assessment::GenerationPlan;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the assessment tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
    pub generation: GenerationPlan,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("ASSESS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_path = env::var("ASSESS_DATA_PATH").unwrap_or_else(|_| "assessments.json".to_string());
        let roster_path = env::var("ASSESS_ROSTER_PATH").unwrap_or_else(|_| "roster.json".to_string());
        let log_level = env::var("ASSESS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut generation = GenerationPlan::default();
        if let Ok(raw) = env::var("ASSESS_TECHNICAL_THRESHOLD") {
            generation.technical_threshold =
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        variable: "ASSESS_TECHNICAL_THRESHOLD",
                    })?;
        }

        Ok(Self {
            environment,
            storage: StorageConfig {
                data_path: PathBuf::from(data_path),
                roster_path: PathBuf::from(roster_path),
            },
            telemetry: TelemetryConfig { log_level },
            generation,
        })
    }
}

/// Files backing the CLI's store and the job/candidate roster.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_path: PathBuf,
    pub roster_path: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
