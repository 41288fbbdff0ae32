use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::{
    CatalogError, ExportError, GenerationError, LifecycleViolation, RepositoryError,
    ResponseServiceError,
};
use std::fmt;

/// Failure surfaced by the command-line tooling.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Export(ExportError),
    Repository(RepositoryError),
    Generation(GenerationError),
    Catalog(CatalogError),
    Responses(ResponseServiceError),
    Lifecycle(LifecycleViolation),
    /// A referenced job, candidate, assessment, or response could not be found.
    Missing(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid JSON data: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Repository(err) => write!(f, "storage error: {}", err),
            AppError::Generation(err) => write!(f, "generation error: {}", err),
            AppError::Catalog(err) => write!(f, "assessment error: {}", err),
            AppError::Responses(err) => write!(f, "response error: {}", err),
            AppError::Lifecycle(err) => write!(f, "response error: {}", err),
            AppError::Missing(what) => write!(f, "not found: {}", what),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Generation(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Responses(err) => Some(err),
            AppError::Lifecycle(err) => Some(err),
            AppError::Missing(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<GenerationError> for AppError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ResponseServiceError> for AppError {
    fn from(value: ResponseServiceError) -> Self {
        Self::Responses(value)
    }
}

impl From<LifecycleViolation> for AppError {
    fn from(value: LifecycleViolation) -> Self {
        Self::Lifecycle(value)
    }
}
