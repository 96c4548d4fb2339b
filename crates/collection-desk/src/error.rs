use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::approval::ApprovalError;
use crate::workflows::distribution::DistributionServiceError;
use std::fmt;

/// Failure surfaced to batch callers. Scoring itself never fails; only the
/// collaborators around it do.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Input(String),
    Distribution(DistributionServiceError),
    Approval(ApprovalError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Input(message) => write!(f, "input error: {}", message),
            AppError::Distribution(err) => write!(f, "distribution error: {}", err),
            AppError::Approval(err) => write!(f, "approval model error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Input(_) => None,
            AppError::Distribution(err) => Some(err),
            AppError::Approval(err) => Some(err),
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

impl From<DistributionServiceError> for AppError {
    fn from(value: DistributionServiceError) -> Self {
        Self::Distribution(value)
    }
}

impl From<ApprovalError> for AppError {
    fn from(value: ApprovalError) -> Self {
        Self::Approval(value)
    }
}
