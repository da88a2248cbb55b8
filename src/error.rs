use thiserror::Error;

/// Errors raised while assembling a vehicle model.
///
/// Evaluation-time code never returns these: bad in-flight inputs fall back
/// to finite degenerate outputs instead of faulting the simulation loop.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid polar: {0}")]
    InvalidPolar(String),

    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    #[error("Invalid mass distribution: {0}")]
    InvalidMass(String),

    #[error("Failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON config: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
