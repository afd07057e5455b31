use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised while compiling or emitting a distribution plan.
///
/// Every variant is terminal for the current run: these indicate a
/// configuration defect, not a transient condition, so nothing is retried
/// and no partial plan ever reaches the emitter.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Duplicate tier identifier: {0}")]
    DuplicateTier(String),

    #[error("Tier registry must contain at least one tier")]
    EmptyRegistry,

    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    #[error("No origin location registered for tier: {0}")]
    OriginNotFound(String),

    #[error("No signing key registered for tier: {0}")]
    SignerNotFound(String),

    #[error("Inconsistent distribution plan: {0}")]
    PlanInconsistency(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Emit error: {0}")]
    EmitError(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::EmitError(err.to_string())
    }
}
