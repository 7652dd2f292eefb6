//! Error types shared by the gesture pipeline

/// Rejected gesture or sampler configuration.
///
/// Raised only while building the pipeline; configuration is immutable once
/// a detector exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// A key event could not be delivered to the OS.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    #[error("failed to initialize key emitter: {0}")]
    Init(String),

    #[error("failed to send key: {0}")]
    Send(String),
}
