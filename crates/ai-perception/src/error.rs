use thiserror::Error;

/// Configuration problems caught when a sensor or the noise manager is built.
///
/// None of these can happen mid-tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerceptionError {
    #[error("sensor radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("field of view must be in (0, 360] degrees, got {0}")]
    InvalidFov(f32),

    #[error("scan rate must be positive, got {0}")]
    InvalidScanRate(f32),

    #[error("noise priority must be in 1..=3, got {0}")]
    InvalidPriority(u8),

    #[error("invalid noise setting `{field}`: {value}")]
    InvalidNoise { field: &'static str, value: f32 },

    #[error("agent {agent} has no head reference to look from")]
    MissingHeadReference { agent: u64 },
}
