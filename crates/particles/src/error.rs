//! Error types for particle simulations.

/// Errors raised while building a simulation from its configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParticleFieldError {
    /// The configuration violates a constraint (ages out of order, non-finite values...).
    #[error("invalid particle configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for particle operations.
pub type Result<T> = std::result::Result<T, ParticleFieldError>;
