use thiserror::Error;

/// Result alias for scenario loading and validation
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Everything that can be wrong with a scenario before it reaches the core
///
/// The simulation core itself does not validate; these checks are the host's
/// side of the contract.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A vector field did not have exactly three components.
    #[error("{field}: expected 3 components, got {len}")]
    BadVector { field: String, len: usize },

    /// A scalar that must be >= 0 was negative.
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: String, value: f64 },

    /// NaN or infinite input.
    #[error("{field} must be finite")]
    NonFinite { field: String },

    /// Plane normal of (near) zero length.
    #[error("hard_bodies[{index}]: normal must be nonzero")]
    ZeroNormal { index: usize },

    /// Extent axis parallel to the plane normal.
    #[error("hard_bodies[{index}]: extent u_axis must not be parallel to the normal")]
    BadExtentAxis { index: usize },

    /// Frame step must be positive.
    #[error("engine.dt must be > 0, got {0}")]
    NonPositiveDt(f64),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
