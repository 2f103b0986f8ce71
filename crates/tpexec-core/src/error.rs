//! Error types for pool operations

use core::fmt;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur when driving a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Operation rejected because the pool is no longer running
    NotRunning,

    /// Requested sizes violate `1 <= max` and `min <= max`
    SizeOutOfRange {
        /// Minimum size involved in the rejected request
        min: u32,
        /// Maximum size involved in the rejected request
        max: u32,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::NotRunning => write!(f, "pool is not running"),
            PoolError::SizeOutOfRange { min, max } => {
                write!(f, "pool sizes out of range: min={} max={}", min, max)
            }
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PoolError::NotRunning;
        assert_eq!(format!("{}", e), "pool is not running");

        let e = PoolError::SizeOutOfRange { min: 4, max: 2 };
        assert_eq!(format!("{}", e), "pool sizes out of range: min=4 max=2");
    }
}
