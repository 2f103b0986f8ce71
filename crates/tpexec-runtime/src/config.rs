//! Pool configuration

use tpexec_core::env::env_get;
use tpexec_core::error::{PoolError, PoolResult};

/// Configuration for a worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Floor for the steady-state worker count. The pool may sit below
    /// this before demand arrives unless `prestart_all_min_threads` is
    /// called.
    pub min_size: u32,

    /// Hard ceiling on live workers; never exceeded except transiently
    /// while a `set_max_pool_size` reduction converges.
    pub max_size: u32,

    /// Idle timeout in seconds after which a worker above `min_size`
    /// retires. 0 means idle workers are kept forever.
    pub keep_alive_secs: u32,

    /// Bound in seconds on the teardown wait in `Drop`. 0 waits forever.
    pub dtor_timeout_secs: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let num_cpus = std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4);

        Self {
            min_size: env_get("TPX_MIN_THREADS", 0),
            max_size: env_get("TPX_MAX_THREADS", num_cpus),
            keep_alive_secs: env_get("TPX_KEEP_ALIVE_SECS", 60),
            dtor_timeout_secs: 0,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum worker count
    pub fn min_size(mut self, n: u32) -> Self {
        self.min_size = n;
        self
    }

    /// Set the maximum worker count
    pub fn max_size(mut self, n: u32) -> Self {
        self.max_size = n;
        self
    }

    /// Set the idle timeout in seconds (0 = never retire idle workers)
    pub fn keep_alive_secs(mut self, secs: u32) -> Self {
        self.keep_alive_secs = secs;
        self
    }

    /// Set the teardown wait bound in seconds (0 = wait forever)
    pub fn dtor_timeout_secs(mut self, secs: u32) -> Self {
        self.dtor_timeout_secs = secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_size == 0 || self.min_size > self.max_size {
            return Err(PoolError::SizeOutOfRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = PoolConfig::new()
            .min_size(2)
            .max_size(8)
            .keep_alive_secs(30)
            .dtor_timeout_secs(5);

        assert_eq!(config.min_size, 2);
        assert_eq!(config.max_size, 8);
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(config.dtor_timeout_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max() {
        let config = PoolConfig::new().min_size(0).max_size(0);
        assert_eq!(
            config.validate(),
            Err(PoolError::SizeOutOfRange { min: 0, max: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_min_above_max() {
        let config = PoolConfig::new().min_size(4).max_size(2);
        assert_eq!(
            config.validate(),
            Err(PoolError::SizeOutOfRange { min: 4, max: 2 })
        );
    }

    #[test]
    fn test_default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }
}
