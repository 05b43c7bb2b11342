//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the hydrator.
//!
//! ## Environment Variables
//!
//! ### `HYDRATOR_TYPE_CACHE`
//!
//! Set to `off`, `0` or `false` to disable the type descriptor cache. Every
//! hydration then rebuilds the descriptors it needs. Useful when chasing a
//! suspected stale registration; there is no other reason to turn it off.
//!
//! Default: enabled
//!
//! ### `HYDRATOR_MAX_DEPTH`
//!
//! Maximum nesting depth of recursive hydration. A type whose non-nullable field
//! refers back to itself would otherwise recurse forever while defaulting.
//! Accepts a decimal value.
//!
//! Default: `64`
//!
//! ## Usage
//!
//! ```rust
//! use hydrator::HydratorConfig;
//!
//! let config = HydratorConfig::from_env();
//! println!("cache enabled: {}, max depth: {}", config.cache_enabled, config.max_depth);
//! ```
//!
//! ## Example Configuration
//!
//! ```bash
//! export HYDRATOR_TYPE_CACHE=off
//! export HYDRATOR_MAX_DEPTH=16
//! cargo run
//! ```

use std::env;

const DEFAULT_MAX_DEPTH: usize = 64;

/// Hydrator configuration, usually loaded once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydratorConfig {
    /// Keep type descriptors between calls (default: true)
    pub cache_enabled: bool,
    /// Maximum nesting depth of recursive hydration (default: 64)
    pub max_depth: usize,
}

impl Default for HydratorConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HydratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cache_enabled = match lookup("HYDRATOR_TYPE_CACHE") {
            Some(val) => !matches!(
                val.trim().to_ascii_lowercase().as_str(),
                "off" | "0" | "false"
            ),
            None => true,
        };
        let max_depth = lookup("HYDRATOR_MAX_DEPTH")
            .and_then(|val| val.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_DEPTH);
        HydratorConfig {
            cache_enabled,
            max_depth,
        }
    }
}
