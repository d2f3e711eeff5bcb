use std::time::Duration;

/// Vendor utility names probed when none are given, in order. Names that
/// resolve to the same executable are only queried once.
pub const DEFAULT_UTILITIES: &[&str] = &["storcli64", "storcli", "perccli64", "perccli"];

/// Upper bound for a single utility invocation
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-metric limits for drive error counters. A counter faults only when
/// it is strictly greater than its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub predictive_failures: u64,
    pub media_errors: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            predictive_failures: 0,
            // Single spurious media errors are common on healthy drives
            media_errors: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Dump reconciled controller state to stderr
    pub debug_output: bool,
    pub utility_search_order: Vec<String>,
    pub thresholds: Thresholds,
    pub command_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug_output: false,
            utility_search_order: DEFAULT_UTILITIES.iter().map(|s| s.to_string()).collect(),
            thresholds: Thresholds::default(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}
