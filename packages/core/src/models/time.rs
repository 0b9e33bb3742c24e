//! Time Provider Abstraction
//!
//! Provides a trait-based abstraction for time operations to enable
//! deterministic testing without thread sleeps. Every stamped field in this
//! crate (`lastSync`, `exportedAt`, `restoredAt`, stats timestamps) is
//! wall-clock-generated, so tests compare snapshots up to these fields or
//! pin them through a mock provider.
//!
//! # Examples
//!
//! ```rust
//! use flowgraph_core::models::time::{TimeProvider, SystemTimeProvider};
//! use chrono::Utc;
//!
//! let provider = SystemTimeProvider;
//! let now = provider.now();
//! assert!(now <= Utc::now());
//! ```

use chrono::{DateTime, Utc};

/// Trait for providing current time
///
/// This abstraction enables:
/// - Deterministic testing (use `MockTimeProvider`)
/// - Time-based testing without thread sleeps
/// - Easier testing of time-dependent logic
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider using actual system clock
///
/// This is the default implementation for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for testing
///
/// Returns a fixed instant so merge/restore stamps are reproducible.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_time: DateTime<Utc>,
}

#[cfg(test)]
impl MockTimeProvider {
    /// Create a new mock time provider starting at the current time
    pub fn new() -> Self {
        Self {
            current_time: Utc::now(),
        }
    }

    /// Create a mock time provider with a specific starting time
    pub fn with_time(time: DateTime<Utc>) -> Self {
        Self { current_time: time }
    }
}

#[cfg(test)]
impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.current_time
    }
}

#[cfg(test)]
impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}
