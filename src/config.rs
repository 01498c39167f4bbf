//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the settings a [`Dispatcher`](crate::Dispatcher)
//! is built with. Both fields only affect logging; dispatch semantics are fixed.

use std::borrow::Cow;

/// Settings for a dispatcher instance.
///
/// ## Field semantics
/// - `name`: recorded as the `dispatcher` field on every log event
/// - `log_payloads`: include the payload in the per-emit trace event
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Label used in log events. Useful when a process runs several dispatchers.
    pub name: Cow<'static, str>,

    /// Whether emit trace events carry the payload.
    ///
    /// Off by default: payloads may be large or sensitive.
    pub log_payloads: bool,
}

impl DispatcherConfig {
    /// Creates a config with the given name and default settings otherwise.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with payload logging switched on or off.
    #[inline]
    pub fn with_log_payloads(mut self, on: bool) -> Self {
        self.log_payloads = on;
        self
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `name = "default"`
    /// - `log_payloads = false`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("default"),
            log_payloads: false,
        }
    }
}
