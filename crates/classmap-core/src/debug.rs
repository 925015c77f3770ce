//! Debug message collection.

use std::sync::{Mutex, PoisonError};

use itertools::Itertools;

use crate::error::ConfigError;

/// Substitution site in a wrap format string.
const PLACEHOLDER: &str = "%s";

/// Append-only list of diagnostic messages.
///
/// Disabled logs drop every message. The list is internally synchronized so
/// a log can be shared between threads scanning files in parallel.
#[derive(Debug, Default)]
pub struct DebugLog {
    enabled: bool,
    messages: Mutex<Vec<String>>,
}

impl DebugLog {
    /// Create a log that records messages only when `enabled` is set.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Create a log that drops everything.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Whether messages are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a message. Also forwarded to `tracing` at debug level.
    pub fn push(&self, message: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let message = message.into();
        tracing::debug!(target: "classmap", "{message}");
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    /// Snapshot of all recorded messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Join all messages with `delimiter` and substitute the result into
    /// `wrap`, which must contain exactly one `%s`.
    pub fn formatted(&self, delimiter: &str, wrap: &str) -> Result<String, ConfigError> {
        let found = wrap.matches(PLACEHOLDER).count();
        if found != 1 {
            return Err(ConfigError::Placeholder {
                wrap: wrap.to_string(),
                found,
            });
        }
        let joined = self
            .messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .join(delimiter);
        Ok(wrap.replacen(PLACEHOLDER, &joined, 1))
    }
}
