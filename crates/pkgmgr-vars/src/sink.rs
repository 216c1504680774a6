//! Collected, non-fatal errors
//!
//! Provides [`ErrorSink`], the shared place where resolution and loading
//! problems accumulate so one pass reports all of them.

use std::fmt::{self, Display, Formatter};

/// Ordered list of non-fatal error messages
///
/// Callers decide success by checking [`ErrorSink::is_empty`] after a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSink {
    messages: Vec<String>,
}

impl ErrorSink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(error = %message, "collected error");
        self.messages.push(message);
    }

    /// Number of recorded errors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when nothing has been recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True when an identical message has been recorded
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }

    /// Iterate over recorded messages in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Forget every recorded error
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Display for ErrorSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_starts_empty() {
        let sink = ErrorSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
    }

    #[test]
    fn sink_keeps_order() {
        let mut sink = ErrorSink::new();
        sink.add_error("first");
        sink.add_error(String::from("second"));

        assert_eq!(sink.len(), 2);
        assert!(sink.contains("second"));
        assert_eq!(sink.iter().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(sink.to_string(), "first; second");
    }

    #[test]
    fn sink_clear() {
        let mut sink = ErrorSink::new();
        sink.add_error("oops");
        sink.clear();
        assert!(sink.is_empty());
    }
}
