//! Error types for summary construction and update.

use core::fmt;

/// Failure reported by a host collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostError {
    /// Host operation that failed (e.g. `load_page`).
    pub op: &'static str,
    /// Host-provided detail.
    pub message: String,
}

impl HostError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host {} failed: {}", self.op, self.message)
    }
}

impl std::error::Error for HostError {}

/// A page whose children could not be loaded or walked.
///
/// Never aborts a summary: the composer logs it and omits the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalFailure {
    /// Display name of the page.
    pub page: String,
    /// Underlying host failure.
    pub source: HostError,
}

impl TraversalFailure {
    pub fn new(page: impl Into<String>, source: HostError) -> Self {
        Self {
            page: page.into(),
            source,
        }
    }
}

impl fmt::Display for TraversalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page '{}' could not be traversed: {}", self.page, self.source)
    }
}

impl std::error::Error for TraversalFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Error surfaced by the generate and update operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SummaryError {
    /// No node on the current page carries the identity marker.
    NotFound { marker: String },
    /// Host failed while materializing, placing or removing a summary.
    Host(HostError),
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { marker } => {
                write!(f, "no existing summary named '{}' to update", marker)
            }
            Self::Host(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SummaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Host(err) => Some(err),
        }
    }
}

impl From<HostError> for SummaryError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn traversal_failure_names_page_and_host_operation() {
        let err = TraversalFailure::new("Intro", HostError::new("load_page", "timeout"));
        assert_eq!(
            err.to_string(),
            "page 'Intro' could not be traversed: host load_page failed: timeout"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn summary_error_wraps_host_error() {
        let err: SummaryError = HostError::new("remove", "locked").into();
        assert_eq!(err.to_string(), "host remove failed: locked");
        let missing = SummaryError::NotFound {
            marker: "Table of Contents".to_string(),
        };
        assert!(missing.source().is_none());
        assert!(missing.to_string().contains("Table of Contents"));
    }
}
