//! Error types with source location tracking.
//!
//! Failures that abort emission — a host refusing a write, an output path
//! that cannot be computed — carry a [`Span`] pointing at the construct
//! being emitted when the failure surfaced, or the synthesized sentinel when
//! no construct is in scope.
//!
//! # Example
//!
//! ```
//! use downlevel_base::{Result, Span, SpannedError};
//!
//! fn check_target(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(SpannedError::new("output path is empty", Span::SYNTHESIZED));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_target("").is_err());
//! ```

use crate::span::Span;
use std::fmt;

/// An error annotated with its source location.
///
/// Implements [`std::error::Error`] and [`fmt::Display`]. The display format
/// is `{message} at {pos}..{end}`, or just the message for synthesized
/// locations.
#[derive(Debug, Clone)]
pub struct SpannedError {
    /// Human-readable error description.
    pub message: String,
    /// Location in source where the error occurred.
    pub span: Span,
}

impl SpannedError {
    /// Creates an error with the given message and source location.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_synthesized() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} at {}..{}", self.message, self.span.pos, self.span.end)
        }
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
pub type Result<T> = std::result::Result<T, SpannedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanned_error_display_includes_range() {
        let err = SpannedError::new("write failed", Span::new(5, 10));
        let display = format!("{}", err);
        assert!(display.contains("write failed"));
        assert!(display.contains("5..10"));
    }

    #[test]
    fn synthesized_error_display_omits_range() {
        let err = SpannedError::new("no output path", Span::SYNTHESIZED);
        assert_eq!(format!("{}", err), "no output path");
    }
}
