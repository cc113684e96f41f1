//! errors.rs - Custom error types for the message-filter library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `message-filter` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
///
/// Note that per-rule compilation failures never surface here: a rule that
/// fails to compile is skipped, because one bad rule must not block message
/// delivery or the rules that follow it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FilterError {
    /// The configuration string is not a JSON array of rule objects.
    /// The previously active rule list stays in effect.
    #[error("Filter list is not a valid JSON rule array: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Rule {0}: pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(usize, usize, usize),

    #[error("Failed to compile rule {0}: {1}")]
    RuleCompilation(usize, regex::Error),
}
