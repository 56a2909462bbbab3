//! Shared error types and progress reporting for the EEG source imaging core.

use thiserror::Error;

/// Errors surfaced by the ESI core.
///
/// Per the propagation policy: `InputInvalid` and `Io` are returned to the
/// caller and short-circuit the current operation. `NumericDegenerate` is
/// usually absorbed at the call site (logged via `tracing::warn!` and the
/// computation continues with a clamped value) but is typed so a genuinely
/// unrecoverable case (e.g. a non-finite electrode row in the lead field)
/// can still be propagated with `?` instead of panicking.
#[derive(Error, Debug)]
pub enum EsiError {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("numeric degeneracy: {0}")]
    NumericDegenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("other error: {0}")]
    Other(String),
}

/// Result type used throughout the ESI core crates.
pub type Result<T> = std::result::Result<T, EsiError>;

/// A multi-part progress gauge. Implementations receive scalar progress
/// updates and may answer cancellation queries; builders only check
/// [`ProgressReporter::is_cancelled`] at regularization-loop boundaries,
/// never inside a single eigendecomposition or per-source loop.
pub trait ProgressReporter: Send + Sync {
    /// Declare how many discrete parts this run will report progress for,
    /// and the total unit count of each part.
    fn set_range(&self, parts: &[(&str, u64)]);

    /// Advance the named part by `by` units.
    fn advance(&self, part: &str, by: u64);

    /// Whether the caller has asked the current operation to stop early.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A [`ProgressReporter`] that does nothing; the default when the caller
/// passes no gauge.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn set_range(&self, _parts: &[(&str, u64)]) {}
    fn advance(&self, _part: &str, _by: u64) {}
}
