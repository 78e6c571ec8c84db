//! Error types for allocation engine inputs.

use crate::heir::HeirCategory;

/// Errors arising from a malformed engine call.
///
/// These are all input errors: the engine rejects the call before any
/// phase runs. An estate of zero (or a remainder nobody can take) is not
/// an error; it is reported in the [`Allocation`](crate::Allocation).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FaraidError {
    /// The net estate was below zero.
    #[error("invalid input: net estate must not be negative, got {0}")]
    NegativeEstate(f64),

    /// The net estate was NaN or infinite.
    #[error("invalid input: net estate must be a finite number")]
    NonFiniteEstate,

    /// A multi-member category carried a negative count.
    #[error("invalid input: {category} count must not be negative, got {count}")]
    NegativeCount { category: HeirCategory, count: i64 },

    /// A category carried the wrong presence shape (count for a singleton
    /// relation, or a flag for a multi-member relation).
    #[error("invalid input: {category} expects {expected}, got {actual}")]
    PresenceMismatch {
        category: HeirCategory,
        expected: &'static str,
        actual: &'static str,
    },

    /// A count does not fit the engine's member counter.
    #[error("invalid input: {category} count {count} is out of range")]
    CountOutOfRange { category: HeirCategory, count: i64 },
}

