//! Crate-wide error type.

use thiserror::Error;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by registry construction and policy parameters.
///
/// Runtime data problems (empty histories, missing peers, sparse patterns)
/// are deliberately not errors; those paths return well-defined defaults or
/// advisory variants instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Registry construction was given an empty arm list.
    #[error("arm registry requires at least one arm")]
    NoArms,
    /// Registry construction was given a repeated arm name.
    #[error("duplicate arm name: {0}")]
    DuplicateArm(String),
    /// An operation referenced an arm the registry does not contain.
    #[error("unknown arm: {0}")]
    UnknownArm(String),
    /// Epsilon-greedy exploration rate outside `[0, 1]`.
    #[error("epsilon must be in [0, 1], got {0}")]
    EpsilonOutOfRange(f64),
    /// UCB exploration constant that is not finite and positive.
    #[error("exploration constant must be finite and > 0, got {0}")]
    ExplorationOutOfRange(f64),
}
