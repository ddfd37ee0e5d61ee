//! Errors raised by the sequence containers

use thiserror::Error;

/// The two ways a container operation can fail.
///
/// Every fallible operation checks its preconditions before touching the
/// storage, so a returned error always leaves the container as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceError {
    /// `pop_first` / `pop_last` on a container with no elements
    #[error("container is empty")]
    EmptyContainer,

    /// A position that does not name an element, or a step across a boundary
    #[error("position out of range")]
    OutOfRange,
}

pub type Result<T, E = SequenceError> = std::result::Result<T, E>;
