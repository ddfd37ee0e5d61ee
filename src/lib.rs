mod array;
pub mod bench;
pub mod error;
pub mod linked;
pub mod sequence;
pub mod vector;

pub use {
    error::{Result, SequenceError},
    linked::SequenceList,
    sequence::Sequence,
    vector::SequenceVector,
};
