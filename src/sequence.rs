use {
    crate::error::Result,
    std::{
        fmt::Debug,
        sync::atomic::{AtomicU64, Ordering},
    },
};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out a process-unique identity for a freshly built container.
/// Positions carry this id so a container can reject positions taken from another one.
pub(crate) fn next_container_id() -> u64 {
    NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
}

/// The operation set shared by [`SequenceList`](crate::SequenceList) and
/// [`SequenceVector`](crate::SequenceVector).
///
/// Positions are plain values that don't borrow the container, they're only
/// meaningful to the container that produced them. `end()` is one past the last
/// element and never names a value.
pub trait Sequence<T>: Default {
    type Position: Copy + Eq + Debug;

    /// Number of elements held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `value` after the last element
    fn append(&mut self, value: T);

    /// Adds `value` before the first element
    fn prepend(&mut self, value: T);

    /// Adds `value` right before `pos`, returning the position of the new element
    fn insert(&mut self, pos: Self::Position, value: T) -> Result<Self::Position>;

    fn pop_first(&mut self) -> Result<T>;

    fn pop_last(&mut self) -> Result<T>;

    /// Removes and returns the element at `pos`
    fn erase(&mut self, pos: Self::Position) -> Result<T>;

    /// Removes every element in `[first, last)`
    fn erase_range(&mut self, first: Self::Position, last: Self::Position) -> Result<()>;

    fn begin(&self) -> Self::Position;

    fn end(&self) -> Self::Position;

    fn next(&self, pos: Self::Position) -> Result<Self::Position>;

    fn prev(&self, pos: Self::Position) -> Result<Self::Position>;

    /// Moves `n` steps forward (or backward for negative `n`)
    fn offset(&self, pos: Self::Position, n: isize) -> Result<Self::Position>;

    fn get(&self, pos: Self::Position) -> Result<&T>;
}
