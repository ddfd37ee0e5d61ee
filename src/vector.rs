use {
    crate::{
        array::Array,
        error::{Result, SequenceError},
        sequence::{next_container_id, Sequence},
    },
    std::{
        fmt::{Debug, Formatter, Result as fmt_Result},
        mem,
        slice,
    },
    tracing::trace,
};

/// Capacity of a freshly built vector
pub const INITIAL_CAPACITY: usize = 2;

/// arr: Array<T>,
///   the block holding the values, its size is the capacity
/// len: usize,
///   current number of values, always strictly below the capacity
/// id: u64,
///   identity of this container, stamped into every Position it hands out
pub struct SequenceVector<T> {
    arr: Array<T>,
    len: usize,
    id: u64,
}

/// A logical index into one particular [`SequenceVector`].
///
/// Two positions are equal when they come from the same container and hold the
/// same index. `index == len` is the end position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    owner: u64,
    index: usize,
}

impl Position {
    pub fn index(&self) -> usize {
        self.index
    }
}

// Public methods
impl<T> SequenceVector<T> {
    /// Creates a new empty vector
    pub fn new() -> Self {
        SequenceVector {
            arr: Array::new(INITIAL_CAPACITY),
            len: 0,
            id: next_container_id(),
        }
    }

    /// Returns the number of values in the vector
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.arr.size()
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is always initialised
        unsafe { self.arr.slice(self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: same as as_slice, and the borrow is exclusive
        unsafe { self.arr.slice_mut(self.len) }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// True when `other` is this very container, not just one with equal contents
    pub fn identical(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// Pushes `value` to the back of the vector
    pub fn append(&mut self, value: T) {
        self.grow_if_full();
        unsafe { self.arr.write(self.len, value) };
        self.len += 1;
    }

    /// Pushes `value` to the front of the vector, shifting everything right
    pub fn prepend(&mut self, value: T) {
        self.put(0, value);
    }

    /// Inserts `value` at `pos`, shifting `pos` and everything after it right by one
    pub fn insert(&mut self, pos: Position, value: T) -> Result<Position> {
        let index = self.check(pos)?;
        self.put(index, value);
        Ok(pos)
    }

    /// Pops and returns the value at the front of the vector
    pub fn pop_first(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        Ok(self.take(0))
    }

    /// Pops and returns the value at the back of the vector
    pub fn pop_last(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        Ok(self.take(self.len - 1))
    }

    /// Removes and returns the value at `pos`. Afterwards `pos` names the value
    /// that used to follow it.
    pub fn erase(&mut self, pos: Position) -> Result<T> {
        let index = self.check(pos)?;
        if index == self.len {
            return Err(SequenceError::OutOfRange);
        }
        Ok(self.take(index))
    }

    /// Removes every value in `[first, last)` and closes the gap
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<()> {
        let from = self.check(first)?;
        let to = self.check(last)?;
        if to < from {
            return Err(SequenceError::OutOfRange);
        }
        let range = to - from;
        if range == 0 {
            return Ok(());
        }

        let tail = self.len - to;
        // if a destructor panics the tail leaks instead of being dropped twice
        self.len = from;
        unsafe {
            self.arr.drop_range(from, range);
            self.arr.shift_from(to, tail, -(range as isize));
        }
        self.len = from + tail;
        Ok(())
    }

    pub fn begin(&self) -> Position {
        self.position(0)
    }

    pub fn end(&self) -> Position {
        self.position(self.len)
    }

    /// The position one step after `pos`
    pub fn next(&self, pos: Position) -> Result<Position> {
        let index = self.check(pos)?;
        if index >= self.len {
            return Err(SequenceError::OutOfRange);
        }
        Ok(self.position(index + 1))
    }

    /// The position one step before `pos`
    pub fn prev(&self, pos: Position) -> Result<Position> {
        let index = self.check(pos)?;
        if index == 0 {
            return Err(SequenceError::OutOfRange);
        }
        Ok(self.position(index - 1))
    }

    /// Jumps `n` places, the destination has to stay within `[0, len]`
    pub fn offset(&self, pos: Position, n: isize) -> Result<Position> {
        let index = self.check(pos)?;
        match index.checked_add_signed(n) {
            Some(dest) if dest <= self.len => Ok(self.position(dest)),
            _ => Err(SequenceError::OutOfRange),
        }
    }

    /// Gets the value at `pos`
    pub fn get(&self, pos: Position) -> Result<&T> {
        let index = self.check(pos)?;
        self.as_slice().get(index).ok_or(SequenceError::OutOfRange)
    }

    pub fn get_mut(&mut self, pos: Position) -> Result<&mut T> {
        let index = self.check(pos)?;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(SequenceError::OutOfRange)
    }
}

// Private methods
impl<T> SequenceVector<T> {
    fn position(&self, index: usize) -> Position {
        Position {
            owner: self.id,
            index,
        }
    }

    /// Resolves `pos` to an index in `[0, len]`
    fn check(&self, pos: Position) -> Result<usize> {
        if pos.owner != self.id || pos.index > self.len {
            return Err(SequenceError::OutOfRange);
        }
        Ok(pos.index)
    }

    /// Doubles the capacity when one more value would fill the block
    fn grow_if_full(&mut self) {
        if self.len + 1 == self.arr.size() {
            let cap = self.arr.size() * 2;
            trace!(len = self.len, from = self.arr.size(), to = cap, "growing vector");
            unsafe { self.arr.resize(cap, self.len) };
        }
    }

    /// Backend for prepend and insert, `index` is already known to be in `[0, len]`
    fn put(&mut self, index: usize, value: T) {
        self.grow_if_full();
        unsafe {
            // shift from the index to the right one
            self.arr.shift_from(index, self.len - index, 1);
            // insert the value at the new opening
            self.arr.write(index, value);
        }
        self.len += 1;
    }

    /// Backend for the pop and erase methods, `index` is already known to be below `len`
    fn take(&mut self, index: usize) -> T {
        let old = unsafe { self.arr.read(index) };
        unsafe { self.arr.shift_from(index + 1, self.len - index - 1, -1) };
        self.len -= 1;
        old
    }
}

impl<T> Sequence<T> for SequenceVector<T> {
    type Position = Position;

    fn len(&self) -> usize {
        self.len()
    }

    fn append(&mut self, value: T) {
        self.append(value)
    }

    fn prepend(&mut self, value: T) {
        self.prepend(value)
    }

    fn insert(&mut self, pos: Position, value: T) -> Result<Position> {
        self.insert(pos, value)
    }

    fn pop_first(&mut self) -> Result<T> {
        self.pop_first()
    }

    fn pop_last(&mut self) -> Result<T> {
        self.pop_last()
    }

    fn erase(&mut self, pos: Position) -> Result<T> {
        self.erase(pos)
    }

    fn erase_range(&mut self, first: Position, last: Position) -> Result<()> {
        self.erase_range(first, last)
    }

    fn begin(&self) -> Position {
        self.begin()
    }

    fn end(&self) -> Position {
        self.end()
    }

    fn next(&self, pos: Position) -> Result<Position> {
        self.next(pos)
    }

    fn prev(&self, pos: Position) -> Result<Position> {
        self.prev(pos)
    }

    fn offset(&self, pos: Position, n: isize) -> Result<Position> {
        self.offset(pos, n)
    }

    fn get(&self, pos: Position) -> Result<&T> {
        self.get(pos)
    }
}

// Trait implementations
impl<T> Default for SequenceVector<T> {
    fn default() -> Self {
        Self::new()
    }
} impl<T> Drop for SequenceVector<T> {
    fn drop(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        unsafe { self.arr.drop_range(0, len) };
    }
} impl<T: Clone> Clone for SequenceVector<T> {
    fn clone(&self) -> Self {
        // copy value by value into a fresh vector, it gets its own identity
        self.iter().cloned().collect()
    }
} impl<T: Debug> Debug for SequenceVector<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        f.debug_list().entries(self.iter()).finish()
    }
} impl<T: PartialEq> PartialEq for SequenceVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
} impl<T: Eq> Eq for SequenceVector<T> {
} impl<T> Extend<T> for SequenceVector<T> {
    fn extend<U: IntoIterator<Item = T>>(&mut self, other: U) {
        for val in other {
            self.append(val);
        }
    }
} impl<T> FromIterator<T> for SequenceVector<T> {
    fn from_iter<U: IntoIterator<Item = T>>(iter: U) -> Self {
        let mut v = SequenceVector::new();
        v.extend(iter);
        v
    }
} impl<T, const N: usize> From<[T; N]> for SequenceVector<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
} impl<'a, T> IntoIterator for &'a SequenceVector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
} impl<T> IntoIterator for SequenceVector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        // take the block out, leaving an empty one behind for our own Drop
        let back = mem::replace(&mut self.len, 0);
        let arr = mem::replace(&mut self.arr, Array::new(0));
        IntoIter { arr, front: 0, back }
    }
}

/// Owning iterator over a [`SequenceVector`], values in `[front, back)` are still live
pub struct IntoIter<T> {
    arr: Array<T>,
    front: usize,
    back: usize,
} impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.front += 1;
        Some(unsafe { self.arr.read(self.front - 1) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
} impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(unsafe { self.arr.read(self.back) })
    }
} impl<T> ExactSizeIterator for IntoIter<T> {
} impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        unsafe { self.arr.drop_range(self.front, self.back - self.front) };
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{SequenceVector, INITIAL_CAPACITY},
        crate::error::SequenceError,
    };

    #[test]
    fn capacity_doubles_on_second_append() {
        let mut v: SequenceVector<u8> = SequenceVector::new();
        assert_eq!(v.capacity(), INITIAL_CAPACITY);
        v.append(1);
        assert_eq!(v.capacity(), 2);
        v.append(2);
        assert_eq!(v.capacity(), 4);
        v.append(3);
        assert_eq!(v.capacity(), 4);
        v.append(4);
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.as_slice(), [1, 2, 3, 4]);
    }

    #[test]
    fn every_insert_path_grows_the_same() {
        let mut a: SequenceVector<u8> = SequenceVector::new();
        let mut b: SequenceVector<u8> = SequenceVector::new();
        let mut c: SequenceVector<u8> = SequenceVector::new();
        for i in 0..9 {
            a.append(i);
            b.prepend(i);
            let end = c.end();
            c.insert(end, i).unwrap();
            assert_eq!(a.capacity(), b.capacity());
            assert_eq!(a.capacity(), c.capacity());
            assert!(a.len() < a.capacity());
        }
        assert_eq!(a.capacity(), 16);
    }

    #[test]
    fn insert_in_the_middle() -> Result<(), SequenceError> {
        let mut v = SequenceVector::from([1, 2, 4, 5]);
        let at = v.offset(v.begin(), 2)?;
        let pos = v.insert(at, 3)?;
        assert_eq!(pos.index(), 2);
        assert_eq!(*v.get(pos)?, 3);
        assert_eq!(v.as_slice(), [1, 2, 3, 4, 5]);

        let past = v.position(v.len() + 1);
        assert_eq!(v.insert(past, 9), Err(SequenceError::OutOfRange));
        Ok(())
    }

    #[test]
    fn erase_keeps_position_on_follower() -> Result<(), SequenceError> {
        let mut v = SequenceVector::from(['a', 'b', 'c']);
        let pos = v.next(v.begin())?;
        assert_eq!(v.erase(pos)?, 'b');
        assert_eq!(*v.get(pos)?, 'c');
        assert_eq!(pos.index(), 1);
        assert_eq!(v.end().index(), 2);
        assert_eq!(v.erase(v.end()), Err(SequenceError::OutOfRange));
        Ok(())
    }

    #[test]
    fn erase_range_cases() -> Result<(), SequenceError> {
        let mut v: SequenceVector<String> = (0..6).map(|i| i.to_string()).collect();
        let first = v.offset(v.begin(), 1)?;
        let last = v.offset(v.begin(), 4)?;

        assert_eq!(v.erase_range(last, first), Err(SequenceError::OutOfRange));
        assert_eq!(v.len(), 6);

        v.erase_range(first, first)?;
        assert_eq!(v.len(), 6);

        v.erase_range(first, last)?;
        assert_eq!(v.as_slice(), ["0", "4", "5"]);

        v.erase_range(v.begin(), v.end())?;
        assert!(v.is_empty());
        Ok(())
    }

    #[test]
    fn boundaries() -> Result<(), SequenceError> {
        let v = SequenceVector::from([10, 20]);
        assert_eq!(v.get(v.end()), Err(SequenceError::OutOfRange));
        assert_eq!(v.next(v.end()), Err(SequenceError::OutOfRange));
        assert_eq!(v.prev(v.begin()), Err(SequenceError::OutOfRange));
        assert_eq!(v.offset(v.begin(), 3), Err(SequenceError::OutOfRange));
        assert_eq!(v.offset(v.end(), -3), Err(SequenceError::OutOfRange));
        assert_eq!(v.offset(v.begin(), 2)?, v.end());
        assert_eq!(*v.get(v.offset(v.end(), -1)?)?, 20);
        Ok(())
    }

    #[test]
    fn foreign_positions_are_rejected() {
        let a = SequenceVector::from([1, 2]);
        let mut b = SequenceVector::from([1, 2]);
        assert_ne!(a.begin(), b.begin());
        assert_eq!(b.erase(a.begin()), Err(SequenceError::OutOfRange));
        assert_eq!(b.get(a.begin()), Err(SequenceError::OutOfRange));
    }

    #[test]
    fn take_resets_source() {
        let mut v = SequenceVector::from([1, 2, 3, 4]);
        let moved = std::mem::take(&mut v);
        assert_eq!(moved.as_slice(), [1, 2, 3, 4]);
        assert!(v.is_empty());
        assert_eq!(v.capacity(), INITIAL_CAPACITY);
        v.append(7);
        assert_eq!(v.as_slice(), [7]);
    }

    #[test]
    fn clone_is_deep_and_distinct() {
        let v = SequenceVector::from([String::from("x"), String::from("y")]);
        let mut c = v.clone();
        assert_eq!(c, v);
        assert!(!c.identical(&v));
        assert!(v.identical(&v));
        c.as_mut_slice()[0].push('!');
        assert_eq!(v.as_slice(), ["x", "y"]);
    }

    #[test]
    fn owned_iteration_from_both_ends() {
        let v: SequenceVector<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let mut it = v.into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next().as_deref(), Some("a"));
        assert_eq!(it.next_back().as_deref(), Some("d"));
        // "b" and "c" get dropped with the iterator
    }

    #[test]
    fn debug_lists_values() {
        let v = SequenceVector::from([1, 2]);
        assert_eq!(format!("{:?}", v), "[1, 2]");
    }
}
