use {
    crate::{
        error::{Result, SequenceError},
        sequence::{next_container_id, Sequence},
    },
    std::fmt::{Debug, Formatter, Result as fmt_Result},
};

// Sentinel slots, they live for as long as the list does
const HEAD: usize = 0;
const TAIL: usize = 1;
// Link value for "nothing there", only head.prev and tail.next hold it
const NIL: usize = usize::MAX;

/// value: Option<T>,
///   None for the sentinels and for vacant slots
/// prev / next: usize,
///   slot indices of the neighbours; links never own anything, the slab does
/// generation: u64,
///   bumped every time the slot is vacated so stale positions can be told apart
struct Node<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
    generation: u64,
}

impl<T> Node<T> {
    fn sentinel(prev: usize, next: usize) -> Self {
        Node {
            value: None,
            prev,
            next,
            generation: 0,
        }
    }
}

/// A doubly linked list bounded by two permanent sentinel nodes.
///
/// Nodes are kept in a slab owned by the list and refer to each other by slot
/// index. Slots freed by erase/pop go on a free stack and get reused by the next
/// insertion.
pub struct SequenceList<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    len: usize,
    id: u64,
}

/// Names one node of one particular [`SequenceList`], the tail sentinel included.
///
/// A position stays valid across any mutation that doesn't erase its own node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    owner: u64,
    slot: usize,
    generation: u64,
}

// Public methods
impl<T> SequenceList<T> {
    /// Creates an empty list, just the two sentinels pointing at each other
    pub fn new() -> Self {
        SequenceList {
            nodes: vec![Node::sentinel(NIL, TAIL), Node::sentinel(HEAD, NIL)],
            free: Vec::new(),
            len: 0,
            id: next_container_id(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when `other` is this very list, not just one with equal contents
    pub fn identical(&self, other: &Self) -> bool {
        self.id == other.id
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.nodes[HEAD].next,
            back: self.nodes[TAIL].prev,
            remaining: self.len,
        }
    }

    pub fn append(&mut self, value: T) {
        self.link_before(TAIL, value);
    }

    pub fn prepend(&mut self, value: T) {
        let first = self.nodes[HEAD].next;
        self.link_before(first, value);
    }

    /// Links `value` in right before `pos`; inserting before `end()` appends
    pub fn insert(&mut self, pos: Position, value: T) -> Result<Position> {
        let slot = self.check(pos)?;
        if slot == HEAD {
            return Err(SequenceError::OutOfRange);
        }
        let new = self.link_before(slot, value);
        Ok(self.position(new))
    }

    pub fn pop_first(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        let first = self.nodes[HEAD].next;
        self.unlink(first).ok_or(SequenceError::OutOfRange)
    }

    pub fn pop_last(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(SequenceError::EmptyContainer);
        }
        let last = self.nodes[TAIL].prev;
        self.unlink(last).ok_or(SequenceError::OutOfRange)
    }

    /// Unlinks the node at `pos` and hands back its value.
    /// Only `pos` itself is invalidated.
    pub fn erase(&mut self, pos: Position) -> Result<T> {
        let slot = self.check(pos)?;
        self.unlink(slot).ok_or(SequenceError::OutOfRange)
    }

    /// Erases `[first, last)` front to back.
    ///
    /// `last` has to be reachable from `first` going forward. That's verified
    /// before anything is unlinked, so a bad range leaves the list untouched.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<()> {
        let from = self.check(first)?;
        let to = self.check(last)?;

        let mut cursor = from;
        while cursor != to {
            if self.nodes[cursor].value.is_none() {
                // walked onto a sentinel without meeting `last`
                return Err(SequenceError::OutOfRange);
            }
            cursor = self.nodes[cursor].next;
        }

        let mut cursor = from;
        while cursor != to {
            let next = self.nodes[cursor].next;
            self.unlink(cursor);
            cursor = next;
        }
        Ok(())
    }

    /// First real node, or `end()` when the list is empty
    pub fn begin(&self) -> Position {
        self.position(self.nodes[HEAD].next)
    }

    /// The tail sentinel
    pub fn end(&self) -> Position {
        self.position(TAIL)
    }

    pub fn next(&self, pos: Position) -> Result<Position> {
        let slot = self.check(pos)?;
        match self.nodes[slot].next {
            NIL => Err(SequenceError::OutOfRange),
            next => Ok(self.position(next)),
        }
    }

    pub fn prev(&self, pos: Position) -> Result<Position> {
        let slot = self.check(pos)?;
        match self.nodes[slot].prev {
            NIL | HEAD => Err(SequenceError::OutOfRange),
            prev => Ok(self.position(prev)),
        }
    }

    /// Takes `n` single steps, failing on the first one that crosses a boundary
    pub fn offset(&self, pos: Position, n: isize) -> Result<Position> {
        let mut pos = pos;
        for _ in 0..n.unsigned_abs() {
            pos = if n > 0 { self.next(pos)? } else { self.prev(pos)? };
        }
        // a zero step still has to be a position of ours
        self.check(pos)?;
        Ok(pos)
    }

    pub fn get(&self, pos: Position) -> Result<&T> {
        let slot = self.check(pos)?;
        self.nodes[slot]
            .value
            .as_ref()
            .ok_or(SequenceError::OutOfRange)
    }

    pub fn get_mut(&mut self, pos: Position) -> Result<&mut T> {
        let slot = self.check(pos)?;
        self.nodes[slot]
            .value
            .as_mut()
            .ok_or(SequenceError::OutOfRange)
    }
}

// Private methods
impl<T> SequenceList<T> {
    fn position(&self, slot: usize) -> Position {
        Position {
            owner: self.id,
            slot,
            generation: self.nodes[slot].generation,
        }
    }

    /// Resolves `pos` to a live slot of this list
    fn check(&self, pos: Position) -> Result<usize> {
        match self.nodes.get(pos.slot) {
            Some(node) if pos.owner == self.id && node.generation == pos.generation => Ok(pos.slot),
            _ => Err(SequenceError::OutOfRange),
        }
    }

    /// Puts `value` into a fresh or recycled slot between `at` and its predecessor
    fn link_before(&mut self, at: usize, value: T) -> usize {
        let prev = self.nodes[at].prev;
        let slot = match self.free.pop() {
            Some(slot) => {
                let node = &mut self.nodes[slot];
                node.value = Some(value);
                node.prev = prev;
                node.next = at;
                slot
            }
            None => {
                self.nodes.push(Node {
                    value: Some(value),
                    prev,
                    next: at,
                    generation: 0,
                });
                self.nodes.len() - 1
            }
        };
        self.nodes[prev].next = slot;
        self.nodes[at].prev = slot;
        self.len += 1;
        slot
    }

    /// Unlinks a real node and recycles its slot. Sentinels give None and stay put.
    fn unlink(&mut self, slot: usize) -> Option<T> {
        let value = self.nodes[slot].value.take()?;
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        let node = &mut self.nodes[slot];
        node.prev = NIL;
        node.next = NIL;
        node.generation = node.generation.wrapping_add(1);
        self.free.push(slot);
        self.len -= 1;
        Some(value)
    }
}

impl<T> Sequence<T> for SequenceList<T> {
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
impl<T> Default for SequenceList<T> {
    fn default() -> Self {
        Self::new()
    }
} impl<T: Clone> Clone for SequenceList<T> {
    fn clone(&self) -> Self {
        // a fresh chain built in order, compacted and with its own identity
        self.iter().cloned().collect()
    }
} impl<T: Debug> Debug for SequenceList<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        f.debug_list().entries(self.iter()).finish()
    }
} impl<T: PartialEq> PartialEq for SequenceList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
} impl<T: Eq> Eq for SequenceList<T> {
} impl<T> Extend<T> for SequenceList<T> {
    fn extend<U: IntoIterator<Item = T>>(&mut self, other: U) {
        for val in other {
            self.append(val);
        }
    }
} impl<T> FromIterator<T> for SequenceList<T> {
    fn from_iter<U: IntoIterator<Item = T>>(iter: U) -> Self {
        let mut l = SequenceList::new();
        l.extend(iter);
        l
    }
} impl<T, const N: usize> From<[T; N]> for SequenceList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
} impl<'a, T> IntoIterator for &'a SequenceList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
} impl<T> IntoIterator for SequenceList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// Borrowing iterator, walks the links from both ends
pub struct Iter<'a, T> {
    list: &'a SequenceList<T>,
    front: usize,
    back: usize,
    remaining: usize,
} impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = &list.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
} impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = &list.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_ref()
    }
} impl<'a, T> ExactSizeIterator for Iter<'a, T> {
}

/// Owning iterator, pops from whichever end is asked for
pub struct IntoIter<T> {
    list: SequenceList<T>,
} impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_first().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
} impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_last().ok()
    }
} impl<T> ExactSizeIterator for IntoIter<T> {
}

#[cfg(test)]
mod tests {
    use {
        super::{SequenceList, HEAD, TAIL},
        crate::error::SequenceError,
    };

    fn collect<T: Clone>(l: &SequenceList<T>) -> Vec<T> {
        l.iter().cloned().collect()
    }

    #[test]
    fn empty_list_is_just_sentinels() {
        let l: SequenceList<u8> = SequenceList::new();
        assert_eq!(l.nodes.len(), 2);
        assert_eq!(l.nodes[HEAD].next, TAIL);
        assert_eq!(l.nodes[TAIL].prev, HEAD);
        assert_eq!(l.begin(), l.end());
    }

    #[test]
    fn insert_before_position() -> Result<(), SequenceError> {
        let mut l = SequenceList::from([1, 3]);
        let three = l.next(l.begin())?;
        let two = l.insert(three, 2)?;
        assert_eq!(*l.get(two)?, 2);
        let end = l.end();
        l.insert(end, 4)?;
        let begin = l.begin();
        l.insert(begin, 0)?;
        assert_eq!(collect(&l), [0, 1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn positions_survive_other_erasures() -> Result<(), SequenceError> {
        let mut l = SequenceList::from(['a', 'b', 'c', 'd']);
        let c = l.offset(l.begin(), 2)?;
        l.pop_first()?;
        l.pop_last()?;
        assert_eq!(*l.get(c)?, 'c');
        assert_eq!(l.prev(c).and_then(|p| l.get(p).copied()), Ok('b'));
        Ok(())
    }

    #[test]
    fn generation_counts_past_u32() -> Result<(), SequenceError> {
        let mut l = SequenceList::from([1]);
        let slot = l.nodes[HEAD].next;
        l.nodes[slot].generation = u64::from(u32::MAX);
        let old = l.begin();
        l.erase(old)?;
        assert_eq!(l.nodes[slot].generation, u64::from(u32::MAX) + 1);

        l.append(2);
        assert_eq!(l.nodes[HEAD].next, slot);
        assert_eq!(l.get(old), Err(SequenceError::OutOfRange));
        Ok(())
    }

    #[test]
    fn erased_position_goes_stale() -> Result<(), SequenceError> {
        let mut l = SequenceList::from([1, 2]);
        let first = l.begin();
        assert_eq!(l.erase(first)?, 1);
        assert_eq!(l.get(first), Err(SequenceError::OutOfRange));
        assert_eq!(l.erase(first), Err(SequenceError::OutOfRange));

        // the freed slot is reused but the old position still doesn't match it
        l.prepend(9);
        assert_eq!(l.nodes.len(), 4);
        assert_eq!(l.get(first), Err(SequenceError::OutOfRange));
        assert_eq!(*l.get(l.begin())?, 9);
        Ok(())
    }

    #[test]
    fn sentinel_boundaries() -> Result<(), SequenceError> {
        let mut l = SequenceList::from([5]);
        assert_eq!(l.get(l.end()), Err(SequenceError::OutOfRange));
        assert_eq!(l.next(l.end()), Err(SequenceError::OutOfRange));
        assert_eq!(l.prev(l.begin()), Err(SequenceError::OutOfRange));
        assert_eq!(l.erase(l.end()), Err(SequenceError::OutOfRange));
        assert_eq!(l.offset(l.begin(), 2), Err(SequenceError::OutOfRange));
        assert_eq!(l.offset(l.end(), -2), Err(SequenceError::OutOfRange));
        assert_eq!(l.offset(l.end(), -1)?, l.begin());
        assert_eq!(l.offset(l.begin(), 0)?, l.begin());
        *l.get_mut(l.begin())? += 1;
        assert_eq!(collect(&l), [6]);
        Ok(())
    }

    #[test]
    fn erase_range_forward() -> Result<(), SequenceError> {
        let mut l: SequenceList<i32> = (0..6).collect();
        let first = l.offset(l.begin(), 1)?;
        let last = l.offset(l.begin(), 4)?;

        l.erase_range(first, first)?;
        assert_eq!(l.len(), 6);

        l.erase_range(first, last)?;
        assert_eq!(collect(&l), [0, 4, 5]);
        assert_eq!(*l.get(last)?, 4);

        l.erase_range(l.begin(), l.end())?;
        assert!(l.is_empty());
        assert_eq!(l.begin(), l.end());
        Ok(())
    }

    #[test]
    fn erase_range_unreachable_end_changes_nothing() -> Result<(), SequenceError> {
        let mut l: SequenceList<i32> = (0..4).collect();
        let early = l.next(l.begin())?;
        let late = l.offset(l.begin(), 3)?;
        assert_eq!(l.erase_range(late, early), Err(SequenceError::OutOfRange));
        assert_eq!(collect(&l), [0, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn foreign_positions_are_rejected() {
        let a = SequenceList::from([1]);
        let mut b = SequenceList::from([1]);
        assert_ne!(a.begin(), b.begin());
        assert_eq!(b.insert(a.begin(), 0), Err(SequenceError::OutOfRange));
        assert_eq!(b.erase(a.begin()), Err(SequenceError::OutOfRange));
        assert_eq!(collect(&b), [1]);
    }

    #[test]
    fn take_resets_source() -> Result<(), SequenceError> {
        let mut l = SequenceList::from([1, 2, 3]);
        let two = l.next(l.begin())?;
        let moved = std::mem::take(&mut l);
        // positions follow the nodes into the new owner
        assert_eq!(*moved.get(two)?, 2);
        assert!(l.is_empty());
        assert_eq!(l.get(two), Err(SequenceError::OutOfRange));
        l.append(4);
        assert_eq!(collect(&l), [4]);
        Ok(())
    }

    #[test]
    fn clone_is_deep_and_distinct() -> Result<(), SequenceError> {
        let l = SequenceList::from([String::from("x"), String::from("y")]);
        let mut c = l.clone();
        assert_eq!(c, l);
        assert!(!c.identical(&l));
        assert!(l.identical(&l));
        c.get_mut(c.begin())?.push('!');
        assert_eq!(collect(&l), ["x", "y"]);
        assert_ne!(c, l);
        Ok(())
    }

    #[test]
    fn iterates_from_both_ends() {
        let l = SequenceList::from([1, 2, 3, 4]);
        let mut it = l.iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next_back(), Some(&3));
        assert_eq!(it.next(), Some(&2));
        assert_eq!(it.next(), None);
        assert_eq!(l.into_iter().rev().collect::<Vec<_>>(), [4, 3, 2, 1]);
    }

    #[test]
    fn debug_lists_values() {
        let l = SequenceList::from(["a"]);
        assert_eq!(format!("{:?}", l), "[\"a\"]");
    }
}
