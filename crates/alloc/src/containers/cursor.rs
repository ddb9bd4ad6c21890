use core::sync::atomic::{AtomicU64, Ordering};

use super::vec::GrowVec;

/// Counter for unique [`Epoch`] allocation.
static EPOCH_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one buffer adoption by one vector.
///
/// Every time a `GrowVec` is built or takes on a new buffer it draws a fresh epoch, so no two
/// buffers in the process ever share one. A swap moves epochs along with the buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Epoch(u64);

impl Epoch {
    pub(crate) fn next() -> Self {
        Self(EPOCH_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position in a [`GrowVec`]: an element index stamped with the buffer it was taken from.
///
/// Positions are plain values and do not borrow the vector. Any reallocation (growth through
/// `push`, `insert`, `reserve`, or `resize`) or assignment makes earlier positions stale, and a
/// position is never valid for a different vector. `insert` and `erase` panic on such a
/// position, and [`GrowVec::get_at`] returns `None` for one.
///
/// Positions compare by index first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    index: usize,
    epoch: Epoch,
}

impl Position {
    pub(crate) fn new(index: usize, epoch: Epoch) -> Self {
        Self { index, epoch }
    }

    /// Returns the element index this position refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn epoch(self) -> Epoch {
        self.epoch
    }

    /// Returns the position `n` elements further along.
    #[inline]
    pub fn offset(self, n: usize) -> Self {
        Self {
            index: self.index + n,
            epoch: self.epoch,
        }
    }

    /// Returns the position `n` elements back.
    ///
    /// # Panics
    ///
    /// Panics if that would move before the first element.
    #[inline]
    pub fn back(self, n: usize) -> Self {
        assert!(n <= self.index, "position moved before the first element");
        Self {
            index: self.index - n,
            epoch: self.epoch,
        }
    }
}

/// A read-only cursor over a [`GrowVec`].
///
/// The cursor sits on an element or at the end (one past the last element). Iterating a cursor
/// yields the current element and everything after it.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    vec: &'a GrowVec<T>,
    index: usize,
}

/// A cursor over a [`GrowVec`] that can edit the vector at its position.
#[derive(Debug)]
pub struct CursorMut<'a, T> {
    vec: &'a mut GrowVec<T>,
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(vec: &'a GrowVec<T>, index: usize) -> Self {
        debug_assert!(index <= vec.len());
        Self { vec, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the position of the cursor, valid until the vector reallocates.
    #[inline]
    pub fn position(&self) -> Position {
        self.vec.position(self.index)
    }

    /// Returns the element under the cursor, or `None` at the end.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        let vec: &'a GrowVec<T> = self.vec;
        vec.as_slice().get(self.index)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.index == self.vec.len()
    }

    /// Returns the number of elements from the cursor to the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.vec.len() - self.index
    }

    /// Moves to the next element. Returns `false` (and stays put) at the end.
    pub fn move_next(&mut self) -> bool {
        if self.is_end() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Moves to the previous element. Returns `false` (and stays put) at the start.
    pub fn move_prev(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            vec: self.vec,
            index: self.index,
        }
    }
}

impl<'a, T> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.current()?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Cursor<'_, T> {}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(vec: &'a mut GrowVec<T>, index: usize) -> Self {
        debug_assert!(index <= vec.len());
        Self { vec, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.vec.position(self.index)
    }

    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.vec.as_slice().get(self.index)
    }

    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.vec.as_mut_slice().get_mut(self.index)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.index == self.vec.len()
    }

    pub fn move_next(&mut self) -> bool {
        if self.is_end() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn move_prev(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.vec, self.index)
    }

    /// Inserts `value` before the current element (or at the end) and moves onto it.
    pub fn insert(&mut self, value: T)
    where
        T: Default,
    {
        let pos = self.vec.insert(self.position(), value);
        self.index = pos.index();
    }

    /// Inserts a clone of `value` before the current element (or at the end) and moves onto it.
    pub fn insert_cloned(&mut self, value: &T)
    where
        T: Clone + Default,
    {
        let pos = self.vec.insert_cloned(self.position(), value);
        self.index = pos.index();
    }

    /// Removes the current element. The cursor then sits on the element that followed it.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn erase(&mut self) {
        let pos = self.vec.erase(self.position());
        self.index = pos.index();
    }
}

#[cfg(test)]
mod tests {
    use crate::growvec;

    #[test]
    fn position_arithmetic() {
        let v = growvec![1, 2, 3];
        let pos = v.begin().offset(2);
        assert_eq!(pos.index(), 2);
        assert_eq!(pos.back(1).index(), 1);
        assert!(v.begin() < v.end());
    }

    #[test]
    #[should_panic(expected = "before the first element")]
    fn position_back_past_start_panics() {
        let v = growvec![1];
        v.begin().back(1);
    }

    #[test]
    fn cursor_walks_forward_and_back() {
        let v = growvec!['a', 'b', 'c'];
        let mut cursor = v.cursor(v.begin());
        assert_eq!(cursor.current(), Some(&'a'));
        assert!(cursor.move_next());
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&'c'));
        assert!(cursor.move_next());
        assert!(cursor.is_end());
        assert_eq!(cursor.current(), None);
        assert!(!cursor.move_next());
        assert!(cursor.move_prev());
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn cursor_iterates_the_rest() {
        let v = growvec![1, 2, 3, 4];
        let cursor = v.cursor(v.position(1));
        assert_eq!(cursor.len(), 3);
        let rest: Vec<_> = cursor.copied().collect();
        assert_eq!(rest, [2, 3, 4]);
    }

    #[test]
    fn read_only_cursor_position_supports_both_inserts() {
        let mut v = growvec![String::from("a"), String::from("c")];
        let pos = v.cursor(v.position(1)).position();
        let pos = v.insert(pos, String::from("b"));
        let x = String::from("x");
        v.insert_cloned(pos, &x);
        assert_eq!(v, ["a", "x", "b", "c"]);
        assert_eq!(x, "x");
    }

    #[test]
    fn cursor_mut_edits_in_place() {
        let mut v = growvec![1, 2, 4];
        let mut cursor = v.cursor_mut(v.position(2));
        cursor.insert(3);
        assert_eq!(cursor.current(), Some(&3));
        cursor.move_next();
        cursor.insert_cloned(&5);
        assert_eq!(cursor.index(), 3);
        if let Some(x) = cursor.current_mut() {
            *x *= 10;
        }
        cursor.move_prev();
        cursor.erase();
        assert_eq!(cursor.current(), Some(&50));
        assert_eq!(cursor.as_cursor().count(), 2);
        assert_eq!(v, [1, 2, 50, 4]);
    }

    #[test]
    #[should_panic(expected = "erase position")]
    fn cursor_mut_erase_at_end_panics() {
        let mut v = growvec![1];
        let end = v.end();
        v.cursor_mut(end).erase();
    }
}
