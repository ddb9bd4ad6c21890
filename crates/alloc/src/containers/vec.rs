use core::{
    borrow::{Borrow, BorrowMut},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    slice,
};

use log::debug;

use super::{
    boxed::ArrayBox,
    cursor::{Cursor, CursorMut, Epoch, Position},
    reserve::Reserve,
};
use crate::error::AccessError;

/// Factor by which a full vector's capacity grows.
const GROWTH_FACTOR: usize = 2;

/// A contiguous growable array type, short for 'growable vector'.
///
/// `GrowVec` owns one [`ArrayBox`] and tracks how many of its slots are in use (`len`) apart
/// from how many exist (`capacity`). Slots past `len` stay initialized with unspecified values.
///
/// When an append or insert finds the vector full, capacity grows to
/// `max(len + 1, capacity * 2)`, so repeated appends take amortized constant time. Any
/// reallocation makes previously obtained [`Position`]s stale.
///
/// Growth needs `T: Default` because every slot of a fresh buffer is initialized before
/// elements are moved into it.
pub struct GrowVec<T> {
    buf: ArrayBox<T>,
    len: usize,
    cap: usize,
    // fresh whenever `buf` is replaced
    epoch: Epoch,
}

impl<T> GrowVec<T> {
    /// Constructs a new, empty `GrowVec`. Does not allocate.
    pub fn new() -> Self {
        Self::from_buffer(ArrayBox::new(), 0)
    }

    /// Constructs a `GrowVec` holding `len` clones of `value`, with no spare capacity.
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_buffer(ArrayBox::from_elem(len, &value), len)
    }

    fn from_buffer(buf: ArrayBox<T>, len: usize) -> Self {
        debug_assert!(len <= buf.len());
        Self {
            len,
            cap: buf.len(),
            buf,
            epoch: Epoch::next(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of elements the vector can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf.as_slice()[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.buf.as_mut_slice()[..len]
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::OutOfRange`] if `index >= self.len()`.
    pub fn at(&self, index: usize) -> Result<&T, AccessError> {
        self.as_slice().get(index).ok_or(AccessError::OutOfRange {
            index,
            len: self.len,
        })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::OutOfRange`] if `index >= self.len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, AccessError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(AccessError::OutOfRange { index, len })
    }

    /// Removes the last element from the logical range. Its slot is kept as spare capacity.
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty.
    pub fn pop(&mut self) {
        assert!(!self.is_empty(), "pop on an empty GrowVec");
        self.len -= 1;
    }

    /// Removes the element at `pos`, shifting everything after it one slot left.
    ///
    /// Returns the position of the erase point, which now holds the element that followed the
    /// erased one (or is the end). Positions at or after `pos` no longer refer to the same
    /// elements.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is stale or not in `[begin, end)`.
    pub fn erase(&mut self, pos: Position) -> Position {
        self.check_epoch(pos);
        let index = pos.index();
        assert!(
            index < self.len,
            "erase position {} out of range (len {})",
            index,
            self.len
        );
        // the erased value rotates into the slot that leaves the logical range
        self.as_mut_slice()[index..].rotate_left(1);
        self.len -= 1;
        Position::new(index, self.epoch)
    }

    /// Sets the length to zero. Capacity and allocation are kept for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Exchanges contents, length, and capacity with `other` without moving any elements.
    ///
    /// Positions follow their buffer: after the swap, positions taken from `other` are valid
    /// for `self` and vice versa.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the contents out, leaving `self` empty and unallocated.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Replaces the contents with `other`'s. The old buffer is freed when `other` goes out of
    /// scope.
    ///
    /// Positions taken from `self` become stale; positions taken from `other` now refer to
    /// `self`.
    pub fn assign_moved(&mut self, mut other: Self) {
        self.swap(&mut other);
    }

    /// Replaces the contents with a copy of `other`. Positions taken from `self` become stale.
    ///
    /// The copy is built first and then swapped in, so `self` is untouched if cloning panics.
    pub fn assign(&mut self, other: &Self)
    where
        T: Clone + Default,
    {
        let mut copy = other.clone();
        self.swap(&mut copy);
    }

    /// Returns the position of the first element.
    #[inline]
    pub fn begin(&self) -> Position {
        Position::new(0, self.epoch)
    }

    /// Returns the position one past the last element.
    #[inline]
    pub fn end(&self) -> Position {
        Position::new(self.len, self.epoch)
    }

    /// Returns the position of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn position(&self, index: usize) -> Position {
        assert!(
            index <= self.len,
            "position {} out of range (len {})",
            index,
            self.len
        );
        Position::new(index, self.epoch)
    }

    /// Returns the element at `pos`, or `None` if `pos` is stale or at or past the end.
    pub fn get_at(&self, pos: Position) -> Option<&T> {
        if pos.epoch() != self.epoch {
            return None;
        }
        self.as_slice().get(pos.index())
    }

    pub fn get_at_mut(&mut self, pos: Position) -> Option<&mut T> {
        if pos.epoch() != self.epoch {
            return None;
        }
        self.as_mut_slice().get_mut(pos.index())
    }

    /// Returns a read-only cursor at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is stale or past the end.
    pub fn cursor(&self, pos: Position) -> Cursor<'_, T> {
        self.check_range(pos);
        Cursor::new(self, pos.index())
    }

    /// Returns an editing cursor at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is stale or past the end.
    pub fn cursor_mut(&mut self, pos: Position) -> CursorMut<'_, T> {
        self.check_range(pos);
        let index = pos.index();
        CursorMut::new(self, index)
    }

    /// Returns the logical elements as a boxed slice; spare slots are dropped.
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.into_vec().into_boxed_slice()
    }

    /// Returns the logical elements as a `Vec`, reusing the allocation.
    pub fn into_vec(self) -> Vec<T> {
        let Self { buf, len, .. } = self;
        let mut vec = buf.into_boxed_slice().into_vec();
        vec.truncate(len);
        vec
    }

    fn check_epoch(&self, pos: Position) {
        assert_eq!(
            pos.epoch(),
            self.epoch,
            "stale position: taken from another vector or before a reallocation"
        );
    }

    fn check_range(&self, pos: Position) {
        self.check_epoch(pos);
        assert!(
            pos.index() <= self.len,
            "position {} out of range (len {})",
            pos.index(),
            self.len
        );
    }

    /// Returns the capacity to grow to when at least `required` slots are needed.
    #[inline]
    fn grown_capacity(&self, required: usize) -> usize {
        required.max(self.cap.saturating_mul(GROWTH_FACTOR))
    }
}

impl<T: Default> GrowVec<T> {
    /// Constructs a `GrowVec` holding `len` default values, with no spare capacity.
    pub fn with_len(len: usize) -> Self {
        Self::from_buffer(ArrayBox::with_len(len), len)
    }

    /// Constructs an empty `GrowVec` with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_buffer(ArrayBox::with_len(capacity), 0)
    }

    /// Constructs an empty `GrowVec` sized by a [`Reserve`] request.
    pub fn with_reserve(request: Reserve) -> Self {
        Self::with_capacity(request.capacity())
    }

    /// Grows the capacity to exactly `new_capacity` if it is currently smaller.
    /// The length is unchanged.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.cap {
            self.reallocate(new_capacity, None);
        }
    }

    /// Changes the length to `new_len`.
    ///
    /// Shrinking only moves the end of the logical range. Growing resets the newly exposed
    /// slots to `T::default()`, reallocating to exactly `new_len` slots if capacity is short.
    pub fn resize(&mut self, new_len: usize) {
        if new_len <= self.len {
            self.len = new_len;
        } else if new_len <= self.cap {
            let len = self.len;
            self.buf.as_mut_slice()[len..new_len].fill_with(T::default);
            self.len = new_len;
        } else {
            // slots past the old length are fresh defaults already
            self.reallocate(new_len, None);
            self.len = new_len;
        }
    }

    /// Appends `value`, doubling the capacity if the vector is full.
    pub fn push(&mut self, value: T) {
        if self.len == self.cap {
            self.reallocate(self.grown_capacity(self.len + 1), None);
        }
        self.buf[self.len] = value;
        self.len += 1;
    }

    /// Appends a clone of `value`.
    pub fn push_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        self.push(value.clone());
    }

    /// Inserts `value` at `pos`, shifting later elements one slot right.
    ///
    /// Returns the position of the inserted element. If the vector was full it reallocates and
    /// every earlier position becomes stale; otherwise positions at or after `pos` shift.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is stale or not in `[begin, end]`.
    pub fn insert(&mut self, pos: Position, value: T) -> Position {
        self.check_epoch(pos);
        let index = pos.index();
        assert!(
            index <= self.len,
            "insert position {} out of range (len {})",
            index,
            self.len
        );

        let len = self.len;
        if len == self.cap {
            self.reallocate(self.grown_capacity(len + 1), Some(index));
            self.buf[index] = value;
        } else {
            self.buf[len] = value;
            self.buf.as_mut_slice()[index..=len].rotate_right(1);
        }
        self.len += 1;
        Position::new(index, self.epoch)
    }

    /// Inserts a clone of `value` at `pos`. See [`insert`](GrowVec::insert).
    pub fn insert_cloned(&mut self, pos: Position, value: &T) -> Position
    where
        T: Clone,
    {
        self.insert(pos, value.clone())
    }

    /// Moves the elements into a fresh buffer of exactly `new_cap` slots and adopts it.
    ///
    /// With `gap = Some(i)` the elements from `i` on land one slot further right, leaving slot
    /// `i` for the caller. The old buffer is only touched once the new one is fully built.
    fn reallocate(&mut self, new_cap: usize, gap: Option<usize>) {
        let len = self.len;
        let split = gap.unwrap_or(len);
        let shift = usize::from(gap.is_some());
        debug_assert!(split <= len && len + shift <= new_cap);

        debug!(
            "reallocating GrowVec: capacity {} -> {} (len {})",
            self.cap, new_cap, len
        );

        let mut fresh = ArrayBox::<T>::with_len(new_cap);
        {
            let old = self.buf.as_mut_slice();
            let new = fresh.as_mut_slice();
            new[..split].swap_with_slice(&mut old[..split]);
            new[split + shift..len + shift].swap_with_slice(&mut old[split..len]);
        }

        // `fresh` now holds the old buffer and frees it on drop
        self.buf.swap(&mut fresh);
        self.cap = new_cap;
        self.epoch = Epoch::next();
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default> Clone for GrowVec<T> {
    /// Copies into a buffer with the same capacity; spare slots get default values.
    fn clone(&self) -> Self {
        let len = self.len;
        let buf = ArrayBox::from_fn(self.cap, |i| {
            if i < len {
                self.buf[i].clone()
            } else {
                T::default()
            }
        });
        Self::from_buffer(buf, len)
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T> Deref for GrowVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowVec<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for GrowVec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for GrowVec<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T> AsRef<[T]> for GrowVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for GrowVec<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Borrow<[T]> for GrowVec<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> BorrowMut<[T]> for GrowVec<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowVec<T> {
    fn eq(&self, other: &Self) -> bool {
        // a shorter vector must never equal a longer one sharing its prefix
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for GrowVec<T> {}

impl<T, U, const N: usize> PartialEq<[U; N]> for GrowVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<[U]> for GrowVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U> PartialEq<Vec<U>> for GrowVec<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd> PartialOrd for GrowVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        for (a, b) in self.iter().zip(other.iter()) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) => continue,
                ordering => return ordering,
            }
        }
        self.len.partial_cmp(&other.len)
    }
}

impl<T: Ord> Ord for GrowVec<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        self.len.cmp(&other.len)
    }
}

impl<T: Hash> Hash for GrowVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T> IntoIterator for GrowVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T> FromIterator<T> for GrowVec<T> {
    /// Collects into a vector with exactly as many slots as items.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        Self::from(items)
    }
}

impl<T: Default> Extend<T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let required = self.len.saturating_add(lower);
        if required > self.cap {
            self.reallocate(self.grown_capacity(required), None);
        }
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Clone + Default + 'a> Extend<&'a T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T, const N: usize> From<[T; N]> for GrowVec<T> {
    fn from(items: [T; N]) -> Self {
        let boxed: Box<[T]> = Box::new(items);
        Self::from_buffer(ArrayBox::from(boxed), N)
    }
}

impl<T: Clone> From<&[T]> for GrowVec<T> {
    fn from(items: &[T]) -> Self {
        Self::from(items.to_vec())
    }
}

impl<T> From<Vec<T>> for GrowVec<T> {
    fn from(items: Vec<T>) -> Self {
        let len = items.len();
        Self::from_buffer(ArrayBox::from(items.into_boxed_slice()), len)
    }
}

impl<T> From<Box<[T]>> for GrowVec<T> {
    fn from(items: Box<[T]>) -> Self {
        let len = items.len();
        Self::from_buffer(ArrayBox::from(items), len)
    }
}

impl<T: Default> From<Reserve> for GrowVec<T> {
    fn from(request: Reserve) -> Self {
        Self::with_reserve(request)
    }
}

impl<T> From<GrowVec<T>> for Vec<T> {
    fn from(vec: GrowVec<T>) -> Self {
        vec.into_vec()
    }
}
