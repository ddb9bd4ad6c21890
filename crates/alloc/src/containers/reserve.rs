/// A request to allocate capacity up front without adding any elements.
///
/// Built by [`reserve`] and consumed by [`GrowVec::with_reserve`](super::vec::GrowVec::with_reserve)
/// or `GrowVec::from`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reserve {
    capacity: usize,
}

impl Reserve {
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns the number of slots to allocate.
    #[inline]
    pub const fn capacity(self) -> usize {
        self.capacity
    }
}

/// Returns a [`Reserve`] request for `capacity` slots.
///
/// ```
/// use growvec_alloc::{reserve, GrowVec};
///
/// let v: GrowVec<u32> = GrowVec::from(reserve(16));
/// assert_eq!(v.len(), 0);
/// assert_eq!(v.capacity(), 16);
/// ```
pub const fn reserve(capacity: usize) -> Reserve {
    Reserve::new(capacity)
}
