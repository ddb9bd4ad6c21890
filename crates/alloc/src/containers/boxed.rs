use core::{
    fmt,
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Index, IndexMut},
    ptr::{self, NonNull},
    slice,
};

use crate::ptr::{allocate_array, deallocate_array};

/// A heap-allocated array with a fixed number of slots.
///
/// Every slot always holds an initialized value. An `ArrayBox` never resizes itself; to change
/// the number of slots, build a new one and [`swap`](ArrayBox::swap) it in.
pub struct ArrayBox<T> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: `ArrayBox<T>` owns its values like `Box<[T]>` does
unsafe impl<T: Send> Send for ArrayBox<T> {}
unsafe impl<T: Sync> Sync for ArrayBox<T> {}

/// Cleans up a partially initialized allocation if producing a value panics.
struct InitGuard<T> {
    ptr: NonNull<T>,
    len: usize,
    initialized: usize,
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: only the first `initialized` slots hold values
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.initialized,
            ));
            deallocate_array(self.ptr, self.len);
        }
    }
}

impl<T> ArrayBox<T> {
    /// Constructs an empty `ArrayBox`. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Constructs an `ArrayBox` with `len` slots, initializing slot `i` to `f(i)`.
    ///
    /// If `f` panics, the values produced so far are dropped and the memory is freed.
    pub fn from_fn<F>(len: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        let mut guard = InitGuard {
            ptr: allocate_array::<T>(len),
            len,
            initialized: 0,
        };

        while guard.initialized < len {
            let value = f(guard.initialized);
            // SAFETY: `initialized < len`, so the slot is in bounds and still uninitialized
            unsafe { guard.ptr.as_ptr().add(guard.initialized).write(value) };
            guard.initialized += 1;
        }

        let guard = ManuallyDrop::new(guard);
        Self {
            ptr: guard.ptr,
            len,
            _marker: PhantomData,
        }
    }

    /// Constructs an `ArrayBox` with `len` slots holding `T::default()`.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(len, |_| T::default())
    }

    /// Constructs an `ArrayBox` with `len` slots holding clones of `value`.
    pub fn from_elem(len: usize, value: &T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(len, |_| value.clone())
    }

    /// Returns the number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns all slots as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is aligned and non-null, and all `len` slots are initialized
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns all slots as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Returns a reference to a slot without bounds checking.
    ///
    /// ## Safety
    /// - `index` must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index` is in bounds
        unsafe { &*self.ptr.as_ptr().add(index) }
    }

    /// Returns a mutable reference to a slot without bounds checking.
    ///
    /// ## Safety
    /// - `index` must be less than `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index` is in bounds
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    /// Exchanges allocations with `other`. Never allocates or moves any values.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the allocation out, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Converts into a boxed slice without copying.
    pub fn into_boxed_slice(self) -> Box<[T]> {
        let this = ManuallyDrop::new(self);
        // SAFETY: the memory came from the global allocator with `Layout::array::<T>(len)`
        // (or is a dangling zero-byte array), which is exactly what `Box<[T]>` expects
        unsafe {
            Box::from_raw(ptr::slice_from_raw_parts_mut(
                this.ptr.as_ptr(),
                this.len,
            ))
        }
    }
}

impl<T> Drop for ArrayBox<T> {
    fn drop(&mut self) {
        // SAFETY: all slots are initialized and the allocation is ours
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
            deallocate_array(self.ptr, self.len);
        }
    }
}

impl<T> Default for ArrayBox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Box<[T]>> for ArrayBox<T> {
    fn from(boxed: Box<[T]>) -> Self {
        let len = boxed.len();
        let raw = Box::into_raw(boxed);
        Self {
            // SAFETY: `Box::into_raw` never returns null
            ptr: unsafe { NonNull::new_unchecked(raw.cast::<T>()) },
            len,
            _marker: PhantomData,
        }
    }
}

impl<T> Index<usize> for ArrayBox<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for ArrayBox<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
