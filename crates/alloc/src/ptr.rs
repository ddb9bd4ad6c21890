use core::{alloc::Layout, mem, ptr::NonNull};
use std::alloc::{alloc, dealloc, handle_alloc_error};

use bytesize::ByteSize;
use log::{error, trace};

fn display_bytes(bytes: usize) -> String {
    ByteSize::b(bytes as u64).to_string_as(true)
}

/// Returns the memory layout of an array of `len` values of `T`.
///
/// # Panics
///
/// Panics if the array would exceed `isize::MAX` bytes.
pub(crate) fn array_layout<T>(len: usize) -> Layout {
    match Layout::array::<T>(len) {
        Ok(layout) => layout,
        Err(_) => {
            error!(
                "capacity overflow: {} slots of {} are larger than isize::MAX bytes",
                len,
                display_bytes(mem::size_of::<T>())
            );
            panic!("capacity overflow");
        }
    }
}

/// Allocates uninitialized memory for an array of `len` values of `T`.
///
/// Returns a dangling, well-aligned pointer when the array takes up zero bytes
/// (`len == 0` or a zero-sized `T`). Running out of memory is fatal.
pub(crate) fn allocate_array<T>(len: usize) -> NonNull<T> {
    let layout = array_layout::<T>(len);
    if layout.size() == 0 {
        return NonNull::dangling();
    }

    // SAFETY: layout has a non-zero size
    let ptr = unsafe { alloc(layout) };
    match NonNull::new(ptr.cast::<T>()) {
        Some(ptr) => {
            trace!(
                "allocated {} slots ({})",
                len,
                display_bytes(layout.size())
            );
            ptr
        }
        None => {
            error!(
                "out of memory: could not allocate {} slots ({})",
                len,
                display_bytes(layout.size())
            );
            handle_alloc_error(layout)
        }
    }
}

/// Frees memory returned by [`allocate_array`].
///
/// ## Safety
/// - `ptr` must come from `allocate_array::<T>(len)` with the same `len`.
/// - The values in the array must have been dropped or moved out already.
pub(crate) unsafe fn deallocate_array<T>(ptr: NonNull<T>, len: usize) {
    let layout = array_layout::<T>(len);
    if layout.size() == 0 {
        return;
    }

    trace!(
        "deallocated {} slots ({})",
        len,
        display_bytes(layout.size())
    );
    // SAFETY: same allocator and layout as the matching allocation
    unsafe { dealloc(ptr.as_ptr().cast(), layout) }
}
