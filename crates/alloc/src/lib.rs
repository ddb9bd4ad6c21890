//! Raw heap arrays and a contiguous growable vector built on top of them.
//!
//! ```text
//! GrowVec<T>   len, capacity, epoch
//! └── ArrayBox<T>   one allocation, every slot initialized
//!     └── ptr::allocate_array / deallocate_array
//! ```
//!
//! All growth funnels through one allocate-move-swap step, so a vector is either fully moved
//! into its new buffer or left untouched.

pub mod containers;
pub mod error;
pub(crate) mod ptr;

pub use containers::{
    boxed::ArrayBox,
    cursor::{Cursor, CursorMut, Position},
    reserve::{reserve, Reserve},
    vec::GrowVec,
};
pub use error::AccessError;

/// Creates a [`GrowVec`] from a list of elements or from a value and a length.
///
/// The vector gets exactly as many slots as elements.
///
/// ```
/// use growvec_alloc::growvec;
///
/// let v = growvec![1, 2, 3];
/// assert_eq!(v.capacity(), 3);
///
/// let zeros = growvec![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! growvec {
    () => {
        $crate::GrowVec::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::GrowVec::from_elem($n, $elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::GrowVec::from([$($x),+])
    };
}
