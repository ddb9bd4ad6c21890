//! A contiguous, growable vector with amortized doubling.
//!
//! ```
//! use growvec::{growvec, reserve, GrowVec};
//!
//! let mut v: GrowVec<u32> = GrowVec::from(reserve(4));
//! v.push(1);
//! v.push(2);
//! let pos = v.insert(v.position(1), 7);
//! assert_eq!(v, [1, 7, 2]);
//! assert_eq!(v.get_at(pos), Some(&7));
//! assert_eq!(v.capacity(), 4);
//! assert!(v < growvec![1, 8]);
//! ```

pub use growvec_alloc::{
    growvec, reserve, AccessError, ArrayBox, Cursor, CursorMut, GrowVec, Position, Reserve,
};
