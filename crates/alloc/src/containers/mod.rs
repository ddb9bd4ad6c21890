pub mod boxed;
pub mod cursor;
pub mod reserve;
pub mod vec;
