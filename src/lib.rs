//! A fixed-size array with two kinds of indexed access: checked access that
//! reports an [`OutOfRangeError`] for any index outside `[0, N)`, and an
//! `unsafe` unchecked escape hatch for callers that have already proven the
//! index is in range.

pub mod bounded;
pub mod demo;
pub mod echo;
pub mod error;
pub mod probe;

pub use bounded::BoundedArray;
pub use error::OutOfRangeError;
