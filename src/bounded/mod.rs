pub use self::array::{BoundedArray, CheckedIndex};

mod array;
