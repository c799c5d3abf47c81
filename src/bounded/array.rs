use std::ops::{Index, IndexMut};

use num::{BigInt, ToPrimitive};

use crate::error::OutOfRangeError;

/// Any primitive integer usable as a checked index.
///
/// Signed and unsigned values of every width are accepted. Values that do not
/// fit in `usize` (negative numbers, wide unsigned values on narrow targets)
/// are simply out of range.
pub trait CheckedIndex: Copy + ToPrimitive + Into<BigInt> {}

impl<I> CheckedIndex for I where I: Copy + ToPrimitive + Into<BigInt> {}

/// A fixed-size, stack-resident sequence of exactly `N` elements.
///
/// Access comes in two forms. `get_checked`/`set_checked` validate the index
/// before touching storage and report an [`OutOfRangeError`] otherwise.
/// `get_unchecked`/`set_unchecked` skip validation and are `unsafe`: an index
/// outside `[0, N)` is undefined behaviour. `Index`/`IndexMut` are checked and
/// panic, like slice indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedArray<T, const N: usize> {
    data: [T; N],
}

impl<T: Default, const N: usize> Default for BoundedArray<T, N> {
    /// Every element starts as `T::default()`, i.e. zero for integers.
    fn default() -> Self {
        Self {
            data: std::array::from_fn(|_| T::default()),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for BoundedArray<T, N> {
    fn from(data: [T; N]) -> Self {
        Self::from_array(data)
    }
}

impl<T, const N: usize> BoundedArray<T, N> {
    pub const fn from_array(data: [T; N]) -> Self {
        Self { data }
    }

    pub fn filled(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: std::array::from_fn(|_| value.clone()),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_inner(self) -> [T; N] {
        self.data
    }

    /// Maps `index` to a storage offset, or fails without touching storage.
    #[inline]
    fn locate<I: CheckedIndex>(index: I) -> Result<usize, OutOfRangeError> {
        match index.to_usize() {
            Some(offset) if offset < N => Ok(offset),
            _ => Err(OutOfRangeError::new(index, N)),
        }
    }

    pub fn get_checked<I: CheckedIndex>(&self, index: I) -> Result<&T, OutOfRangeError> {
        let offset = Self::locate(index)?;
        Ok(&self.data[offset])
    }

    pub fn get_checked_mut<I: CheckedIndex>(
        &mut self,
        index: I,
    ) -> Result<&mut T, OutOfRangeError> {
        let offset = Self::locate(index)?;
        Ok(&mut self.data[offset])
    }

    /// Stores `value` at `index` and returns the element it replaced.
    ///
    /// On failure `value` is dropped and storage is left as it was.
    pub fn set_checked<I: CheckedIndex>(
        &mut self,
        index: I,
        value: T,
    ) -> Result<T, OutOfRangeError> {
        let slot = self.get_checked_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Reads the element at `index` without validating it.
    ///
    /// # Safety
    ///
    /// `index` must be less than `N`. Any other value reads outside the
    /// array's storage, which is undefined behaviour. Debug builds assert the
    /// precondition; release builds do not check it at all.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < N, "get_unchecked: index {index} >= length {N}");
        self.data.get_unchecked(index)
    }

    /// Stores `value` at `index` without validating it, returning the old element.
    ///
    /// # Safety
    ///
    /// Same contract as [`get_unchecked`](Self::get_unchecked): `index` must be
    /// less than `N`.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, index: usize, value: T) -> T {
        debug_assert!(index < N, "set_unchecked: index {index} >= length {N}");
        std::mem::replace(self.data.get_unchecked_mut(index), value)
    }
}

impl<T, const N: usize> Index<usize> for BoundedArray<T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &Self::Output {
        match self.get_checked(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, const N: usize> IndexMut<usize> for BoundedArray<T, N> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut <Self as Index<usize>>::Output {
        match self.get_checked_mut(index) {
            Ok(elem) => elem,
            Err(err) => panic!("{err}"),
        }
    }
}


#[cfg(kani)]
mod verification {
    use super::*;

    #[kani::proof]
    #[kani::unwind(4)]
    fn checked_get_matches_bounds() {
        let a: BoundedArray<u64, 2> = BoundedArray::from_array(kani::any());
        let index: i64 = kani::any();
        match a.get_checked(index) {
            Ok(elem) => {
                assert!((0..2).contains(&index));
                assert_eq!(*elem, a.as_slice()[index as usize]);
            }
            Err(err) => {
                assert!(!(0..2).contains(&index));
                assert_eq!(err.bound(), 2);
            }
        }
    }

    #[kani::proof]
    #[kani::unwind(4)]
    fn checked_set_never_writes_out_of_range() {
        let init: [u64; 2] = kani::any();
        let mut a = BoundedArray::from_array(init);
        let index: usize = kani::any();
        kani::assume(index >= 2);
        assert!(a.set_checked(index, kani::any()).is_err());
        assert_eq!(a.into_inner(), init);
    }
}
