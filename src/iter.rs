use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::vec::ElemVec;

/// Iterator over the elements of an `ElemVec`
///
/// The element count and buffer address are captured when the iterator is
/// created. This iterator implements `Clone` and `DoubleEndedIterator`.
pub struct Iter<'a, T> {
    base: NonNull<T>,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a T>,
}

// SAFETY: `Iter` only hands out shared references.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<'a, T> Iter<'a, T> {
    /// `base` must point to `len` initialised elements borrowed for `'a`.
    pub(crate) fn new(base: NonNull<T>, len: usize) -> Self {
        Self {
            base,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base,
            front: self.front,
            back: self.back,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        // SAFETY: front < back <= len
        let item = unsafe { &*self.base.as_ptr().add(self.front) };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: front <= back < len
        Some(unsafe { &*self.base.as_ptr().add(self.back) })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over the elements of an `ElemVec`
///
/// Each element is yielded at most once, so the references never alias.
pub struct IterMut<'a, T> {
    base: NonNull<T>,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a mut T>,
}

// SAFETY: `IterMut` behaves like `&mut [T]`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> IterMut<'a, T> {
    /// `base` must point to `len` initialised elements exclusively borrowed for `'a`.
    pub(crate) fn new(base: NonNull<T>, len: usize) -> Self {
        Self {
            base,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        // SAFETY: front < back <= len, and `front` only moves forward
        let item = unsafe { &mut *self.base.as_ptr().add(self.front) };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: front <= back < len, and `back` only moves backward
        Some(unsafe { &mut *self.base.as_ptr().add(self.back) })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<'a, T: Copy> IntoIterator for &'a ElemVec<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Copy> IntoIterator for &'a mut ElemVec<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
