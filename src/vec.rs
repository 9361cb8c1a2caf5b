use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;
use std::slice;
use std::sync::Arc;

use crate::error::{ElemVecError, Result};
use crate::iter::{Iter, IterMut};
use crate::procs::{MemoryProcs, ProcTable};
use crate::raw::RawVec;

/// A vector of `T` stored through a type-erased [`RawVec`].
///
/// Elements are moved in and out by byte copy, so `T` must be `Copy`.
/// Zero-sized types are rejected at construction.
pub struct ElemVec<T> {
    raw: RawVec,
    _marker: PhantomData<T>,
}

impl<T: Copy> ElemVec<T> {
    /// Creates an empty vector backed by the platform allocator.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `T` is zero-sized
    /// - `ElemVecError::NotEnoughMemory` if the initial buffer cannot be allocated
    pub fn new() -> Result<Self> {
        Self::with_proc_table(ProcTable::default())
    }

    /// Creates an empty vector whose buffer is managed by `table`.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `T` is zero-sized or `table` is
    ///   only partially filled
    /// - `ElemVecError::NotEnoughMemory` if the initial buffer cannot be allocated
    pub fn with_proc_table(table: ProcTable) -> Result<Self> {
        Self::from_procs(table.resolve()?)
    }

    /// Creates an empty vector whose buffer is managed by `procs`.
    ///
    /// # Errors
    ///
    /// Same as [`ElemVec::new`].
    pub fn with_procs<P: MemoryProcs + 'static>(procs: P) -> Result<Self> {
        Self::from_procs(Arc::new(procs))
    }

    fn from_procs(procs: Arc<dyn MemoryProcs>) -> Result<Self> {
        Ok(Self {
            raw: RawVec::from_parts(Layout::new::<T>(), procs)?,
            _marker: PhantomData,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[must_use]
    pub fn element_size(&self) -> usize {
        self.raw.element_size()
    }

    /// Appends `value`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::NotEnoughMemory` if the vector was full and
    /// could not grow. The vector is unchanged in that case.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        // SAFETY: `value` is a local of exactly `element_size()` bytes.
        unsafe { self.raw.push_from(NonNull::from(&value).cast()) }
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::Empty` if the vector is empty.
    pub fn pop_back(&mut self) -> Result<T> {
        let mut out = MaybeUninit::<T>::uninit();
        // SAFETY: `out` has room for one `T`; on success it holds a `T`
        // previously copied in by `push_back`.
        unsafe {
            self.raw.pop_into(NonNull::from(&mut out).cast())?;
            Ok(out.assume_init())
        }
    }

    /// Returns the last element without removing it.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::Empty` if the vector is empty.
    pub fn peek_back(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(ElemVecError::Empty);
        }
        self.get_ref_at(self.len() - 1)
    }

    /// Returns a copy of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_copy_at(&self, index: usize) -> Result<T> {
        let mut out = MaybeUninit::<T>::uninit();
        // SAFETY: as in `pop_back`.
        unsafe {
            self.raw.copy_into(index, NonNull::from(&mut out).cast())?;
            Ok(out.assume_init())
        }
    }

    /// Returns a reference to the element at `index`. The borrow ends before
    /// any mutation, which may relocate the buffer.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_ref_at(&self, index: usize) -> Result<&T> {
        let ptr = self.raw.ptr_at(index)?;
        // SAFETY: live slot, aligned for `T` since the buffer uses `T`'s layout.
        Ok(unsafe { ptr.cast::<T>().as_ref() })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_mut_at(&mut self, index: usize) -> Result<&mut T> {
        let ptr = self.raw.ptr_at(index)?;
        // SAFETY: as in `get_ref_at`, and `&mut self` makes the borrow exclusive.
        Ok(unsafe { &mut *ptr.cast::<T>().as_ptr() })
    }

    /// Calls `visitor` once on the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn exec_at<F>(&mut self, index: usize, visitor: F) -> Result<()>
    where
        F: FnOnce(usize, &mut T),
    {
        let elem = self.get_mut_at(index)?;
        visitor(index, elem);
        Ok(())
    }

    /// Calls `visitor` with every element in ascending index order.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, &T),
    {
        for (index, elem) in self.iter().enumerate() {
            visitor(index, elem);
        }
    }

    /// Calls `visitor` with every element in ascending index order, allowing
    /// it to modify the element in place.
    pub fn for_each_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(usize, &mut T),
    {
        for (index, elem) in self.iter_mut().enumerate() {
            visitor(index, elem);
        }
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.raw.base().cast(), self.len())
    }

    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.raw.base().cast(), self.len())
    }

    /// The live elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len()` slots hold initialised, aligned `T`s.
        unsafe { slice::from_raw_parts(self.raw.base().cast::<T>().as_ptr(), self.len()) }
    }

    /// Removes every element and returns the buffer to its minimum capacity.
    pub fn reset(&mut self) {
        self.raw.reset();
    }

    /// Copies the vector into a new buffer from the same memory procs.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::NotEnoughMemory` if the new buffer cannot be allocated.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            raw: self.raw.try_clone()?,
            _marker: PhantomData,
        })
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ElemVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
