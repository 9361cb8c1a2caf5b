//! The concurrent configuration: an [`ElemVec`] behind a reader/writer lock.
//!
//! Every public call takes the lock for exactly its own duration. Mutating
//! calls (push, pop, reset, write visitors) hold the write lock, including
//! across any buffer resize they trigger; lookups and read visitors share the
//! read lock.
//!
//! The lock is not re-entrant. Calling back into the same `SharedVec` from a
//! visitor deadlocks.
//!
//! A visitor that panics poisons the lock. The vector's structure is valid at
//! every visitor call, so later calls keep using the inner vector instead of
//! propagating the poison.

use std::fmt;
use std::ops::Deref;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::procs::{MemoryProcs, ProcTable};
use crate::vec::ElemVec;

/// A thread-safe [`ElemVec`].
pub struct SharedVec<T> {
    inner: RwLock<ElemVec<T>>,
}

impl<T: Copy> SharedVec<T> {
    /// Creates an empty vector backed by the platform allocator.
    ///
    /// # Errors
    ///
    /// Same as [`ElemVec::new`].
    pub fn new() -> Result<Self> {
        ElemVec::new().map(Self::from)
    }

    /// # Errors
    ///
    /// Same as [`ElemVec::with_proc_table`].
    pub fn with_proc_table(table: ProcTable) -> Result<Self> {
        ElemVec::with_proc_table(table).map(Self::from)
    }

    /// # Errors
    ///
    /// Same as [`ElemVec::with_procs`].
    pub fn with_procs<P: MemoryProcs + 'static>(procs: P) -> Result<Self> {
        ElemVec::with_procs(procs).map(Self::from)
    }

    fn read(&self) -> RwLockReadGuard<'_, ElemVec<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ElemVec<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    #[must_use]
    pub fn element_size(&self) -> usize {
        self.read().element_size()
    }

    /// Appends `value` under the write lock.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::NotEnoughMemory` if the vector was full and
    /// could not grow.
    pub fn push_back(&self, value: T) -> Result<()> {
        self.write().push_back(value)
    }

    /// Removes and returns the last element under the write lock.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::Empty` if the vector is empty.
    pub fn pop_back(&self) -> Result<T> {
        self.write().pop_back()
    }

    /// Returns a copy of the last element.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::Empty` if the vector is empty.
    pub fn peek_back(&self) -> Result<T> {
        self.read().peek_back().copied()
    }

    /// Returns a copy of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_copy_at(&self, index: usize) -> Result<T> {
        self.read().get_copy_at(index)
    }

    /// Returns a reference to the element at `index`.
    ///
    /// The returned [`ElemRef`] keeps the read lock until it is dropped, so
    /// writers block while it is alive. Drop it before calling any mutating
    /// method from the same thread.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_ref_at(&self, index: usize) -> Result<ElemRef<'_, T>> {
        let guard = self.read();
        guard.get_ref_at(index)?;
        Ok(ElemRef { guard, index })
    }

    /// Calls `visitor` once on the element at `index` under the write lock.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn exec_at<F>(&self, index: usize, visitor: F) -> Result<()>
    where
        F: FnOnce(usize, &mut T),
    {
        self.write().exec_at(index, visitor)
    }

    /// Calls `visitor` with every element under the read lock.
    pub fn for_each<F>(&self, visitor: F)
    where
        F: FnMut(usize, &T),
    {
        self.read().for_each(visitor);
    }

    /// Calls `visitor` with every element under the write lock.
    pub fn for_each_mut<F>(&self, visitor: F)
    where
        F: FnMut(usize, &mut T),
    {
        self.write().for_each_mut(visitor);
    }

    /// Removes every element and returns the buffer to its minimum capacity.
    pub fn reset(&self) {
        self.write().reset();
    }

    /// Copies the live elements out under the read lock.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.read().as_slice().to_vec()
    }

    /// # Errors
    ///
    /// Returns `ElemVecError::NotEnoughMemory` if the new buffer cannot be allocated.
    pub fn try_clone(&self) -> Result<Self> {
        self.read().try_clone().map(Self::from)
    }

    /// Consumes the lock and returns the vector.
    #[must_use]
    pub fn into_inner(self) -> ElemVec<T> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> From<ElemVec<T>> for SharedVec<T> {
    fn from(vec: ElemVec<T>) -> Self {
        Self {
            inner: RwLock::new(vec),
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for SharedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedVec")
            .field("elements", &*self.read())
            .finish()
    }
}

/// A reference to one element of a [`SharedVec`], holding the read lock.
pub struct ElemRef<'a, T> {
    guard: RwLockReadGuard<'a, ElemVec<T>>,
    index: usize,
}

impl<T> ElemRef<'_, T> {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T: Copy> Deref for ElemRef<'_, T> {
    type Target = T;

    #[allow(clippy::indexing_slicing)] // index validated when the guard was taken
    fn deref(&self) -> &T {
        &self.guard.as_slice()[self.index]
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ElemRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
