use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;
use std::slice;
use std::sync::Arc;

use crate::assign::assign;
use crate::buffer::RawBuffer;
use crate::error::{ElemVecError, Result};
use crate::procs::{MemoryProcs, ProcTable};

/// A type-erased vector of fixed-size elements.
///
/// Elements are opaque byte strings of exactly `element_size()` bytes. The
/// element size is fixed at construction; every slice passed in must match
/// it, otherwise the call fails with [`ElemVecError::InvalidArguments`] and
/// the vector is left untouched.
pub struct RawVec {
    buffer: RawBuffer,
    count: usize,
}

impl RawVec {
    /// Creates an empty vector for elements of `element_size` bytes, backed by
    /// the platform allocator.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `element_size` is 0
    /// - `ElemVecError::NotEnoughMemory` if the initial buffer cannot be allocated
    pub fn new(element_size: usize) -> Result<Self> {
        Self::with_proc_table(element_size, ProcTable::default())
    }

    /// Creates an empty vector whose buffer is managed by `table`.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `element_size` is 0 or `table` is
    ///   only partially filled; nothing is allocated in that case
    /// - `ElemVecError::NotEnoughMemory` if the initial buffer cannot be allocated
    pub fn with_proc_table(element_size: usize, table: ProcTable) -> Result<Self> {
        let elem = byte_layout(element_size)?;
        Self::from_parts(elem, table.resolve()?)
    }

    /// Creates an empty vector whose buffer is managed by `procs`.
    ///
    /// # Errors
    ///
    /// Same as [`RawVec::new`].
    pub fn with_procs<P: MemoryProcs + 'static>(element_size: usize, procs: P) -> Result<Self> {
        Self::from_parts(byte_layout(element_size)?, Arc::new(procs))
    }

    pub(crate) fn from_parts(elem: Layout, procs: Arc<dyn MemoryProcs>) -> Result<Self> {
        if elem.size() == 0 {
            return Err(ElemVecError::InvalidArguments {
                reason: "element size must be greater than zero",
            });
        }
        Ok(Self {
            buffer: RawBuffer::new(elem, procs)?,
            count: 0,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of element slots currently backing the vector.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[must_use]
    pub fn element_size(&self) -> usize {
        self.buffer.element_size()
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len == self.element_size() {
            Ok(())
        } else {
            Err(ElemVecError::InvalidArguments {
                reason: "slice length does not match the element size",
            })
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.count {
            Ok(())
        } else {
            Err(ElemVecError::KeyNotFound {
                index,
                length: self.count,
            })
        }
    }

    pub(crate) fn base(&self) -> NonNull<u8> {
        self.buffer.as_ptr()
    }

    /// Address of live element `index`.
    pub(crate) fn ptr_at(&self, index: usize) -> Result<NonNull<u8>> {
        self.check_index(index)?;
        // SAFETY: index < count <= capacity
        Ok(unsafe { self.buffer.slot(index) })
    }

    /// Appends the element at `src`.
    ///
    /// # Safety
    ///
    /// `src` must be valid for reads of `element_size()` bytes and must not
    /// point into this vector's buffer.
    pub(crate) unsafe fn push_from(&mut self, src: NonNull<u8>) -> Result<()> {
        self.buffer.reserve_slot(self.count)?;
        // SAFETY: reserve_slot guarantees count < capacity.
        unsafe { assign(self.buffer.slot(self.count), src, self.element_size()) };
        self.count += 1;
        self.buffer.grow_if_full(self.count);
        Ok(())
    }

    /// Removes the last element, copying it into `dst`.
    ///
    /// # Safety
    ///
    /// `dst` must be valid for writes of `element_size()` bytes and must not
    /// point into this vector's buffer.
    pub(crate) unsafe fn pop_into(&mut self, dst: NonNull<u8>) -> Result<()> {
        if self.count == 0 {
            return Err(ElemVecError::Empty);
        }
        let last = self.count - 1;
        // SAFETY: last < count <= capacity
        unsafe { assign(dst, self.buffer.slot(last), self.element_size()) };
        self.count = last;
        self.buffer.shrink_to_fit_count(self.count);
        Ok(())
    }

    /// Copies live element `index` into `dst`.
    ///
    /// # Safety
    ///
    /// Same as [`RawVec::pop_into`].
    pub(crate) unsafe fn copy_into(&self, index: usize, dst: NonNull<u8>) -> Result<()> {
        let src = self.ptr_at(index)?;
        unsafe { assign(dst, src, self.element_size()) };
        Ok(())
    }

    /// Appends a copy of `elem`.
    ///
    /// The buffer doubles before the write when it is already full, and again
    /// right after a write that fills it.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `elem.len()` differs from the element size
    /// - `ElemVecError::NotEnoughMemory` if the vector was full and could not grow;
    ///   the vector is unchanged
    pub fn push_back(&mut self, elem: &[u8]) -> Result<()> {
        self.check_len(elem.len())?;
        // SAFETY: `elem` is a live shared borrow, so it cannot alias the buffer
        // this `&mut self` owns.
        unsafe { self.push_from(NonNull::from(elem).cast()) }
    }

    /// Removes the last element, copying it into `out`.
    ///
    /// Halves the buffer afterwards when fewer than a quarter of the slots
    /// remain in use; a failed shrink is ignored.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `out.len()` differs from the element size
    /// - `ElemVecError::Empty` if there is nothing to remove
    pub fn pop_back(&mut self, out: &mut [u8]) -> Result<()> {
        self.check_len(out.len())?;
        // SAFETY: `out` is an exclusive borrow distinct from the buffer.
        unsafe { self.pop_into(NonNull::from(out).cast()) }
    }

    /// Returns the last element without removing it.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::Empty` if the vector is empty.
    pub fn peek_back(&self) -> Result<&[u8]> {
        if self.count == 0 {
            return Err(ElemVecError::Empty);
        }
        self.get_at(self.count - 1)
    }

    /// Copies the element at `index` into `out`.
    ///
    /// # Errors
    ///
    /// - `ElemVecError::InvalidArguments` if `out.len()` differs from the element size
    /// - `ElemVecError::KeyNotFound` if `index` is out of bounds; `out` is untouched
    pub fn get_copy_at(&self, index: usize, out: &mut [u8]) -> Result<()> {
        self.check_len(out.len())?;
        // SAFETY: `out` is an exclusive borrow distinct from the buffer.
        unsafe { self.copy_into(index, NonNull::from(out).cast()) }
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_at(&self, index: usize) -> Result<&[u8]> {
        let ptr = self.ptr_at(index)?;
        // SAFETY: live slots hold `element_size()` initialised bytes.
        Ok(unsafe { slice::from_raw_parts(ptr.as_ptr(), self.element_size()) })
    }

    /// Returns the bytes of the element at `index` for in-place mutation.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn get_mut_at(&mut self, index: usize) -> Result<&mut [u8]> {
        let ptr = self.ptr_at(index)?;
        // SAFETY: as in `get_at`, and `&mut self` makes the borrow exclusive.
        Ok(unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), self.element_size()) })
    }

    /// Calls `visitor` once on the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::KeyNotFound` if `index` is out of bounds.
    pub fn exec_at<F>(&mut self, index: usize, visitor: F) -> Result<()>
    where
        F: FnOnce(usize, &mut [u8]),
    {
        let elem = self.get_mut_at(index)?;
        visitor(index, elem);
        Ok(())
    }

    /// Calls `visitor` with every element in ascending index order.
    pub fn for_each_bytes<F>(&self, mut visitor: F)
    where
        F: FnMut(usize, &[u8]),
    {
        let (base, size, count) = (self.base(), self.element_size(), self.count);
        for index in 0..count {
            // SAFETY: index < count; live slots are initialised.
            let elem = unsafe { slice::from_raw_parts(base.as_ptr().add(index * size), size) };
            visitor(index, elem);
        }
    }

    /// Calls `visitor` with every element in ascending index order, allowing
    /// it to rewrite the element in place.
    pub fn for_each_bytes_mut<F>(&mut self, mut visitor: F)
    where
        F: FnMut(usize, &mut [u8]),
    {
        let (base, size, count) = (self.base(), self.element_size(), self.count);
        for index in 0..count {
            // SAFETY: index < count; each slot is handed out once.
            let elem =
                unsafe { slice::from_raw_parts_mut(base.as_ptr().add(index * size), size) };
            visitor(index, elem);
        }
    }

    /// Drops every element and returns the buffer to its minimum capacity.
    /// The count is always reset, even if the shrinking reallocation fails.
    pub fn reset(&mut self) {
        self.count = 0;
        self.buffer.shrink_to_min();
    }

    /// Copies the vector into a new buffer from the same memory procs.
    ///
    /// # Errors
    ///
    /// Returns `ElemVecError::NotEnoughMemory` if the new buffer cannot be allocated.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            buffer: self.buffer.try_clone(self.count)?,
            count: self.count,
        })
    }
}

impl fmt::Debug for RawVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawVec")
            .field("element_size", &self.element_size())
            .field("len", &self.count)
            .field("capacity", &self.capacity())
            .finish()
    }
}

fn byte_layout(element_size: usize) -> Result<Layout> {
    Layout::from_size_align(element_size, 1).map_err(|_| ElemVecError::InvalidArguments {
        reason: "element size exceeds isize::MAX",
    })
}
