//! The owned backing buffer and its grow/shrink policy.

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::assign::assign;
use crate::error::{ElemVecError, Result};
use crate::procs::MemoryProcs;

/// Slots reserved by a new container; capacity never drops below this.
pub const MIN_CAPACITY: usize = 4;
/// Factor applied to capacity on growth and divided out on shrink.
pub const GROWTH_FACTOR: usize = 2;
/// Capacity is halved once fewer than `capacity / SHRINK_DIVISOR` slots are live.
pub const SHRINK_DIVISOR: usize = 4;

/// A contiguous region of `capacity` element slots obtained from a
/// [`MemoryProcs`] implementation.
///
/// The buffer knows nothing about which slots are live; the owning vector
/// passes its element count into the policy methods.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
    capacity: usize,
    elem: Layout,
    procs: Arc<dyn MemoryProcs>,
}

// SAFETY: the buffer exclusively owns its allocation, and the procs are
// `Send + Sync` by trait bound.
unsafe impl Send for RawBuffer {}
unsafe impl Sync for RawBuffer {}

impl RawBuffer {
    /// Allocates a zeroed buffer of [`MIN_CAPACITY`] slots.
    ///
    /// `elem` must have a non-zero size.
    pub(crate) fn new(elem: Layout, procs: Arc<dyn MemoryProcs>) -> Result<Self> {
        debug_assert!(elem.size() > 0);
        let layout = Self::layout_for(elem, MIN_CAPACITY)?;
        // SAFETY: `MIN_CAPACITY` and `elem.size()` are non-zero.
        let raw = unsafe { procs.allocate_zeroed(MIN_CAPACITY, elem) };
        let ptr = NonNull::new(raw).ok_or(ElemVecError::NotEnoughMemory {
            requested: layout.size(),
        })?;

        Ok(Self {
            ptr,
            layout,
            capacity: MIN_CAPACITY,
            elem,
            procs,
        })
    }

    fn layout_for(elem: Layout, capacity: usize) -> Result<Layout> {
        let size = capacity.saturating_mul(elem.size());
        capacity
            .checked_mul(elem.size())
            .and_then(|size| Layout::from_size_align(size, elem.align()).ok())
            .ok_or(ElemVecError::NotEnoughMemory { requested: size })
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub(crate) fn element_size(&self) -> usize {
        self.elem.size()
    }

    #[must_use]
    pub(crate) fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Address of slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be below `capacity()`.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> NonNull<u8> {
        debug_assert!(index < self.capacity);
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(index * self.elem.size())) }
    }

    /// Reallocates to `new_capacity` slots. On failure nothing changes.
    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == self.capacity {
            return Ok(());
        }
        let new_layout = Self::layout_for(self.elem, new_capacity)?;
        // SAFETY: `ptr` came from `procs` with `layout`; the new size is
        // non-zero and was validated by `Layout::from_size_align`.
        let raw = unsafe { self.procs.reallocate(self.ptr, self.layout, new_layout.size()) };
        let ptr = NonNull::new(raw).ok_or(ElemVecError::NotEnoughMemory {
            requested: new_layout.size(),
        })?;

        self.ptr = ptr;
        self.layout = new_layout;
        self.capacity = new_capacity;
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let new_capacity = self
            .capacity
            .checked_mul(GROWTH_FACTOR)
            .ok_or(ElemVecError::NotEnoughMemory {
                requested: usize::MAX,
            })?;
        self.resize(new_capacity)
    }

    /// Makes room for slot `count` before it is written. Only a full buffer
    /// is grown, and a failed growth is reported to the caller.
    pub(crate) fn reserve_slot(&mut self, count: usize) -> Result<()> {
        if count == self.capacity {
            self.grow()?;
        }
        Ok(())
    }

    /// Grows a buffer that an insertion has just filled. The insertion has
    /// already succeeded, so a failure here is absorbed; the next insertion
    /// retries through `reserve_slot`.
    pub(crate) fn grow_if_full(&mut self, count: usize) {
        if count == self.capacity {
            let _ = self.grow();
        }
    }

    /// Halves the buffer when fewer than a quarter of the slots are live.
    /// Returns whether the buffer shrank; a failed reallocation is absorbed.
    pub(crate) fn shrink_to_fit_count(&mut self, count: usize) -> bool {
        if self.capacity <= MIN_CAPACITY || count >= self.capacity / SHRINK_DIVISOR {
            return false;
        }
        let new_capacity = (self.capacity / GROWTH_FACTOR).max(MIN_CAPACITY);
        self.resize(new_capacity).is_ok()
    }

    /// Returns the buffer to [`MIN_CAPACITY`] slots, keeping the current
    /// capacity if the reallocation fails.
    pub(crate) fn shrink_to_min(&mut self) -> bool {
        self.resize(MIN_CAPACITY).is_ok()
    }

    /// Allocates a new buffer of the same capacity from the same procs and
    /// copies the first `count` slots into it.
    pub(crate) fn try_clone(&self, count: usize) -> Result<Self> {
        debug_assert!(count <= self.capacity);
        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { self.procs.allocate(self.layout) };
        let ptr = NonNull::new(raw).ok_or(ElemVecError::NotEnoughMemory {
            requested: self.layout.size(),
        })?;
        if count > 0 {
            // SAFETY: both regions hold at least `count` slots and are
            // distinct allocations.
            unsafe { assign(ptr, self.ptr, count * self.elem.size()) };
        }

        Ok(Self {
            ptr,
            layout: self.layout,
            capacity: self.capacity,
            elem: self.elem,
            procs: Arc::clone(&self.procs),
        })
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `procs` with the current `layout`.
        unsafe { self.procs.free(self.ptr, self.layout) }
    }
}
