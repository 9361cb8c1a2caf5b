//! Pluggable memory procs.
//!
//! Every buffer operation goes through a [`MemoryProcs`] implementation. The
//! default is [`SystemProcs`], a thin wrapper over `std::alloc`. Callers that
//! want their own memory source either implement the trait or fill in a
//! [`ProcTable`] of plain function pointers.

use std::alloc::{self, Layout};
use std::ptr::NonNull;
use std::sync::Arc;

use crate::error::{ElemVecError, Result};

/// Allocates a region for `layout`. Returns null on failure.
pub type AllocFn = unsafe fn(layout: Layout) -> *mut u8;
/// Allocates a zeroed region for `count` elements of `elem`. Returns null on failure.
pub type ZeroAllocFn = unsafe fn(count: usize, elem: Layout) -> *mut u8;
/// Resizes the region at `ptr` from `old` to `new_size` bytes. Returns null on failure.
pub type ReallocFn = unsafe fn(ptr: NonNull<u8>, old: Layout, new_size: usize) -> *mut u8;
/// Releases the region at `ptr`.
pub type FreeFn = unsafe fn(ptr: NonNull<u8>, layout: Layout);

/// The four memory-management operations used over a buffer's lifetime.
///
/// # Safety
///
/// Implementors must uphold the `GlobalAlloc`-style contract:
///
/// - a non-null return points to a region valid for reads and writes of the
///   requested size and aligned to the requested alignment;
/// - `allocate_zeroed` fills the returned region with zero bytes;
/// - a successful `reallocate` preserves the first `min(old.size(), new_size)`
///   bytes and invalidates `ptr`; a failed one (null) leaves `ptr` untouched;
/// - `free` accepts any pointer previously returned by this implementation
///   together with its current layout.
///
/// The container never calls any of these with a zero-sized layout.
pub unsafe trait MemoryProcs: Send + Sync {
    /// # Safety
    ///
    /// `layout` must have a non-zero size.
    unsafe fn allocate(&self, layout: Layout) -> *mut u8;

    /// # Safety
    ///
    /// `count` and `elem.size()` must both be non-zero.
    unsafe fn allocate_zeroed(&self, count: usize, elem: Layout) -> *mut u8;

    /// # Safety
    ///
    /// `ptr` must come from this implementation with layout `old`, and
    /// `new_size` must be non-zero and not overflow `isize` when rounded up to
    /// `old.align()`.
    unsafe fn reallocate(&self, ptr: NonNull<u8>, old: Layout, new_size: usize) -> *mut u8;

    /// # Safety
    ///
    /// `ptr` must come from this implementation with layout `layout` and must
    /// not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Platform allocator, used when no memory procs are supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcs;

// SAFETY: every method forwards to `std::alloc`, which satisfies the contract
// for the non-zero layouts the container passes in.
unsafe impl MemoryProcs for SystemProcs {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        unsafe { alloc::alloc(layout) }
    }

    unsafe fn allocate_zeroed(&self, count: usize, elem: Layout) -> *mut u8 {
        let Some(size) = count.checked_mul(elem.size()) else {
            return std::ptr::null_mut();
        };
        match Layout::from_size_align(size, elem.align()) {
            Ok(layout) => unsafe { alloc::alloc_zeroed(layout) },
            Err(_) => std::ptr::null_mut(),
        }
    }

    unsafe fn reallocate(&self, ptr: NonNull<u8>, old: Layout, new_size: usize) -> *mut u8 {
        unsafe { alloc::realloc(ptr.as_ptr(), old, new_size) }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// A table of memory-management function pointers.
///
/// Either all four entries are set or none is. An empty table (the
/// `Default`) selects [`SystemProcs`]; a partially filled table is rejected
/// with [`ElemVecError::InvalidArguments`] before anything is allocated.
///
/// Every function must follow the contract documented on [`MemoryProcs`].
#[derive(Clone, Copy, Default)]
pub struct ProcTable {
    pub allocate: Option<AllocFn>,
    pub allocate_zeroed: Option<ZeroAllocFn>,
    pub reallocate: Option<ReallocFn>,
    pub free: Option<FreeFn>,
}

impl ProcTable {
    /// An empty table, equivalent to the platform allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when all four entries are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.allocate.is_some()
            && self.allocate_zeroed.is_some()
            && self.reallocate.is_some()
            && self.free.is_some()
    }

    /// Returns true when no entry is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocate.is_none()
            && self.allocate_zeroed.is_none()
            && self.reallocate.is_none()
            && self.free.is_none()
    }

    pub(crate) fn resolve(self) -> Result<Arc<dyn MemoryProcs>> {
        match (self.allocate, self.allocate_zeroed, self.reallocate, self.free) {
            (None, None, None, None) => Ok(Arc::new(SystemProcs)),
            (Some(allocate), Some(allocate_zeroed), Some(reallocate), Some(free)) => {
                Ok(Arc::new(FnProcs {
                    allocate,
                    allocate_zeroed,
                    reallocate,
                    free,
                }))
            }
            _ => Err(ElemVecError::InvalidArguments {
                reason: "memory procs must be supplied all together or not at all",
            }),
        }
    }
}

/// A complete [`ProcTable`].
struct FnProcs {
    allocate: AllocFn,
    allocate_zeroed: ZeroAllocFn,
    reallocate: ReallocFn,
    free: FreeFn,
}

// SAFETY: the caller that filled the `ProcTable` vouches for the contract.
unsafe impl MemoryProcs for FnProcs {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        unsafe { (self.allocate)(layout) }
    }

    unsafe fn allocate_zeroed(&self, count: usize, elem: Layout) -> *mut u8 {
        unsafe { (self.allocate_zeroed)(count, elem) }
    }

    unsafe fn reallocate(&self, ptr: NonNull<u8>, old: Layout, new_size: usize) -> *mut u8 {
        unsafe { (self.reallocate)(ptr, old, new_size) }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (self.free)(ptr, layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn sys_allocate(layout: Layout) -> *mut u8 {
        unsafe { SystemProcs.allocate(layout) }
    }

    unsafe fn sys_allocate_zeroed(count: usize, elem: Layout) -> *mut u8 {
        unsafe { SystemProcs.allocate_zeroed(count, elem) }
    }

    unsafe fn sys_reallocate(ptr: NonNull<u8>, old: Layout, new_size: usize) -> *mut u8 {
        unsafe { SystemProcs.reallocate(ptr, old, new_size) }
    }

    unsafe fn sys_free(ptr: NonNull<u8>, layout: Layout) {
        unsafe { SystemProcs.free(ptr, layout) }
    }

    fn full_table() -> ProcTable {
        ProcTable {
            allocate: Some(sys_allocate),
            allocate_zeroed: Some(sys_allocate_zeroed),
            reallocate: Some(sys_reallocate),
            free: Some(sys_free),
        }
    }

    #[test]
    fn test_empty_table_resolves_to_system() {
        let table = ProcTable::new();
        assert!(table.is_empty());
        assert!(!table.is_complete());
        assert!(table.resolve().is_ok());
    }

    #[test]
    fn test_full_table_resolves() {
        let table = full_table();
        assert!(table.is_complete());
        assert!(!table.is_empty());
        assert!(table.resolve().is_ok());
    }

    #[test]
    fn test_partial_tables_rejected() {
        let mut missing_free = full_table();
        missing_free.free = None;
        let mut missing_zeroed = full_table();
        missing_zeroed.allocate_zeroed = None;
        let only_allocate = ProcTable {
            allocate: Some(sys_allocate),
            ..ProcTable::default()
        };

        for table in [missing_free, missing_zeroed, only_allocate] {
            assert!(matches!(
                table.resolve(),
                Err(ElemVecError::InvalidArguments { .. })
            ));
        }
    }

    #[test]
    fn test_system_zeroed_and_realloc() {
        let elem = Layout::new::<u32>();
        let procs = SystemProcs;
        unsafe {
            let raw = procs.allocate_zeroed(4, elem);
            let ptr = NonNull::new(raw).unwrap();
            let words = std::slice::from_raw_parts_mut(ptr.cast::<u32>().as_ptr(), 4);
            assert_eq!(words, &[0, 0, 0, 0]);
            words.copy_from_slice(&[1, 2, 3, 4]);

            let old = Layout::from_size_align(16, 4).unwrap();
            let grown = NonNull::new(procs.reallocate(ptr, old, 32)).unwrap();
            let words = std::slice::from_raw_parts(grown.cast::<u32>().as_ptr(), 4);
            assert_eq!(words, &[1, 2, 3, 4]);

            procs.free(grown, Layout::from_size_align(32, 4).unwrap());
        }
    }

    #[test]
    fn test_system_zeroed_overflow_is_null() {
        let raw = unsafe { SystemProcs.allocate_zeroed(usize::MAX, Layout::new::<u64>()) };
        assert!(raw.is_null());
    }
}
