//! `elemvec`: a type-erased vector of fixed-size elements.
//!
//! The container stores elements of one byte width, fixed at construction,
//! in a single contiguous buffer that it grows and shrinks itself. The buffer
//! memory comes from pluggable memory procs, and an optional reader/writer
//! lock makes the container shareable between threads.
//!
//! Three layers are provided:
//!
//! - [`RawVec`]: the type-erased core. Elements are byte slices of exactly
//!   `element_size()` bytes.
//! - [`ElemVec<T>`]: a typed view over a `RawVec` for any `T: Copy`.
//! - [`SharedVec<T>`]: an `ElemVec<T>` behind a `std::sync::RwLock`.
//!
//! # Capacity Policy
//!
//! - A new vector reserves [`MIN_CAPACITY`] (4) slots.
//! - `push_back()` doubles the buffer before writing when it is already full,
//!   and doubles it again as soon as a write fills it. If the first growth
//!   fails, the push fails with `NotEnoughMemory` and nothing changes.
//! - `pop_back()` halves the buffer once fewer than a quarter of the slots are
//!   live, never going below `MIN_CAPACITY`. A failed shrink is ignored.
//! - `reset()` drops every element and returns to `MIN_CAPACITY`.
//!
//! ```
//! # use elemvec::ElemVec;
//! let mut v = ElemVec::<i32>::new().unwrap();
//! for i in 0..4 {
//!     v.push_back(i).unwrap();
//! }
//! assert_eq!(v.len(), 4);
//! assert_eq!(v.capacity(), 8);
//!
//! for _ in 0..4 {
//!     v.pop_back().unwrap();
//! }
//! assert_eq!(v.capacity(), 4);
//! ```
//!
//! # Stack Interface
//!
//! ```
//! # use elemvec::{ElemVec, ElemVecError};
//! let mut v = ElemVec::<u64>::new().unwrap();
//! v.push_back(1).unwrap();
//! v.push_back(2).unwrap();
//!
//! assert_eq!(v.peek_back(), Ok(&2));
//! assert_eq!(v.pop_back(), Ok(2));
//! assert_eq!(v.pop_back(), Ok(1));
//! assert_eq!(v.pop_back(), Err(ElemVecError::Empty));
//! ```
//!
//! # Visitors and Iterators
//!
//! Traversals run in ascending index order. Write visitors may modify an
//! element in place but cannot add or remove elements.
//!
//! ```
//! # use elemvec::ElemVec;
//! let mut v = ElemVec::<i32>::new().unwrap();
//! for i in 0..4 {
//!     v.push_back(i).unwrap();
//! }
//!
//! v.for_each_mut(|_, elem| *elem *= *elem);
//!
//! let mut sum = 0;
//! v.for_each(|_, elem| sum += *elem);
//! assert_eq!(sum, 14);
//!
//! let collected: Vec<i32> = v.iter().copied().collect();
//! assert_eq!(collected, vec![0, 1, 4, 9]);
//! ```
//!
//! # Type-Erased Elements
//!
//! ```
//! # use elemvec::RawVec;
//! let mut v = RawVec::new(3).unwrap();
//! v.push_back(b"abc").unwrap();
//! v.push_back(b"xyz").unwrap();
//!
//! let mut out = [0u8; 3];
//! v.get_copy_at(0, &mut out).unwrap();
//! assert_eq!(&out, b"abc");
//! assert!(v.push_back(b"too long").is_err());
//! ```
//!
//! # Memory Procs
//!
//! Buffers are obtained through [`MemoryProcs`]. Either implement the trait,
//! or fill a [`ProcTable`] with all four function pointers. A partially
//! filled table is rejected before anything is allocated:
//!
//! ```
//! # use std::alloc::Layout;
//! # use elemvec::{ElemVec, ElemVecError, ProcTable};
//! unsafe fn my_alloc(layout: Layout) -> *mut u8 {
//!     unsafe { std::alloc::alloc(layout) }
//! }
//!
//! let table = ProcTable {
//!     allocate: Some(my_alloc),
//!     ..ProcTable::default()
//! };
//! assert!(matches!(
//!     ElemVec::<u8>::with_proc_table(table),
//!     Err(ElemVecError::InvalidArguments { .. })
//! ));
//! ```
//!
//! # Concurrent Access
//!
//! ```
//! # use elemvec::SharedVec;
//! let v = SharedVec::<u32>::new().unwrap();
//! std::thread::scope(|s| {
//!     s.spawn(|| {
//!         for i in 0..100 {
//!             v.push_back(i).unwrap();
//!         }
//!     });
//!     s.spawn(|| {
//!         let seen = v.len();
//!         assert!(seen <= 100);
//!     });
//! });
//! assert_eq!(v.len(), 100);
//! ```

mod assign;
mod buffer;
mod error;
mod iter;
mod procs;
mod raw;
mod shared;
mod vec;

pub use buffer::{GROWTH_FACTOR, MIN_CAPACITY, SHRINK_DIVISOR};
pub use error::{ElemVecError, Result};
pub use iter::{Iter, IterMut};
pub use procs::{AllocFn, FreeFn, MemoryProcs, ProcTable, ReallocFn, SystemProcs, ZeroAllocFn};
pub use raw::RawVec;
pub use shared::{ElemRef, SharedVec};
pub use vec::ElemVec;
