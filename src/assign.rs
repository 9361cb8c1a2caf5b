use std::ptr::{self, NonNull};

/// Copies one element of `size` bytes from `src` into `dest`.
///
/// # Safety
///
/// `src` must be valid for reads and `dest` valid for writes of `size` bytes,
/// and the two regions must not overlap.
#[inline]
pub(crate) unsafe fn assign(dest: NonNull<u8>, src: NonNull<u8>, size: usize) {
    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dest.as_ptr(), size) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_copies_exactly_size_bytes() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut dest = [0u8; 6];
        unsafe {
            assign(
                NonNull::from(&mut dest).cast(),
                NonNull::from(&src).cast(),
                4,
            );
        }
        assert_eq!(dest, [1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn test_assign_unaligned_offsets() {
        let src = 0x0102_0304_0506_0708u64.to_le_bytes();
        let mut dest = [0u8; 11];
        let dest_ptr = NonNull::from(&mut dest).cast::<u8>();
        unsafe {
            assign(
                NonNull::new_unchecked(dest_ptr.as_ptr().add(3)),
                NonNull::from(&src).cast(),
                8,
            );
        }
        assert_eq!(&dest[3..], &src);
        assert_eq!(&dest[..3], &[0, 0, 0]);
    }
}
