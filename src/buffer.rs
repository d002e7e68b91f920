//! Raw, cache-line aligned benchmark memory.
//!
//! An [`AlignedBuffer`] owns exactly one heap allocation. It can be moved but
//! never cloned: duplicating benchmark buffers would silently double the memory
//! pressure of a run.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::ptr::NonNull;

use crate::engine::Word;
use crate::error::{BenchError, Result};

/// Alignment of every allocation, one cache line on all supported targets.
pub const CACHE_LINE: usize = 64;

/// Heap buffer with a fixed byte count, aligned on [`CACHE_LINE`].
///
/// The allocation is rounded up to a whole number of cache lines so two
/// buffers never share a line; [`len`](Self::len) still reports the requested size.
pub struct AlignedBuffer {
    ptr: Option<NonNull<u8>>,
    len: usize,
}

impl AlignedBuffer {
    /// Allocate `size` zeroed bytes.
    ///
    /// A zero-sized buffer owns no allocation.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Ok(Self::default());
        }

        let layout = Self::layout(size)?;
        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(BenchError::OutOfMemory { size })?;

        Ok(Self {
            ptr: Some(ptr),
            len: size,
        })
    }

    fn layout(size: usize) -> Result<Layout> {
        let rounded = size
            .checked_next_multiple_of(CACHE_LINE)
            .ok_or(BenchError::OutOfMemory { size })?;
        Layout::from_size_align(rounded, CACHE_LINE).map_err(|_| BenchError::OutOfMemory { size })
    }

    /// Byte count requested at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw bytes of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        match self.ptr {
            // SAFETY: ptr covers `len` initialized bytes owned by self.
            Some(ptr) => unsafe { std::slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Mutable raw bytes of the buffer
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self.ptr {
            // SAFETY: ptr covers `len` initialized bytes, uniquely borrowed through &mut self.
            Some(ptr) => unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// View the buffer as whole words of `T`.
    ///
    /// Trailing bytes that do not fill a word are not exposed.
    pub fn words<T: Word>(&self) -> &[T] {
        let count = self.len / std::mem::size_of::<T>();
        match self.ptr {
            // SAFETY: CACHE_LINE alignment satisfies every Word, all bit patterns are valid
            // words, and count * size_of::<T>() <= len.
            Some(ptr) => unsafe { std::slice::from_raw_parts(ptr.as_ptr().cast::<T>(), count) },
            None => &[],
        }
    }

    /// Mutable view as whole words of `T`
    pub fn words_mut<T: Word>(&mut self) -> &mut [T] {
        let count = self.len / std::mem::size_of::<T>();
        match self.ptr {
            // SAFETY: see `words`; uniquely borrowed through &mut self.
            Some(ptr) => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr().cast::<T>(), count)
            },
            None => &mut [],
        }
    }

    /// Overwrite this buffer with the contents of `source`.
    ///
    /// # Panics
    /// Panics if the two buffers differ in size.
    pub fn copy_from(&mut self, source: &AlignedBuffer) {
        self.as_bytes_mut().copy_from_slice(source.as_bytes());
    }
}

impl Default for AlignedBuffer {
    /// An empty buffer, also the state left behind by `std::mem::take`.
    fn default() -> Self {
        Self { ptr: None, len: 0 }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // The layout was valid at construction, so recomputing it cannot fail.
            if let Ok(layout) = Self::layout(self.len) {
                // SAFETY: ptr was returned by alloc_zeroed with this exact layout.
                unsafe { dealloc(ptr.as_ptr(), layout) };
            }
        }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("allocated", &self.ptr.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_aligned_and_zeroed() {
        let buf = AlignedBuffer::new(100).unwrap();
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.as_bytes().as_ptr() as usize % CACHE_LINE, 0);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_size_owns_nothing() {
        let buf = AlignedBuffer::new(0).unwrap();
        assert!(buf.is_empty());
        assert!(buf.as_bytes().is_empty());
        assert!(buf.words::<u64>().is_empty());
    }

    #[test]
    fn test_oversized_request_is_out_of_memory() {
        match AlignedBuffer::new(usize::MAX - 8) {
            Err(BenchError::OutOfMemory { size }) => assert_eq!(size, usize::MAX - 8),
            other => panic!("expected OutOfMemory, got {:?}", other),
        }
    }

    #[test]
    fn test_take_leaves_empty_source() {
        let mut buf = AlignedBuffer::new(256).unwrap();
        buf.as_bytes_mut()[0] = 0xAB;

        let moved = std::mem::take(&mut buf);
        assert!(buf.is_empty());
        assert_eq!(moved.len(), 256);
        assert_eq!(moved.as_bytes()[0], 0xAB);
    }

    #[test]
    fn test_word_views() {
        let mut buf = AlignedBuffer::new(18).unwrap();
        assert_eq!(buf.words::<u32>().len(), 4);
        assert_eq!(buf.words::<u16>().len(), 9);

        buf.words_mut::<u32>()[1] = 0x0102_0304;
        assert_eq!(&buf.as_bytes()[4..8], &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_copy_from() {
        let mut src = AlignedBuffer::new(64).unwrap();
        for (i, b) in src.as_bytes_mut().iter_mut().enumerate() {
            *b = i as u8;
        }
        let mut dst = AlignedBuffer::new(64).unwrap();
        dst.copy_from(&src);
        assert_eq!(dst.as_bytes(), src.as_bytes());
    }
}
