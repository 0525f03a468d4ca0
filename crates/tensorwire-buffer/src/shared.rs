//! Reference-counted byte-buffer views.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable byte buffer backed by shared, reference-counted storage.
///
/// A `SharedBuf` is a `(backing, offset, len)` view: cloning or
/// [`share_slice`](Self::share_slice) produces another lightweight view over
/// the same allocation, and the allocation is freed when the last view drops.
/// Trimming only moves the view's bounds; it never touches the bytes.
///
/// All holders of views over one backing allocation must treat the bytes as
/// immutable for as long as any holder remains live.
#[derive(Clone)]
pub struct SharedBuf {
    backing: Arc<Vec<u8>>,
    offset: usize,
    len: usize,
}

impl SharedBuf {
    /// An empty buffer with no backing bytes.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Take ownership of `bytes` as a fresh, exclusively owned buffer.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Self { backing: Arc::new(bytes), offset: 0, len }
    }

    /// Number of bytes visible through this view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the view covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The viewed bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.backing[self.offset..self.offset + self.len]
    }

    /// Borrow `len` bytes starting at `offset` within this view.
    ///
    /// # Panics
    /// Panics if `offset + len` exceeds the view's length; asking for bytes
    /// outside the buffer is a caller bug, not a recoverable condition.
    pub fn slice(&self, offset: usize, len: usize) -> &[u8] {
        let end = offset.checked_add(len).expect("slice range overflows usize");
        assert!(
            end <= self.len,
            "slice [{offset}, {end}) exceeds buffer length {}",
            self.len
        );
        &self.backing[self.offset + offset..self.offset + end]
    }

    /// Drop `n` bytes from the front of the view.
    ///
    /// # Panics
    /// Panics if `n` exceeds the view's length.
    pub fn trim_start(&mut self, n: usize) {
        assert!(n <= self.len, "cannot trim {n} bytes from a {}-byte buffer", self.len);
        self.offset += n;
        self.len -= n;
    }

    /// Drop `n` bytes from the back of the view.
    ///
    /// # Panics
    /// Panics if `n` exceeds the view's length.
    pub fn trim_end(&mut self, n: usize) {
        assert!(n <= self.len, "cannot trim {n} bytes from a {}-byte buffer", self.len);
        self.len -= n;
    }

    /// A new view over `[offset, offset + len)` of this view, sharing the
    /// backing allocation (zero-copy).
    ///
    /// # Panics
    /// Panics if the range exceeds the view's length.
    pub fn share_slice(&self, offset: usize, len: usize) -> SharedBuf {
        let end = offset.checked_add(len).expect("slice range overflows usize");
        assert!(
            end <= self.len,
            "shared slice [{offset}, {end}) exceeds buffer length {}",
            self.len
        );
        Self { backing: Arc::clone(&self.backing), offset: self.offset + offset, len }
    }

    /// Returns `true` when this view is the only owner of its backing
    /// allocation.
    ///
    /// This is the predicate behind "managed" sharing: aliasing is only safe
    /// when no other holder can outlive or observe the segment unexpectedly.
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.backing) == 1
    }

    /// Returns `true` when `self` and `other` are views over the same backing
    /// allocation (regardless of their bounds).
    pub fn shares_backing(&self, other: &SharedBuf) -> bool {
        Arc::ptr_eq(&self.backing, &other.backing)
    }

    /// Copy the viewed bytes into fresh, exclusively owned storage.
    pub fn unshared(&self) -> SharedBuf {
        Self::from_vec(self.as_slice().to_vec())
    }
}

impl Default for SharedBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SharedBuf {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for SharedBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for SharedBuf {}

impl fmt::Debug for SharedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuf")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("unique", &self.is_unique())
            .finish()
    }
}

impl From<Vec<u8>> for SharedBuf {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
