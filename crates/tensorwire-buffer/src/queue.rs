//! Chained output buffer with copy and zero-copy append.

use crate::shared::SharedBuf;

/// Cap on a single physical output allocation.
///
/// Common allocators hand very large requests straight to `mmap`, so the copy
/// cursor writes through blocks of at most this size and chains them instead
/// of growing one oversized buffer.
pub const MAX_BLOCK_SIZE: usize = 2 << 20;

/// A growing chain of byte chunks that flattens into one [`SharedBuf`].
///
/// Copied bytes accumulate in a block-capped cursor; shared chunks slot into
/// the chain as-is, keeping their backing allocation aliased. Chunk order is
/// append order, so the flattened output reproduces exactly the byte sequence
/// that was appended.
#[derive(Debug)]
pub struct BufQueue {
    chunks: Vec<SharedBuf>,
    tail: Vec<u8>,
    block_size: usize,
    len: usize,
}

impl BufQueue {
    /// Create a queue whose copy cursor allocates blocks sized for
    /// `size_hint` total bytes, capped at [`MAX_BLOCK_SIZE`].
    pub fn new(size_hint: usize) -> Self {
        Self::with_block_size(size_hint.clamp(1, MAX_BLOCK_SIZE))
    }

    fn with_block_size(block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be non-zero");
        Self { chunks: Vec::new(), tail: Vec::new(), block_size, len: 0 }
    }

    /// Total bytes appended so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy `bytes` into the queue through the block cursor.
    ///
    /// Runs larger than the block size are split across multiple blocks; at
    /// most one partially filled block is ever live.
    pub fn append_copy(&mut self, mut bytes: &[u8]) {
        self.len += bytes.len();
        while !bytes.is_empty() {
            if self.tail.len() == self.block_size {
                self.seal_tail();
            }
            if self.tail.is_empty() {
                self.tail.reserve_exact(self.block_size);
            }
            let space = self.block_size - self.tail.len();
            let take = space.min(bytes.len());
            self.tail.extend_from_slice(&bytes[..take]);
            bytes = &bytes[take..];
        }
    }

    /// Append `chunk` without copying; its backing stays aliased.
    ///
    /// Any partially filled copy block is sealed first so byte order is
    /// preserved.
    pub fn append_share(&mut self, chunk: SharedBuf) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.seal_tail();
        self.chunks.push(chunk);
    }

    fn seal_tail(&mut self) {
        if !self.tail.is_empty() {
            let block = std::mem::take(&mut self.tail);
            self.chunks.push(SharedBuf::from_vec(block));
        }
    }

    /// Flatten the chain into a single buffer.
    ///
    /// A chain of exactly one chunk is returned unchanged — in particular a
    /// lone shared chunk stays zero-copy. Longer chains are concatenated into
    /// fresh storage.
    pub fn into_buf(mut self) -> SharedBuf {
        self.seal_tail();
        if self.chunks.len() == 1 {
            return self.chunks.remove(0);
        }
        let mut flat = Vec::with_capacity(self.len);
        for chunk in &self.chunks {
            flat.extend_from_slice(chunk);
        }
        SharedBuf::from_vec(flat)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
