//! Free-list policy: a size-class recycling cache over an inner policy.
//!
//! # Safety
//!
//! Recycled blocks store an intrusive node in their first bytes:
//! - a node is reachable from `root` iff the block is currently free
//! - the link is written and read with unaligned pointer accessors, because
//!   the inner policy may hand out merely even-aligned addresses
//! - every block in the list was allocated from the inner policy at `MAX`
//!   bytes, so any node can satisfy any in-range request
//!
//! ## Invariants
//!
//! - `list_size` equals the number of nodes reachable from `root`
//! - `list_size <= MAX_LIST`; a free against a full list forwards to inner
//! - dropping the policy drains the list into the inner policy

use core::mem;
use core::ptr;

use super::traits::{Allocator, MemoryUsage};
use crate::block::Block;
use crate::utils::{debug_fill, DEALLOC_FILL};

/// Intrusive single-link node living inside a recycled block.
#[repr(C)]
struct FreeNode {
    next: *mut FreeNode,
}

/// Size-class cache recycling `[MIN, MAX]`-byte blocks over policy `I`.
///
/// All cached blocks are allocated from `I` at `MAX` bytes regardless of the
/// original request, which makes them interchangeable: a freed in-range
/// block satisfies the next in-range request without an inner round-trip.
/// Out-of-range requests pass straight through.
///
/// Compile-time constraints: `MIN` and `MAX` even and greater than 1,
/// `MAX >= MIN`, `MAX` at least pointer-sized (the intrusive link must fit),
/// `MAX_LIST > 0`.
///
/// # Copy semantics
/// `clone` copies the inner policy (with its own propagation) and starts
/// with an empty list; cached blocks stay with the source.
pub struct FreeListAllocator<I: Allocator, const MIN: isize, const MAX: isize, const MAX_LIST: usize>
{
    inner: I,
    root: *mut FreeNode,
    list_size: usize,
}

impl<I: Allocator, const MIN: isize, const MAX: isize, const MAX_LIST: usize>
    FreeListAllocator<I, MIN, MAX, MAX_LIST>
{
    const WINDOW_OK: () = assert!(
        MIN > 1
            && MIN % 2 == 0
            && MAX >= MIN
            && MAX % 2 == 0
            && MAX as usize >= mem::size_of::<*mut u8>()
            && MAX_LIST > 0,
        "free-list window must be even, ordered, pointer-sized and non-empty"
    );

    /// Creates the cache over a default-constructed inner policy.
    #[must_use]
    pub fn new() -> Self {
        let () = Self::WINDOW_OK;
        Self { inner: I::default(), root: ptr::null_mut(), list_size: 0 }
    }

    /// Number of blocks currently parked in the list.
    #[inline]
    #[must_use]
    pub fn cached_blocks(&self) -> usize {
        self.list_size
    }

    /// Bytes retained by the list (every cached block is `MAX` bytes).
    #[inline]
    #[must_use]
    pub fn cached_bytes(&self) -> usize {
        self.list_size * MAX as usize
    }

    /// Read access to the inner policy.
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Returns every cached block to the inner policy.
    pub fn drain_cache(&mut self) {
        while !self.root.is_null() {
            let node = self.root;
            // SAFETY: node is a live list entry; its link was stored with
            // write_unaligned when the block was parked.
            self.root = unsafe { node.read_unaligned().next };
            let mut block = Block::new(MAX, node.cast());
            self.inner.deallocate(&mut block);
        }
        self.list_size = 0;
    }

    #[inline]
    fn in_range(size: isize) -> bool {
        size >= MIN && size <= MAX
    }
}

impl<I: Allocator, const MIN: isize, const MAX: isize, const MAX_LIST: usize> Default
    for FreeListAllocator<I, MIN, MAX, MAX_LIST>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Allocator, const MIN: isize, const MAX: isize, const MAX_LIST: usize> Clone
    for FreeListAllocator<I, MIN, MAX, MAX_LIST>
{
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), root: ptr::null_mut(), list_size: 0 }
    }
}

impl<I: Allocator, const MIN: isize, const MAX: isize, const MAX_LIST: usize> Drop
    for FreeListAllocator<I, MIN, MAX, MAX_LIST>
{
    fn drop(&mut self) {
        #[cfg(feature = "logging")]
        tracing::trace!(blocks = self.list_size, "draining free-list cache");

        self.drain_cache();
    }
}

impl<I: Allocator, const MIN: isize, const MAX: isize, const MAX_LIST: usize> Allocator
    for FreeListAllocator<I, MIN, MAX, MAX_LIST>
{
    fn allocate(&mut self, size: isize) -> Block {
        if Self::in_range(size) && self.list_size > 0 {
            let head = self.root;
            // SAFETY: list_size > 0 guarantees a live head node.
            self.root = unsafe { head.read_unaligned().next };
            self.list_size -= 1;
            return Block::new(size, head.cast());
        }

        // In-range misses are upsized to MAX so the block is recyclable;
        // out-of-range requests pass through at their exact size.
        let want = if Self::in_range(size) { MAX } else { size };
        let from_inner = self.inner.allocate(want);
        Block::new(size, from_inner.as_ptr())
    }

    fn deallocate(&mut self, block: &mut Block) {
        if block.is_empty() {
            *block = Block::empty();
            return;
        }

        if !Self::in_range(block.size()) || self.list_size >= MAX_LIST {
            // Reconstruct the upsized block; in-range allocations were
            // served at MAX even when the request was smaller.
            let mut forwarded = Block::new(MAX, block.as_ptr());
            *block = Block::empty();
            self.inner.deallocate(&mut forwarded);
            return;
        }

        let addr = block.as_ptr();
        // SAFETY: the block is live and at least block.size() >= MIN bytes.
        unsafe { debug_fill(addr, block.size() as usize, DEALLOC_FILL) };

        let node = addr.cast::<FreeNode>();
        // SAFETY: MAX >= size_of::<*mut u8>() (compile-time checked) and the
        // block is dead to its previous owner; the link may be unaligned.
        unsafe { node.write_unaligned(FreeNode { next: self.root }) };
        self.root = node;
        self.list_size += 1;
        *block = Block::empty();
    }

    fn owns(&self, block: &Block) -> bool {
        Self::in_range(block.size()) || self.inner.owns(block)
    }
}

impl<I, const MIN: isize, const MAX: isize, const MAX_LIST: usize> MemoryUsage
    for FreeListAllocator<I, MIN, MAX, MAX_LIST>
where
    I: Allocator + MemoryUsage,
{
    // Cached blocks are still allocated from the inner policy, so plain
    // delegation stays truthful.
    fn used_memory(&self) -> usize {
        self.inner.used_memory()
    }

    fn available_memory(&self) -> Option<usize> {
        self.inner.available_memory()
    }
}
