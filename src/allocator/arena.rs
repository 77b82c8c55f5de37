//! Arena policy: a fixed-capacity bump allocator embedded in the value.
//!
//! # Memory layout
//! ```text
//! [buf]----[alloc1]----[alloc2]----[offset]----[free]----[buf + CAP]
//!           <----- handed out ----->          <- available ->
//! ```
//!
//! ## Invariants
//!
//! - `offset <= CAP`; the bump offset only retracts on a LIFO deallocation
//! - every region is widened to an even size before the bump advances
//! - `owns` is a pure bounds check on the embedded buffer
//!
//! Because the buffer lives *inside* the allocator value, outstanding blocks
//! are invalidated if the arena is moved or dropped; the contract in
//! [`Allocator`] makes that the caller's obligation.

use core::fmt;

use super::traits::{Allocator, MemoryUsage, Resettable};
use crate::block::Block;
use crate::utils::{align_even, debug_fill, ALLOC_FILL, DEALLOC_FILL};

/// Bump allocator over a `CAP`-byte buffer embedded by value.
///
/// `CAP` must be even and greater than 1; violations fail at compile time.
///
/// Deallocation is LIFO-only: freeing the most recent block retracts the
/// bump offset, freeing anything else leaks until the arena is dropped (or
/// [`reset`](Resettable::reset)). That makes the arena ideal as the fast
/// primary of a [`FallbackAllocator`](crate::allocator::FallbackAllocator).
///
/// # Copy semantics
/// `clone` produces a *fresh* arena: new buffer, offset zero, sharing no
/// allocations with the source.
pub struct ArenaAllocator<const CAP: usize> {
    buf: [u8; CAP],
    offset: usize,
}

impl<const CAP: usize> ArenaAllocator<CAP> {
    const CAPACITY_OK: () =
        assert!(CAP > 1 && CAP % 2 == 0, "arena capacity must be even and greater than 1");

    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self { buf: [0; CAP], offset: 0 }
    }

    /// Total buffer capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Bytes currently handed out (including leaked non-LIFO frees).
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.offset
    }

    /// Bytes still available for allocation.
    #[inline]
    #[must_use]
    pub const fn available(&self) -> usize {
        CAP - self.offset
    }

    #[inline]
    fn base(&self) -> usize {
        self.buf.as_ptr() as usize
    }
}

impl<const CAP: usize> Default for ArenaAllocator<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> Clone for ArenaAllocator<CAP> {
    // A copy is a fresh arena; the source keeps its allocations.
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<const CAP: usize> fmt::Debug for ArenaAllocator<CAP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("capacity", &CAP)
            .field("used", &self.offset)
            .finish()
    }
}

impl<const CAP: usize> Allocator for ArenaAllocator<CAP> {
    fn allocate(&mut self, size: isize) -> Block {
        if size <= 0 {
            return Block::empty();
        }

        let widened = align_even(size) as usize;
        if widened > CAP - self.offset {
            return Block::empty();
        }

        // SAFETY: offset + widened <= CAP, so the region lies inside buf.
        let ptr = unsafe { self.buf.as_mut_ptr().add(self.offset) };
        // SAFETY: ptr..ptr+widened is inside buf and unallocated.
        unsafe { debug_fill(ptr, widened, ALLOC_FILL) };
        self.offset += widened;
        Block::new(size, ptr)
    }

    fn deallocate(&mut self, block: &mut Block) {
        if block.is_empty() {
            *block = Block::empty();
            return;
        }

        // Retract only when this was the most recent allocation.
        let widened = align_even(block.size()) as usize;
        if let Some(previous) = self.offset.checked_sub(widened) {
            if block.as_ptr() as usize == self.base() + previous {
                // SAFETY: the block was the last region handed out, so
                // widened bytes at its address are inside buf.
                unsafe { debug_fill(block.as_ptr(), widened, DEALLOC_FILL) };
                self.offset = previous;
            }
        }
        *block = Block::empty();
    }

    #[inline]
    fn owns(&self, block: &Block) -> bool {
        let addr = block.as_ptr() as usize;
        addr >= self.base() && addr < self.base() + CAP
    }
}

impl<const CAP: usize> MemoryUsage for ArenaAllocator<CAP> {
    fn used_memory(&self) -> usize {
        self.used()
    }

    fn available_memory(&self) -> Option<usize> {
        Some(self.available())
    }
}

impl<const CAP: usize> Resettable for ArenaAllocator<CAP> {
    unsafe fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut arena = ArenaAllocator::<64>::new();
        let mut block = arena.allocate(16);
        assert!(!block.is_empty());
        assert_eq!(block.size(), 16);
        assert!(arena.owns(&block));

        arena.deallocate(&mut block);
        assert!(block.is_empty());
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_odd_sizes_widen_to_even() {
        let mut arena = ArenaAllocator::<16>::new();
        let block = arena.allocate(3);
        assert_eq!(block.size(), 3);
        assert_eq!(arena.used(), 4);
    }

    #[test]
    fn test_exhaustion_leaves_prior_allocations_intact() {
        let mut arena = ArenaAllocator::<32>::new();
        let first = arena.allocate(24);
        assert!(!first.is_empty());

        let overflow = arena.allocate(16);
        assert!(overflow.is_empty());
        assert_eq!(arena.used(), 24);
        assert!(arena.owns(&first));
    }

    #[test]
    fn test_lifo_retracts_non_lifo_leaks() {
        let mut arena = ArenaAllocator::<64>::new();
        let mut a = arena.allocate(8);
        let mut b = arena.allocate(8);
        assert_eq!(arena.used(), 16);

        // Non-LIFO: a leaks until drop.
        arena.deallocate(&mut a);
        assert!(a.is_empty());
        assert_eq!(arena.used(), 16);

        // LIFO: b retracts.
        arena.deallocate(&mut b);
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn test_non_positive_sizes() {
        let mut arena = ArenaAllocator::<16>::new();
        assert!(arena.allocate(0).is_empty());
        assert!(arena.allocate(-2).is_empty());
    }

    #[test]
    fn test_owns_rejects_foreign_blocks() {
        let arena = ArenaAllocator::<16>::new();
        assert!(!arena.owns(&Block::empty()));

        let mut other = ArenaAllocator::<16>::new();
        let foreign = other.allocate(4);
        assert!(!arena.owns(&foreign));
    }

    #[test]
    fn test_clone_is_fresh() {
        let mut arena = ArenaAllocator::<32>::new();
        let block = arena.allocate(8);
        assert!(!block.is_empty());

        let copy = arena.clone();
        assert_eq!(copy.used(), 0);
        assert!(!copy.owns(&block));
    }

    #[test]
    fn test_reset() {
        let mut arena = ArenaAllocator::<32>::new();
        let _ = arena.allocate(8);
        // SAFETY: the outstanding block is never touched again.
        unsafe { arena.reset() };
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.available(), 32);
    }

    #[test]
    fn test_memory_usage() {
        let mut arena = ArenaAllocator::<64>::new();
        let _ = arena.allocate(16);
        assert_eq!(arena.used_memory(), 16);
        assert_eq!(arena.available_memory(), Some(48));
        assert_eq!(arena.total_memory(), Some(64));
    }
}
