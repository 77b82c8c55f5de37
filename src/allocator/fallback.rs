//! Fallback policy: try a primary allocator, fall back to a second.
//!
//! Deallocation and ownership route through the primary's `owns`, so the
//! primary must be *discriminating* — able to answer `false` for blocks it
//! did not produce. The heap policy's permissive `owns` disqualifies it from
//! the primary slot; it is the canonical terminal fallback.

use super::traits::{Allocator, MemoryUsage};
use crate::block::Block;

/// Two-policy try/else composition.
///
/// Holds one instance of each policy by value. `allocate` asks `P` first and
/// `F` only when `P` comes back empty; `deallocate` routes to whichever
/// policy owns the block, consulting `P` first.
///
/// # Copy semantics
/// `clone` copies both members with their own propagation rules (a cloned
/// arena primary is fresh, a cloned heap fallback is trivial).
#[derive(Debug, Clone, Default)]
pub struct FallbackAllocator<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Allocator, F: Allocator> FallbackAllocator<P, F> {
    /// Creates the composition with default-constructed members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the primary policy.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Read access to the fallback policy.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: Allocator, F: Allocator> Allocator for FallbackAllocator<P, F> {
    fn allocate(&mut self, size: isize) -> Block {
        let block = self.primary.allocate(size);
        if block.is_empty() {
            return self.fallback.allocate(size);
        }
        block
    }

    fn deallocate(&mut self, block: &mut Block) {
        if self.primary.owns(block) {
            self.primary.deallocate(block);
        } else {
            self.fallback.deallocate(block);
        }
    }

    fn owns(&self, block: &Block) -> bool {
        self.primary.owns(block) || self.fallback.owns(block)
    }
}

impl<P, F> MemoryUsage for FallbackAllocator<P, F>
where
    P: MemoryUsage,
    F: MemoryUsage,
{
    fn used_memory(&self) -> usize {
        self.primary.used_memory() + self.fallback.used_memory()
    }

    fn available_memory(&self) -> Option<usize> {
        match (self.primary.available_memory(), self.fallback.available_memory()) {
            (Some(p), Some(f)) => Some(p + f),
            _ => None,
        }
    }
}
