//! Front-door API: structured results over any conforming policy.
//!
//! Policies report failure as empty blocks; these free functions translate
//! that into [`AllocResult`] for callers that want a `?`-friendly surface.

use crate::allocator::Allocator;
use crate::block::Block;
use crate::error::{AllocResult, AllocatorError};

/// Creates a default-constructed policy instance.
#[must_use]
pub fn create<A: Allocator>() -> A {
    A::default()
}

/// Requests `size` bytes from `allocator`.
///
/// # Errors
/// - [`AllocatorError::InvalidSize`] when `size` is negative
/// - [`AllocatorError::Unknown`] when the policy returned an empty block
///
/// A zero `size` succeeds with an empty block.
pub fn allocate<A: Allocator>(allocator: &mut A, size: isize) -> AllocResult<Block> {
    if size < 0 {
        return Err(AllocatorError::invalid_size(size));
    }
    if size == 0 {
        return Ok(Block::empty());
    }

    let block = allocator.allocate(size);
    if block.is_empty() {
        return Err(AllocatorError::unknown(size));
    }
    Ok(block)
}

/// Releases `block` through `allocator`, resetting it to empty.
pub fn deallocate<A: Allocator>(allocator: &mut A, block: &mut Block) {
    allocator.deallocate(block);
}

/// Asks `allocator` whether it could free `block`.
#[must_use]
pub fn owns<A: Allocator>(allocator: &A, block: &Block) -> bool {
    allocator.owns(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{ArenaAllocator, HeapAllocator};

    #[test]
    fn test_negative_size_rejected() {
        let mut heap: HeapAllocator = create();
        let err = allocate(&mut heap, -1).unwrap_err();
        assert!(err.is_invalid_size());
    }

    #[test]
    fn test_zero_size_yields_empty_block() {
        let mut heap: HeapAllocator = create();
        let block = allocate(&mut heap, 0).unwrap();
        assert!(block.is_empty());
    }

    #[test]
    fn test_policy_failure_maps_to_unknown() {
        let mut arena: ArenaAllocator<16> = create();
        let err = allocate(&mut arena, 64).unwrap_err();
        assert_eq!(err, AllocatorError::unknown(64));
    }

    #[test]
    fn test_success_roundtrip() {
        let mut arena: ArenaAllocator<64> = create();
        let mut block = allocate(&mut arena, 32).unwrap();
        assert_eq!(block.size(), 32);
        assert!(owns(&arena, &block));

        deallocate(&mut arena, &mut block);
        assert!(block.is_empty());
    }
}
