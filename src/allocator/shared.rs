//! Shared policy: a process-wide inner policy selected by a compile-time tag.
//!
//! All instances of one `SharedAllocator<I, ID>` forward to a single
//! lazily-initialized `I` living in a global registry keyed by
//! `(policy type, tag)`. Distinct tags give distinct pools of the same inner
//! type.
//!
//! No cross-call synchronization is provided: the per-pool mutex only makes
//! each forwarded call atomic, which is the minimum a process-wide value
//! needs. Callers coordinating multi-step protocols across threads must
//! bring their own mutual exclusion, as with any other policy instance.

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::OnceLock;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::traits::Allocator;
use crate::block::Block;

type Registry = DashMap<(TypeId, i64), &'static (dyn Any + Send + Sync)>;

static POOLS: OnceLock<Registry> = OnceLock::new();

/// Resolves (and on first use creates) the singleton for `(I, id)`.
///
/// Entries are leaked into the registry: the pools live for the remainder of
/// the process and are reclaimed by the OS at exit.
fn pool_for<I>(id: i64) -> &'static Mutex<I>
where
    I: Allocator + Send + 'static,
{
    let pools = POOLS.get_or_init(DashMap::new);
    let entry = *pools.entry((TypeId::of::<I>(), id)).or_insert_with(|| {
        #[cfg(feature = "logging")]
        tracing::debug!(
            pool = core::any::type_name::<I>(),
            id,
            "initializing shared allocator pool"
        );

        let leaked: &'static Mutex<I> = Box::leak(Box::new(Mutex::new(I::default())));
        leaked as &'static (dyn Any + Send + Sync)
    });
    entry
        .downcast_ref::<Mutex<I>>()
        .expect("shared pool registry entry matches its key type")
}

/// Handle to the process-wide instance of policy `I` tagged `ID`.
///
/// The handle itself is stateless; every operation forwards to the shared
/// instance, so a block allocated through one handle can be deallocated
/// through any other handle with the same parameters.
pub struct SharedAllocator<I, const ID: i64> {
    _policy: PhantomData<fn() -> I>,
}

impl<I, const ID: i64> SharedAllocator<I, ID> {
    /// Creates a handle. Zero-cost; the pool is initialized on first use.
    #[must_use]
    pub const fn new() -> Self {
        Self { _policy: PhantomData }
    }
}

impl<I, const ID: i64> Default for SharedAllocator<I, ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, const ID: i64> Clone for SharedAllocator<I, ID> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, const ID: i64> Copy for SharedAllocator<I, ID> {}

impl<I, const ID: i64> core::fmt::Debug for SharedAllocator<I, ID> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedAllocator")
            .field("policy", &core::any::type_name::<I>())
            .field("id", &ID)
            .finish()
    }
}

impl<I, const ID: i64> Allocator for SharedAllocator<I, ID>
where
    I: Allocator + Send + 'static,
{
    fn allocate(&mut self, size: isize) -> Block {
        pool_for::<I>(ID).lock().allocate(size)
    }

    fn deallocate(&mut self, block: &mut Block) {
        pool_for::<I>(ID).lock().deallocate(block);
    }

    fn owns(&self, block: &Block) -> bool {
        pool_for::<I>(ID).lock().owns(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{ArenaAllocator, HeapAllocator};

    #[test]
    fn test_instances_share_one_pool() {
        let mut first = SharedAllocator::<HeapAllocator, 7>::new();
        let mut second = SharedAllocator::<HeapAllocator, 7>::new();

        let mut block = first.allocate(32);
        assert!(!block.is_empty());
        assert!(second.owns(&block));

        second.deallocate(&mut block);
        assert!(block.is_empty());
    }

    #[test]
    fn test_distinct_tags_distinct_pools() {
        let mut a = SharedAllocator::<ArenaAllocator<64>, 1>::new();
        let mut b = SharedAllocator::<ArenaAllocator<64>, 2>::new();

        let block_a = a.allocate(16);
        let block_b = b.allocate(16);
        assert!(!block_a.is_empty());
        assert!(!block_b.is_empty());
        // Separate arenas: neither pool claims the other's block.
        assert!(!a.owns(&block_b));
        assert!(!b.owns(&block_a));
    }

    #[test]
    fn test_pool_state_persists_across_handles() {
        let mut writer = SharedAllocator::<ArenaAllocator<64>, 3>::new();
        let block = writer.allocate(32);
        assert!(!block.is_empty());

        let reader = SharedAllocator::<ArenaAllocator<64>, 3>::new();
        assert!(reader.owns(&block));
    }
}
