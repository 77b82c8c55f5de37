//! The allocator contract and companion capability traits.
//!
//! The system is built around one core trait:
//! - [`Allocator`]: the three-operation policy contract
//!
//! plus two optional capabilities in the same spirit:
//! - [`MemoryUsage`]: capacity reporting for policies with a known bound
//! - [`Resettable`]: wholesale invalidation for region-style policies
//!
//! Policies compose by value: a wrapping policy owns its inner policies as
//! plain fields and delegates through this trait, so a stack of policies
//! monomorphizes into a single concrete allocator with no dispatch overhead.

use crate::block::Block;

/// The contract every allocation policy satisfies.
///
/// All three operations are non-panicking. Failure is always expressed as an
/// empty [`Block`]; no richer reason ever crosses a policy boundary, which is
/// what lets policies stack without knowing what is beneath them.
///
/// # Contract
///
/// - `allocate(s)` with `s <= 0` returns an empty block. On success the
///   returned block has `size() == s` and a non-null, suitably aligned
///   address.
/// - `deallocate(&mut b)` releases `b` if this policy produced it (per
///   [`owns`](Self::owns)) and *always* resets `b` to empty before
///   returning. An empty block is a no-op.
/// - `owns(b)` is cheap (no traversal of per-allocation state) and free of
///   side effects. It must never claim a block the policy could not free
///   safely; it may be permissive the other way (see
///   [`HeapAllocator`](crate::allocator::HeapAllocator)).
///
/// The `Default + Clone` supertraits carry the value semantics of the
/// contract: every policy is default-constructible (see
/// [`create`](crate::api::create)) and copyable, with per-policy propagation
/// documented on each implementation. Moving a policy transfers ownership of
/// its internal state and makes the source inaccessible.
///
/// # Lifetimes
///
/// A block's lifetime runs from `allocate` to the matching `deallocate` on
/// the same allocator (or one that `owns` it). Dropping a policy that still
/// owns user blocks is library UB, except that the free-list and statistics
/// policies release their *internal* bookkeeping on drop.
pub trait Allocator: Default + Clone {
    /// Requests `size` bytes. Returns an empty block on failure or when
    /// `size <= 0`.
    #[must_use = "losing the returned block leaks its memory"]
    fn allocate(&mut self, size: isize) -> Block;

    /// Releases `block` and resets it to empty.
    fn deallocate(&mut self, block: &mut Block);

    /// True iff this policy could legitimately free `block`.
    #[must_use]
    fn owns(&self, block: &Block) -> bool;
}

/// Capacity reporting for policies that can account for their memory.
pub trait MemoryUsage {
    /// Bytes currently taken from this policy's source.
    fn used_memory(&self) -> usize;

    /// Bytes still available, or `None` when the policy has no inherent
    /// limit (e.g. the heap).
    fn available_memory(&self) -> Option<usize>;

    /// Total capacity, or `None` when unbounded.
    fn total_memory(&self) -> Option<usize> {
        self.available_memory().map(|available| self.used_memory() + available)
    }

    /// Usage as a percentage of total capacity, when known.
    fn memory_usage_percent(&self) -> Option<f32> {
        self.total_memory().map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.used_memory() as f32 / total as f32) * 100.0
            }
        })
    }
}

/// Wholesale invalidation for region-style policies.
pub trait Resettable {
    /// Returns the policy to its freshly constructed state.
    ///
    /// # Safety
    /// Every block previously handed out by this policy becomes dangling.
    /// The caller must ensure none of them is used or deallocated afterwards.
    unsafe fn reset(&mut self);
}
