//! Allocation policies and the contract that composes them.
//!
//! Leaf policies obtain memory from a source ([`HeapAllocator`],
//! [`ArenaAllocator`]); composing policies wrap one or two inner policies
//! and change behavior ([`FallbackAllocator`], [`FreeListAllocator`],
//! [`StatsAllocator`], [`SharedAllocator`]). All of them satisfy the same
//! [`Allocator`] contract, so any policy can be layered over any other.

mod arena;
mod fallback;
mod free_list;
mod heap;
mod shared;
mod stats;
mod traits;

pub use arena::ArenaAllocator;
pub use fallback::FallbackAllocator;
pub use free_list::FreeListAllocator;
pub use heap::HeapAllocator;
pub use shared::SharedAllocator;
pub use stats::{AllocRecord, Records, StatsAllocator};
pub use traits::{Allocator, MemoryUsage, Resettable};
