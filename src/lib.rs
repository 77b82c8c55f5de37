//! # memkit
//!
//! Composable memory-allocation policies that stack into purpose-built
//! allocators.
//!
//! Every policy honors the same three-operation contract — `allocate`,
//! `deallocate`, `owns` — so a policy can be layered over another without
//! knowing what it is. An application assembles an allocator matching its
//! workload out of small pieces: a stack arena backed by a heap fallback,
//! fronted by a size-class free list, wrapped in an instrumentation layer.
//!
//! ## Quick start
//!
//! ```rust
//! use memkit::prelude::*;
//!
//! // A 128-byte arena with the heap behind it.
//! let mut alloc: FallbackAllocator<ArenaAllocator<128>, HeapAllocator> = create();
//!
//! let mut block = allocate(&mut alloc, 32)?;
//! assert!(owns(&alloc, &block));
//!
//! deallocate(&mut alloc, &mut block);
//! assert!(block.is_empty());
//! # Ok::<(), memkit::AllocatorError>(())
//! ```
//!
//! ## Policies
//!
//! - [`HeapAllocator`](allocator::HeapAllocator): the system heap; the
//!   permissive terminal of any fallback chain
//! - [`ArenaAllocator`](allocator::ArenaAllocator): compile-time-sized
//!   bump arena embedded in the allocator value
//! - [`FallbackAllocator`](allocator::FallbackAllocator): two-policy
//!   try/else
//! - [`FreeListAllocator`](allocator::FreeListAllocator): size-class
//!   recycling cache over an inner policy
//! - [`StatsAllocator`](allocator::StatsAllocator): observation wrapper
//!   recording every allocation and deallocation
//! - [`SharedAllocator`](allocator::SharedAllocator): process-wide instance
//!   keyed by a compile-time tag
//!
//! The [`adapter`] module dresses any policy in the shape generic container
//! code expects; the [`api`] module is the structured-result front door.
//!
//! ## Features
//!
//! - `logging`: emit `tracing` events from pool initialization and cache
//!   teardown

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod allocator;
pub mod api;
pub mod block;
pub mod error;
pub mod utils;

pub use crate::block::Block;
pub use crate::error::{AllocResult, AllocatorError};

pub mod prelude {
    //! Convenient re-exports of commonly used types and functions.

    pub use crate::adapter::ContainerAdapter;
    pub use crate::allocator::{
        AllocRecord, Allocator, ArenaAllocator, FallbackAllocator, FreeListAllocator,
        HeapAllocator, MemoryUsage, Resettable, SharedAllocator, StatsAllocator,
    };
    pub use crate::api::{allocate, create, deallocate, owns};
    pub use crate::block::Block;
    pub use crate::error::{AllocResult, AllocatorError};
}
