//! Container adapter: presents any policy under the wire shape generic
//! collection code expects.
//!
//! The adapter speaks element counts instead of byte sizes and pointers
//! instead of blocks. It is the single place in the toolkit where failure is
//! surfaced as an exceptional condition
//! ([`handle_alloc_error`](std::alloc::handle_alloc_error)), because the
//! container contract demands it; [`try_allocate`](ContainerAdapter::try_allocate)
//! is the non-aborting variant.

use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;
use std::alloc::{handle_alloc_error, Layout};

use crate::allocator::Allocator;
use crate::block::Block;
use crate::error::{AllocResult, AllocatorError};

/// Adapter dressing policy `I` as an element-typed allocator for `T`.
///
/// # Copy semantics
/// `clone` copies the inner policy with its own propagation rules.
pub struct ContainerAdapter<T, I: Allocator> {
    inner: I,
    _element: PhantomData<T>,
}

impl<T, I: Allocator> ContainerAdapter<T, I> {
    /// Creates the adapter over a default-constructed policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_inner(I::default())
    }

    /// Creates the adapter over an existing policy instance.
    #[must_use]
    pub fn with_inner(inner: I) -> Self {
        Self { inner, _element: PhantomData }
    }

    /// Read access to the inner policy.
    pub fn inner(&self) -> &I {
        &self.inner
    }

    /// Re-targets the adapter at element type `U`, preserving the inner
    /// policy and everything it has allocated.
    #[must_use]
    pub fn rebind<U>(self) -> ContainerAdapter<U, I> {
        ContainerAdapter { inner: self.inner, _element: PhantomData }
    }

    /// Allocates room for `n` elements of `T`.
    ///
    /// Calls [`handle_alloc_error`] when the policy cannot serve the
    /// request; a zero-byte request returns a dangling pointer.
    #[must_use]
    pub fn allocate(&mut self, n: usize) -> NonNull<T> {
        match self.try_allocate(n) {
            Ok(ptr) => ptr,
            Err(_) => handle_alloc_error(Self::layout_for(n)),
        }
    }

    /// Allocates room for `n` elements of `T`, reporting failure as a value.
    ///
    /// # Errors
    /// - [`AllocatorError::InvalidSize`] when the byte count does not fit a
    ///   signed size
    /// - [`AllocatorError::Unknown`] when the policy returned an empty block
    pub fn try_allocate(&mut self, n: usize) -> AllocResult<NonNull<T>> {
        let bytes = match Self::byte_size(n) {
            Some(bytes) => bytes,
            None => return Err(AllocatorError::invalid_size(isize::MAX)),
        };
        if bytes == 0 {
            return Ok(NonNull::dangling());
        }

        let block = self.inner.allocate(bytes);
        NonNull::new(block.as_ptr().cast()).ok_or_else(|| AllocatorError::unknown(bytes))
    }

    /// Releases `n` elements previously obtained from this adapter.
    pub fn deallocate(&mut self, ptr: NonNull<T>, n: usize) {
        let bytes = match Self::byte_size(n) {
            Some(bytes) if bytes > 0 => bytes,
            _ => return,
        };
        let mut block = Block::new(bytes, ptr.as_ptr().cast());
        self.inner.deallocate(&mut block);
    }

    #[inline]
    fn byte_size(n: usize) -> Option<isize> {
        n.checked_mul(mem::size_of::<T>()).and_then(|bytes| isize::try_from(bytes).ok())
    }

    fn layout_for(n: usize) -> Layout {
        Layout::array::<T>(n).unwrap_or_else(|_| Layout::new::<T>())
    }
}

impl<T, I: Allocator> Default for ContainerAdapter<T, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I: Allocator> Clone for ContainerAdapter<T, I> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), _element: PhantomData }
    }
}
