//! Smart pointer for pool-allocated objects

use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

use crate::allocator::{AllocationAuthority, PoolAllocator};
use crate::error::PoolResult;

/// RAII smart pointer for pool-allocated values
///
/// Similar to `Box` but backed by an allocation authority: dropping it
/// destroys the value in place and then releases the block. The box keeps a
/// handle to its authority, so the pool cannot go away underneath it.
///
/// # Example
/// ```
/// use reuse_pool::prelude::*;
///
/// let pool = PoolAllocator::<Vec<u8>>::with_capacity(1)?;
/// {
///     let mut bytes = PoolBox::new_in(vec![1, 2], &pool)?;
///     bytes.push(3);
///     assert_eq!(*bytes, [1, 2, 3]);
///     assert!(PoolBox::new_in(Vec::new(), &pool).is_err());
/// }
/// // dropped box returned its block
/// assert!(PoolBox::new_in(Vec::new(), &pool).is_ok());
/// # Ok::<(), PoolError>(())
/// ```
pub struct PoolBox<T, A: AllocationAuthority<Value = T> = PoolAllocator<T>> {
    ptr: NonNull<T>,
    allocator: A,
}

impl<T, A: AllocationAuthority<Value = T>> PoolBox<T, A> {
    /// Creates a new `PoolBox` by allocating from the given authority
    #[must_use = "allocated value must be used"]
    pub fn new_in(value: T, allocator: &A) -> PoolResult<Self> {
        let ptr = allocator.emplace(value)?;
        Ok(Self {
            ptr,
            allocator: allocator.clone(),
        })
    }

    /// Consumes the `PoolBox` and returns the contained value, releasing the block
    #[must_use]
    pub fn into_inner(self) -> T {
        let this = ManuallyDrop::new(self);
        // SAFETY: this.ptr holds an initialized T owned by the box; the box is
        // never dropped (ManuallyDrop), so the value is read exactly once.
        let value = unsafe { ptr::read(this.ptr.as_ptr()) };
        // SAFETY: the allocator handle is moved out exactly once and the box
        // itself is never used again.
        let allocator = unsafe { ptr::read(&this.allocator) };
        // SAFETY: the value was moved out above; the block is outstanding and
        // came from this allocator.
        unsafe { allocator.release(this.ptr, 1) };
        value
    }

    /// Raw address of the contained value
    #[must_use]
    pub fn as_ptr(&self) -> NonNull<T> {
        self.ptr
    }

    /// Authority that owns the block
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<T, A: AllocationAuthority<Value = T>> Deref for PoolBox<T, A> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: ptr holds an initialized T owned by this box; the borrow is
        // tied to &self.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, A: AllocationAuthority<Value = T>> DerefMut for PoolBox<T, A> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: as in `deref`, and &mut self guarantees exclusivity.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T, A: AllocationAuthority<Value = T>> Drop for PoolBox<T, A> {
    fn drop(&mut self) {
        // SAFETY: ptr holds an initialized T obtained from self.allocator and
        // not released yet; nothing touches it after this call.
        unsafe { self.allocator.dispose(self.ptr) };
    }
}

impl<T: fmt::Debug, A: AllocationAuthority<Value = T>> fmt::Debug for PoolBox<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: fmt::Display, A: AllocationAuthority<Value = T>> fmt::Display for PoolBox<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_drop_destroys_then_releases() {
        let drops = Rc::new(Cell::new(0));
        let pool = PoolAllocator::<DropCounter>::with_capacity(1).unwrap();

        let boxed = PoolBox::new_in(DropCounter(Rc::clone(&drops)), &pool).unwrap();
        let addr = boxed.as_ptr();
        assert_eq!(pool.outstanding(), 1);
        drop(boxed);

        assert_eq!(drops.get(), 1);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.obtain(1).unwrap(), addr);
    }

    #[test]
    fn test_into_inner_does_not_drop() {
        let drops = Rc::new(Cell::new(0));
        let pool = PoolAllocator::<DropCounter>::with_capacity(1).unwrap();

        let boxed = PoolBox::new_in(DropCounter(Rc::clone(&drops)), &pool).unwrap();
        let value = boxed.into_inner();
        assert_eq!(drops.get(), 0);
        assert_eq!(pool.free_blocks(), 1);

        drop(value);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_box_outlives_handle() {
        let boxed = {
            let pool = PoolAllocator::<String>::with_capacity(1).unwrap();
            PoolBox::new_in(String::from("kept alive"), &pool).unwrap()
        };
        assert_eq!(boxed.as_str(), "kept alive");
        assert_eq!(boxed.allocator().outstanding(), 1);
    }
}
