//! Ordered set built on [`PoolMap`]

use core::borrow::Borrow;
use core::fmt;

use crate::allocator::{AllocationAuthority, PoolAllocator};
use crate::error::PoolResult;
use crate::map::PoolMap;

/// Ordered set whose nodes come from an allocation authority
pub struct PoolSet<T, A = PoolAllocator<(T, ())>>
where
    A: AllocationAuthority<Value = (T, ())>,
{
    map: PoolMap<T, (), A>,
}

impl<T, A> PoolSet<T, A>
where
    A: AllocationAuthority<Value = (T, ())>,
{
    pub fn new_in(alloc: A) -> Self {
        Self {
            map: PoolMap::new_in(alloc),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Elements in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.map.keys()
    }
}

impl<T: Ord, A> PoolSet<T, A>
where
    A: AllocationAuthority<Value = (T, ())>,
{
    /// Add `value`; `Ok(false)` when it was already present.
    ///
    /// # Errors
    /// `PoolExhausted` when the authority has no node left for a new element.
    pub fn insert(&mut self, value: T) -> PoolResult<bool> {
        if self.map.contains_key(&value) {
            return Ok(false);
        }
        self.map.insert(value, ())?;
        Ok(true)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(value)
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(value).is_some()
    }
}

impl<T: fmt::Debug, A> fmt::Debug for PoolSet<T, A>
where
    A: AllocationAuthority<Value = (T, ())>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
