//! Node-based ordered map over an allocation authority
//!
//! # Safety
//!
//! Nodes are obtained one at a time from `A::Rebind<Node<K, V>>` and linked
//! into an unbalanced binary search tree through raw `NonNull` links.
//!
//! ## Invariants
//!
//! - Every link is either `None` or points at an initialized node obtained
//!   from `nodes` and owned by exactly one parent link (or `root`)
//! - In-order traversal yields keys in strictly ascending order
//! - `len` equals the number of live nodes
//! - A node is destroyed (`drop_in_place` or read out) before its block is
//!   released, and is never touched afterwards

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

use crate::allocator::{AllocationAuthority, PoolAllocator};
use crate::error::PoolResult;

type Link<K, V> = Option<NonNull<Node<K, V>>>;

/// Tree node; the unit of storage the map asks its authority for
pub struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// Ordered map whose nodes live in blocks handed out by an allocation authority.
///
/// The map is parameterized by an authority for its value type `(K, V)`, as
/// a container would be, and rebinds it to its internal node type.
///
/// # Example
/// ```
/// use reuse_pool::prelude::*;
///
/// let alloc = PoolAllocator::<(&str, u16)>::with_capacity(8)?;
/// let mut ports = PoolMap::new_in(alloc);
/// ports.insert("http", 80)?;
/// ports.insert("https", 443)?;
///
/// assert_eq!(ports.get("https"), Some(&443));
/// assert_eq!(ports.remove("http"), Some(80));
/// assert_eq!(ports.len(), 1);
/// # Ok::<(), PoolError>(())
/// ```
pub struct PoolMap<K, V, A = PoolAllocator<(K, V)>>
where
    A: AllocationAuthority<Value = (K, V)>,
{
    root: Link<K, V>,
    len: usize,
    alloc: A,
    nodes: A::Rebind<Node<K, V>>,
    _marker: PhantomData<Box<Node<K, V>>>,
}

impl<K, V, A> PoolMap<K, V, A>
where
    A: AllocationAuthority<Value = (K, V)>,
{
    /// Empty map drawing its nodes from `alloc`
    pub fn new_in(alloc: A) -> Self {
        let nodes = alloc.rebind::<Node<K, V>>();
        Self {
            root: None,
            len: 0,
            alloc,
            nodes,
            _marker: PhantomData,
        }
    }

    /// Authority the map was built with
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry, releasing all nodes
    pub fn clear(&mut self) {
        let mut stack: Vec<NonNull<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            // SAFETY: node is live and owned by the tree; its children are
            // collected before it is destroyed and nothing else links to it.
            unsafe {
                let n = node.as_ptr();
                stack.extend((*n).left);
                stack.extend((*n).right);
                self.nodes.dispose(node);
            }
        }
        self.len = 0;
    }

    /// In-order iterator over entries
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
            _marker: PhantomData,
        };
        iter.push_left(self.root);
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: Ord, V, A> PoolMap<K, V, A>
where
    A: AllocationAuthority<Value = (K, V)>,
{
    /// Insert `value` under `key`, returning the value it replaced.
    ///
    /// Replacing an existing key never allocates.
    ///
    /// # Errors
    /// `PoolExhausted` when a new node is needed and the authority has none left.
    pub fn insert(&mut self, key: K, value: V) -> PoolResult<Option<V>> {
        let mut link: *mut Link<K, V> = &raw mut self.root;

        // SAFETY: link always points at `root` or at a child field of a live
        // node owned by this map; &mut self excludes other access.
        unsafe {
            while let Some(node) = *link {
                let n = node.as_ptr();
                match key.cmp(&(*n).key) {
                    Ordering::Less => link = &raw mut (*n).left,
                    Ordering::Greater => link = &raw mut (*n).right,
                    Ordering::Equal => return Ok(Some(mem::replace(&mut (*n).value, value))),
                }
            }

            let node = self.nodes.emplace(Node {
                key,
                value,
                left: None,
                right: None,
            })?;
            *link = Some(node);
        }

        self.len += 1;
        Ok(None)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // SAFETY: the found node is live for as long as &self.
        self.find(key).map(|node| unsafe { &(*node.as_ptr()).value })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // SAFETY: the found node is live and &mut self guarantees exclusivity.
        self.find(key).map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Remove `key`, returning its value; the node's block goes back to the pool
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link: *mut Link<K, V> = &raw mut self.root;

        // SAFETY: as in `insert`; the unlinked node is read out exactly once
        // and its block released afterwards.
        unsafe {
            let target = loop {
                let node = (*link)?;
                let n = node.as_ptr();
                match key.cmp((*n).key.borrow()) {
                    Ordering::Less => link = &raw mut (*n).left,
                    Ordering::Greater => link = &raw mut (*n).right,
                    Ordering::Equal => break node,
                }
            };

            let t = target.as_ptr();
            *link = match ((*t).left, (*t).right) {
                (None, child) | (child, None) => child,
                (Some(_), Some(right)) => {
                    // Splice in the in-order successor
                    let mut parent_link: *mut Link<K, V> = &raw mut (*t).right;
                    let mut succ = right;
                    while let Some(left) = (*succ.as_ptr()).left {
                        parent_link = &raw mut (*succ.as_ptr()).left;
                        succ = left;
                    }
                    *parent_link = (*succ.as_ptr()).right;
                    (*succ.as_ptr()).left = (*t).left;
                    (*succ.as_ptr()).right = (*t).right;
                    Some(succ)
                }
            };

            let Node { value, .. } = ptr::read(t);
            self.nodes.release(target, 1);
            self.len -= 1;
            Some(value)
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<NonNull<Node<K, V>>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(node) = cursor {
            // SAFETY: node is live while &self is held.
            let n = unsafe { node.as_ref() };
            cursor = match key.cmp(n.key.borrow()) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }
}

impl<K, V, A> Drop for PoolMap<K, V, A>
where
    A: AllocationAuthority<Value = (K, V)>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, A> fmt::Debug for PoolMap<K, V, A>
where
    A: AllocationAuthority<Value = (K, V)>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, A> IntoIterator for &'a PoolMap<K, V, A>
where
    A: AllocationAuthority<Value = (K, V)>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a [`PoolMap`]
pub struct Iter<'a, K, V> {
    stack: Vec<NonNull<Node<K, V>>>,
    remaining: usize,
    _marker: PhantomData<&'a Node<K, V>>,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left(&mut self, mut cursor: Link<K, V>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            // SAFETY: node is live for the iterator's lifetime.
            cursor = unsafe { node.as_ref().left };
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // SAFETY: node is live and the map is borrowed for 'a.
        let n: &'a Node<K, V> = unsafe { &*node.as_ptr() };
        self.push_left(n.right);
        self.remaining -= 1;
        Some((&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
