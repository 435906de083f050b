//! Iteration mutation guard.
//!
//! Every heap container carries a [`Version`] that its structural mutators
//! bump by one. A [`Cursor`] captures the version when it is created and
//! re-reads the live version on every step, failing with
//! [`VarError::ConcurrentModification`] before it exposes any data if the two
//! differ. The cursor also records the identity of the container it was
//! made from, so stepping it against any other container fails too.
//!
//! The cursor holds no borrow of the container between steps, so the owner
//! can keep mutating it while a traversal is in flight; the guard is what
//! catches that. Read-only traversal that never mutates (including nested
//! cursors over the same container) never trips it.
//!
//! The guard is a single-threaded detection mechanism: a plain counter and a
//! captured snapshot, with no locking. Only identity allocation is shared
//! across threads.
//!
//! ```
//! use dynvar_core::{guard::Cursor, List, Value};
//!
//! let mut list = List::from(vec![Value::from(1), Value::from(2)]);
//! let mut cursor = Cursor::new(&list);
//! assert_eq!(cursor.next(&list).unwrap(), Some(&Value::from(1)));
//!
//! list.push(Value::from(3));
//! assert!(cursor.next(&list).is_err());
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::error::{Result, VarError};
use crate::heap::Node;
use crate::value::Value;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Per-container mutation epoch, stamped with an identity unique to the
/// container. The epoch starts at zero.
///
/// Cloning a container yields a new container, so cloning a `Version` draws
/// a fresh identity. Moving keeps it.
#[derive(Debug)]
pub struct Version {
    identity: u64,
    epoch: u64,
}

impl Version {
    pub fn new() -> Self {
        Version {
            identity: NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
        }
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub const fn identity(&self) -> u64 {
        self.identity
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Version {
    fn clone(&self) -> Self {
        Version {
            epoch: self.epoch,
            ..Version::new()
        }
    }
}

/// A container whose traversal can be guarded by a [`Cursor`].
///
/// `item_at` receives an opaque position (an element index for most
/// containers, a byte offset for text) and returns the item there together
/// with the position of the following item.
pub trait Guarded {
    type Item<'a>
    where
        Self: 'a;

    fn version(&self) -> u64;

    /// Identity stamp of the container; differs between any two live
    /// containers, including a container and its clone.
    fn identity(&self) -> u64;

    fn item_at(&self, position: usize) -> Option<(Self::Item<'_>, usize)>;
}

/// Iterator snapshot: a position paired with the identity and version
/// observed at construction. Does not own or borrow the container.
pub struct Cursor<C: ?Sized> {
    position: usize,
    owner: u64,
    expected: u64,
    _container: PhantomData<fn(&C)>,
}

impl<C: Guarded + ?Sized> Cursor<C> {
    pub fn new(container: &C) -> Self {
        Cursor {
            position: 0,
            owner: container.identity(),
            expected: container.version(),
            _container: PhantomData,
        }
    }

    /// Compare the live identity and version against the snapshot.
    pub fn check(&self, container: &C) -> Result<()> {
        if container.identity() != self.owner {
            trace!(owner = self.owner, found = container.identity(), "foreign container");
            return Err(VarError::ForeignContainer);
        }
        let found = container.version();
        if found != self.expected {
            trace!(expected = self.expected, found, "concurrent modification detected");
            return Err(VarError::ConcurrentModification {
                expected: self.expected,
                found,
            });
        }
        Ok(())
    }

    /// The item under the cursor, without advancing.
    pub fn current<'a>(&self, container: &'a C) -> Result<Option<C::Item<'a>>> {
        self.check(container)?;
        Ok(container.item_at(self.position).map(|(item, _)| item))
    }

    /// Yield the item under the cursor and move past it.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'a>(&mut self, container: &'a C) -> Result<Option<C::Item<'a>>> {
        self.check(container)?;
        match container.item_at(self.position) {
            Some((item, following)) => {
                self.position = following;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn expected_version(&self) -> u64 {
        self.expected
    }
}

impl<C: ?Sized> Clone for Cursor<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Cursor<C> {}

impl<C: ?Sized> fmt::Debug for Cursor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("owner", &self.owner)
            .field("expected", &self.expected)
            .finish()
    }
}

/// One step of a traversal over a dynamically-typed container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'a> {
    /// A character of a text value.
    Char(char),
    /// An element of a list or set.
    Element(&'a Value),
    /// A key-value entry of a map.
    Entry(&'a Value, &'a Value),
    /// A graph node with its outgoing edges.
    Node(Node<'a>),
}

impl Guarded for Value {
    type Item<'a> = Item<'a>;

    fn version(&self) -> u64 {
        match self {
            Value::Str(t) => t.version(),
            Value::List(l) => l.version(),
            Value::Set(s) => s.version(),
            Value::Dict(d) => d.version(),
            Value::OrderedSet(s) => s.version(),
            Value::OrderedDict(d) => d.version(),
            Value::Graph(g) => g.version(),
            _ => 0,
        }
    }

    fn identity(&self) -> u64 {
        match self {
            Value::Str(t) => t.identity(),
            Value::List(l) => l.identity(),
            Value::Set(s) => s.identity(),
            Value::Dict(d) => d.identity(),
            Value::OrderedSet(s) => s.identity(),
            Value::OrderedDict(d) => d.identity(),
            Value::Graph(g) => g.identity(),
            _ => 0,
        }
    }

    fn item_at(&self, position: usize) -> Option<(Item<'_>, usize)> {
        match self {
            Value::Str(t) => t.item_at(position).map(|(c, n)| (Item::Char(c), n)),
            Value::List(l) => l.item_at(position).map(|(v, n)| (Item::Element(v), n)),
            Value::Set(s) => s.item_at(position).map(|(v, n)| (Item::Element(v), n)),
            Value::OrderedSet(s) => s.item_at(position).map(|(v, n)| (Item::Element(v), n)),
            Value::Dict(d) => d.item_at(position).map(|((k, v), n)| (Item::Entry(k, v), n)),
            Value::OrderedDict(d) => d
                .item_at(position)
                .map(|((k, v), n)| (Item::Entry(k, v), n)),
            Value::Graph(g) => g.item_at(position).map(|(node, n)| (Item::Node(node), n)),
            _ => None,
        }
    }
}
