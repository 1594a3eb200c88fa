//! Rebuilds one-to-many graphs from joined rows
//!
//! A join returns one row per (parent, child) pair, repeating the parent columns on every row.
//! [`RowFlattener`] folds such a cursor back into distinct parents, each holding its children,
//! in a single pass.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use catalog_common::database::Error;
use catalog_common::{Department, Employee, EntityId};

/// An entity that owns an ordered collection of children
pub trait Parent {
    /// Parent key
    type Key: Eq + Hash + Clone + Debug;
    /// Child entity
    type Child;
    /// Child key, used to drop repeated children
    type ChildKey: Eq + Hash + Debug;

    /// The key of a child
    fn child_key(child: &Self::Child) -> Self::ChildKey;

    /// Appends a child
    fn push_child(&mut self, child: Self::Child);
}

impl Parent for Department {
    type Key = EntityId;
    type Child = Employee;
    type ChildKey = EntityId;

    fn child_key(child: &Employee) -> EntityId {
        child.id
    }

    fn push_child(&mut self, child: Employee) {
        self.employees.push(child);
    }
}

/// Ordered key → parent accumulator
#[derive(Debug)]
pub struct RowFlattener<P>
where
    P: Parent,
{
    parents: Vec<P>,
    index: HashMap<P::Key, usize>,
    children: HashSet<(usize, P::ChildKey)>,
}

impl<P> Default for RowFlattener<P>
where
    P: Parent,
{
    fn default() -> Self {
        Self {
            parents: Vec::new(),
            index: HashMap::new(),
            children: HashSet::new(),
        }
    }
}

impl<P> RowFlattener<P>
where
    P: Parent,
{
    /// Empty flattener
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one row in.
    ///
    /// `parent` is only called the first time `key` shows up. A `None` child (the NULL side of a
    /// LEFT JOIN) registers the parent without appending anything, and a child already attached
    /// to the parent is skipped.
    pub fn push<F>(&mut self, key: P::Key, parent: F, child: Option<P::Child>) -> Result<(), Error>
    where
        F: FnOnce() -> Result<P, Error>,
    {
        let position = match self.index.get(&key) {
            Some(position) => *position,
            None => {
                self.parents.push(parent()?);
                let position = self.parents.len() - 1;
                self.index.insert(key, position);
                position
            }
        };

        if let Some(child) = child {
            if self.children.insert((position, P::child_key(&child))) {
                self.parents[position].push_child(child);
            }
        }

        Ok(())
    }

    /// Distinct parents in first-seen order
    pub fn finish(self) -> Vec<P> {
        self.parents
    }

    /// The first parent, for single key lookups
    pub fn single(self) -> Option<P> {
        self.parents.into_iter().next()
    }
}
