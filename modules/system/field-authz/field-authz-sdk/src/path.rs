//! Canonical dotted path of a field position.
//!
//! A position in the response tree is a backward-linked chain of nodes, each
//! holding either a field name or a list index. The canonical path joins the
//! field names root-to-leaf with `.` and drops the indices, so every element
//! of a list maps to the same policy resource:
//!
//! ```text
//! project -> members -> [0] -> tickets -> [2] -> message
//!     => "project.members.tickets.message"
//! ```

use std::iter;

/// One key of a position chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKey<'a> {
    /// A named field.
    Field(&'a str),
    /// An element of a list.
    Index(usize),
}

/// A node of an immutable position chain.
///
/// The chain is owned by the execution engine and only borrowed here. Nodes
/// are built leaf-wards from a root:
///
/// ```
/// use field_authz_sdk::{PathNode, resolve_path};
///
/// let project = PathNode::root("project");
/// let members = project.field("members");
/// let first = members.index(0);
/// let name = first.field("name");
///
/// assert_eq!(resolve_path(&name), "project.members.name");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathNode<'a> {
    parent: Option<&'a PathNode<'a>>,
    key: PathKey<'a>,
}

impl<'a> PathNode<'a> {
    /// Top-level field of an operation.
    #[must_use]
    pub const fn root(name: &'a str) -> Self {
        Self {
            parent: None,
            key: PathKey::Field(name),
        }
    }

    /// Child node for a field selected on this node.
    #[must_use]
    pub const fn field(&'a self, name: &'a str) -> Self {
        Self {
            parent: Some(self),
            key: PathKey::Field(name),
        }
    }

    /// Child node for a list element of this node.
    #[must_use]
    pub const fn index(&'a self, index: usize) -> Self {
        Self {
            parent: Some(self),
            key: PathKey::Index(index),
        }
    }

    #[must_use]
    pub const fn key(&self) -> PathKey<'a> {
        self.key
    }

    #[must_use]
    pub const fn parent(&self) -> Option<&'a PathNode<'a>> {
        self.parent
    }

    /// Keys from this node back to the root (leaf first).
    pub fn keys(&self) -> impl Iterator<Item = PathKey<'a>> + '_ {
        iter::successors(Some(self), |node| node.parent).map(|node| node.key)
    }

    /// Full root-to-leaf response path, list indices included.
    ///
    /// This is the path an engine reports alongside a field error; unlike the
    /// canonical path it distinguishes list elements.
    #[must_use]
    pub fn response_path(&self) -> Vec<PathKey<'a>> {
        let mut keys: Vec<_> = self.keys().collect();
        keys.reverse();
        keys
    }
}

/// Canonical dotted path of `position`.
#[must_use]
pub fn resolve_path(position: &PathNode<'_>) -> String {
    resolve_path_from_leaf(position.keys())
}

/// Canonical dotted path from keys given leaf first.
///
/// Lets engines with their own chain type reuse the same derivation without
/// copying the chain. The leaf is expected to be a field name; an index leaf
/// is rendered as its number.
#[must_use]
pub fn resolve_path_from_leaf<'k, I>(keys: I) -> String
where
    I: IntoIterator<Item = PathKey<'k>>,
{
    let mut keys = keys.into_iter();
    let mut path = match keys.next() {
        Some(PathKey::Field(name)) => name.to_owned(),
        Some(PathKey::Index(index)) => index.to_string(),
        None => return String::new(),
    };

    for key in keys {
        if let PathKey::Field(name) = key {
            path.insert(0, '.');
            path.insert_str(0, name);
        }
    }

    path
}
