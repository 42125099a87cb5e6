// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node arena for the address space.
//!
//! Nodes live in a flat arena and reference each other by index, so handles
//! are `Copy` and the graph needs no reference counting. Children keep
//! insertion order; discovery relies on that, not on alphabetic order.

use std::fmt;

use tokio::sync::RwLock;

use coldlink_core::types::{TagQuality, TagSample, Value};

// =============================================================================
// NodeRef
// =============================================================================

/// A handle to a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) usize);

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

// =============================================================================
// NodeKind
// =============================================================================

/// The class of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A structural node (root, site, location, unit).
    Object,

    /// A sensor leaf carrying a value.
    Variable,
}

// =============================================================================
// Node
// =============================================================================

/// A node in the arena.
pub(crate) struct Node {
    /// Browse name, unique among its siblings.
    pub(crate) name: String,

    /// Node class.
    pub(crate) kind: NodeKind,

    /// Children in insertion order.
    pub(crate) children: Vec<NodeRef>,

    /// Value cell; present only on `Variable` nodes.
    pub(crate) cell: Option<ValueCell>,
}

impl Node {
    pub(crate) fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Object,
            children: Vec::new(),
            cell: None,
        }
    }

    pub(crate) fn variable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Variable,
            children: Vec::new(),
            cell: Some(ValueCell::new()),
        }
    }
}

// =============================================================================
// ValueCell
// =============================================================================

/// The mutable value slot of a variable node.
///
/// Each cell has its own lock, which is exactly the per-leaf atomicity the
/// contract requires: a reader never observes a half-written sample, and
/// writers to different leaves never contend.
pub(crate) struct ValueCell {
    sample: RwLock<TagSample>,
}

impl ValueCell {
    fn new() -> Self {
        Self {
            sample: RwLock::new(TagSample::initial()),
        }
    }

    /// Replaces the sample with a freshly timestamped value.
    pub(crate) async fn store(&self, value: Value) {
        let mut guard = self.sample.write().await;
        *guard = TagSample::now(value, TagQuality::Good);
    }

    /// Returns a copy of the current sample.
    pub(crate) async fn load(&self) -> TagSample {
        self.sample.read().await.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_constructors() {
        let object = Node::object("Site1");
        assert_eq!(object.kind, NodeKind::Object);
        assert!(object.cell.is_none());

        let variable = Node::variable("tempC1");
        assert_eq!(variable.kind, NodeKind::Variable);
        assert!(variable.cell.is_some());
    }

    #[tokio::test]
    async fn test_cell_starts_at_zero() {
        let cell = ValueCell::new();
        let sample = cell.load().await;
        assert_eq!(sample.value, Value::Numeric(0.0));
        assert!(sample.quality.is_good());
    }

    #[tokio::test]
    async fn test_cell_store_updates_timestamp() {
        let cell = ValueCell::new();
        let before = cell.load().await;

        cell.store(Value::Numeric(7.5)).await;

        let after = cell.load().await;
        assert_eq!(after.value, Value::Numeric(7.5));
        assert!(after.timestamp >= before.timestamp);
    }
}
