// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The address space: build, resolve, read, write.
//!
//! The space is built once at startup — sites, locations, and units are
//! created while the caller still holds `&mut AddressSpace` — and is then
//! shared immutably (`Arc`) for the life of the process. Creating a unit
//! eagerly creates its complete 13-leaf sensor set; there are no partial
//! units.

use coldlink_core::error::{SpaceError, SpaceResult};
use coldlink_core::tree::{SensorKind, Topology};
use coldlink_core::types::{LocationId, SiteId, TagPath, TagSample, UnitId, Value};

use crate::node::{Node, NodeKind, NodeRef};

// =============================================================================
// AddressSpace
// =============================================================================

/// The in-memory node hierarchy all components observe.
///
/// # Examples
///
/// ```
/// use coldlink_core::tree::SensorKind;
/// use coldlink_core::types::{SiteId, LocationId, UnitId, TagPath, Value};
/// use coldlink_space::AddressSpace;
///
/// # async fn demo() {
/// let mut space = AddressSpace::new();
/// let site = space.create_site(&SiteId::new("Site1"));
/// let location = space.create_location(site, &LocationId::new("Location1"));
/// space.create_unit(location, &UnitId::new("Unit1"));
///
/// let path = TagPath::new("Site1", "Location1", "Unit1", SensorKind::CompOutPres);
/// space.write_leaf(&path, Value::Numeric(12.5)).await.unwrap();
/// let sample = space.read_leaf(&path).await.unwrap();
/// assert_eq!(sample.value, Value::Numeric(12.5));
/// # }
/// ```
pub struct AddressSpace {
    nodes: Vec<Node>,
}

impl AddressSpace {
    /// Creates an empty address space with only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::object("Objects")],
        }
    }

    /// Builds a complete address space from a topology.
    pub fn from_topology(topology: &Topology) -> Self {
        let mut space = Self::new();
        for site_spec in &topology.sites {
            let site = space.create_site(&site_spec.id);
            for location_spec in &site_spec.locations {
                let location = space.create_location(site, &location_spec.id);
                for unit_spec in &location_spec.units {
                    space.create_unit(location, &unit_spec.id);
                }
            }
        }
        space
    }

    /// Returns the root node handle.
    pub fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a site under the root. Idempotent for an existing id.
    pub fn create_site(&mut self, id: &SiteId) -> NodeRef {
        let root = self.root();
        self.create_object(root, id.as_str())
    }

    /// Creates a location under a site. Idempotent for an existing id.
    pub fn create_location(&mut self, site: NodeRef, id: &LocationId) -> NodeRef {
        self.create_object(site, id.as_str())
    }

    /// Creates a unit under a location, eagerly creating all of its sensor
    /// leaves with default value `0.0`. Idempotent for an existing id.
    pub fn create_unit(&mut self, location: NodeRef, id: &UnitId) -> NodeRef {
        let unit = self.create_object(location, id.as_str());
        for kind in SensorKind::ALL {
            if self.find_child(unit, kind.as_str()).is_none() {
                let leaf = self.push_node(Node::variable(kind.as_str()));
                self.nodes[unit.0].children.push(leaf);
            }
        }
        unit
    }

    fn create_object(&mut self, parent: NodeRef, name: &str) -> NodeRef {
        if let Some(existing) = self.find_child(parent, name) {
            return existing;
        }
        let child = self.push_node(Node::object(name));
        self.nodes[parent.0].children.push(child);
        child
    }

    fn push_node(&mut self, node: Node) -> NodeRef {
        self.nodes.push(node);
        NodeRef(self.nodes.len() - 1)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Returns the browse name of a node.
    pub fn name(&self, node: NodeRef) -> &str {
        &self.nodes[node.0].name
    }

    /// Returns the class of a node.
    pub fn kind(&self, node: NodeRef) -> NodeKind {
        self.nodes[node.0].kind
    }

    /// Returns the children of a node as `(name, handle)` pairs.
    ///
    /// Order is insertion order of creation, not alphabetic.
    pub fn children(&self, node: NodeRef) -> Vec<(String, NodeRef)> {
        self.nodes[node.0]
            .children
            .iter()
            .map(|child| (self.nodes[child.0].name.clone(), *child))
            .collect()
    }

    /// Resolves a node by its path segments from the root.
    ///
    /// An empty segment list resolves to the root. Fails with `NotFound`
    /// if any segment is absent.
    pub fn resolve_by_path(&self, segments: &[&str]) -> SpaceResult<NodeRef> {
        let mut current = self.root();
        for (depth, segment) in segments.iter().enumerate() {
            current = self.find_child(current, segment).ok_or_else(|| {
                SpaceError::not_found(segments[..=depth].join("/"))
            })?;
        }
        Ok(current)
    }

    fn find_child(&self, parent: NodeRef, name: &str) -> Option<NodeRef> {
        self.nodes[parent.0]
            .children
            .iter()
            .find(|child| self.nodes[child.0].name == name)
            .copied()
    }

    // =========================================================================
    // Leaf I/O
    // =========================================================================

    /// Writes a value into a sensor leaf.
    ///
    /// The new value and timestamp are observable immediately by readers;
    /// there is no buffering and no transaction.
    pub async fn write_leaf(&self, path: &TagPath, value: Value) -> SpaceResult<()> {
        let cell = self.leaf_cell(path)?;
        cell.store(value).await;
        Ok(())
    }

    /// Reads the current sample of a sensor leaf.
    pub async fn read_leaf(&self, path: &TagPath) -> SpaceResult<TagSample> {
        let cell = self.leaf_cell(path)?;
        Ok(cell.load().await)
    }

    fn leaf_cell(&self, path: &TagPath) -> SpaceResult<&crate::node::ValueCell> {
        let segments = path.unit_segments();
        let unit = self.resolve_by_path(&segments)?;
        let leaf = self
            .find_child(unit, path.sensor.as_str())
            .ok_or_else(|| SpaceError::not_found(path))?;
        self.nodes[leaf.0]
            .cell
            .as_ref()
            .ok_or_else(|| SpaceError::not_found(path))
    }

    /// Returns the total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
