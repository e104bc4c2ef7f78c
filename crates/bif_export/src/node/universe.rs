//! In-memory node graph.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ExportError, ExportResult};

use super::{AttrValue, AttributeSource, Node, NodeEntry, NodeId, NodeLookup};

/// A set of renderer nodes addressed by [`NodeId`] and unique name.
///
/// Ids are never reused, so a pointer to a removed node simply stops
/// resolving.
#[derive(Debug, Default)]
pub struct Universe {
    nodes: Vec<Option<Node>>,
    by_name: HashMap<String, NodeId>,
    entries: HashMap<String, Arc<NodeEntry>>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node of the given entry. Names must be unique.
    pub fn add(&mut self, name: &str, entry: Arc<NodeEntry>) -> ExportResult<NodeId> {
        if self.by_name.contains_key(name) {
            return Err(ExportError::DuplicateNode(name.to_string()));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(id, name, entry)));
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Create a node of a built-in entry type (`polymesh`, `ginstance`, ...).
    pub fn add_builtin(&mut self, name: &str, entry_name: &str) -> ExportResult<NodeId> {
        let entry = match self.entries.get(entry_name) {
            Some(entry) => entry.clone(),
            None => {
                let entry = NodeEntry::builtin(entry_name)
                    .ok_or_else(|| ExportError::UnknownEntry(entry_name.to_string()))?;
                let entry = Arc::new(entry);
                self.entries.insert(entry_name.to_string(), entry.clone());
                entry
            }
        };
        self.add(name, entry)
    }

    /// Set an attribute on a node.
    pub fn set(&mut self, id: NodeId, name: &str, value: impl Into<AttrValue>) -> ExportResult<()> {
        self.node_mut(id)
            .ok_or(ExportError::UnknownNode(id))?
            .set(name, value)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Find a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Remove a node; pointers to it no longer resolve.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.get_mut(id.0)?.take()?;
        self.by_name.remove(node.name());
        Some(node)
    }

    /// Live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl NodeLookup for Universe {
    fn node(&self, id: NodeId) -> Option<&dyn AttributeSource> {
        self.get(id).map(|n| n as &dyn AttributeSource)
    }
}
