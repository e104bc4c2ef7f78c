//! Source side of the translation: renderer nodes and their typed attributes.
//!
//! Nodes are read through two narrow capabilities:
//!
//! - [`AttributeSource`]: enumerate a node's declared parameters and fetch
//!   their current values by name.
//! - [`NodeLookup`]: resolve a [`NodeId`] (as stored in node-pointer
//!   attributes) back to a node. Lookup failure means "no reference".
//!
//! [`Universe`] is the in-memory graph implementing both.

mod entry;
mod universe;
mod value;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

pub use entry::{NodeEntry, ParamDecl};
pub use universe::Universe;
pub use value::{ArrayValue, AttrType, AttrValue, ElemType};

/// Node classifier driving spatial and binding writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Non-spatial renderer nodes (options, drivers, shaders)
    Generic,
    Shape,
    Camera,
    Light,
    /// References another node and overrides a subset of its attributes
    Instance,
    Other,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Generic,
        NodeKind::Shape,
        NodeKind::Camera,
        NodeKind::Light,
        NodeKind::Instance,
        NodeKind::Other,
    ];

    /// Kinds whose transform is written as xformOps by generic translation.
    ///
    /// Instances are handled by their own translator, which always writes
    /// the transform.
    pub fn is_xformable(self) -> bool {
        matches!(self, NodeKind::Shape | NodeKind::Camera | NodeKind::Light)
    }
}

/// Identity of a node within its universe. Never an owning reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Read access to a node's schema and attribute values.
pub trait AttributeSource {
    fn id(&self) -> NodeId;

    /// Unique node name; the basis of the output path.
    fn name(&self) -> &str;

    fn entry(&self) -> &NodeEntry;

    /// Current value of a declared attribute (its default if never set).
    fn value(&self, name: &str) -> Option<&AttrValue>;

    fn kind(&self) -> NodeKind {
        self.entry().kind
    }

    /// Declared parameters with their types, in schema order.
    fn params(&self) -> &[ParamDecl] {
        &self.entry().params
    }

    fn lookup_param(&self, name: &str) -> Option<&ParamDecl> {
        self.entry().lookup(name)
    }

    fn get_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(AttrValue::as_bool)
    }

    fn get_byte(&self, name: &str) -> Option<u8> {
        self.value(name).and_then(AttrValue::as_byte)
    }

    fn get_matrix(&self, name: &str) -> Option<bif_math::Mat4> {
        self.value(name).and_then(AttrValue::as_matrix)
    }

    /// Target of a node-pointer attribute, if set.
    fn get_pointer(&self, name: &str) -> Option<NodeId> {
        self.value(name).and_then(AttrValue::as_node)
    }
}

/// Resolves node identities to nodes.
pub trait NodeLookup {
    fn node(&self, id: NodeId) -> Option<&dyn AttributeSource>;
}

/// A renderer node: a schema plus the values set on it.
#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    entry: Arc<NodeEntry>,
    values: Vec<(String, AttrValue)>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, entry: Arc<NodeEntry>) -> Self {
        Self {
            id,
            name: name.into(),
            entry,
            values: Vec::new(),
        }
    }

    /// Set a declared attribute. The value must match the declared type.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> ExportResult<()> {
        let value = value.into();
        let param = self
            .entry
            .lookup(name)
            .ok_or_else(|| ExportError::UnknownParameter {
                entry: self.entry.name.clone(),
                param: name.to_string(),
            })?;

        if param.ty != value.ty() {
            return Err(ExportError::ParameterTypeMismatch {
                param: name.to_string(),
                expected: param.ty,
                actual: value.ty(),
            });
        }

        match self.values.iter().position(|(n, _)| n == name) {
            Some(i) => self.values[i].1 = value,
            None => self.values.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Restore a parameter to its schema default.
    pub fn reset(&mut self, name: &str) {
        self.values.retain(|(n, _)| n != name);
    }

    /// Whether the attribute was explicitly set.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _)| n == name)
    }
}

impl AttributeSource for Node {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn entry(&self) -> &NodeEntry {
        &self.entry
    }

    fn value(&self, name: &str) -> Option<&AttrValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.entry.lookup(name).map(|p| &p.default))
    }
}
