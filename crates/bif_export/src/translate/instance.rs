//! Instance translation with diff-on-write.
//!
//! An instance inherits every attribute of the node it references. Only the
//! attributes in [`DIFFED_ATTRIBUTES`] are compared, and a field is written
//! (unprefixed, as the reader resolves it against the referenced prim) only
//! where the instance diverges from its target. Equal values are left out,
//! so an instance costs space in proportion to what it overrides.

use crate::error::ExportError;
use crate::node::{AttrType, AttributeSource};
use crate::usd::{PrimContainer, PrimHandle, Value, ValueType, Variability};

use super::{ExportedAttrs, NodeTranslator, Writer};

/// Pointer attribute holding the instanced node.
pub const INSTANCE_TARGET: &str = "node";

/// Attribute types the diff path can compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffType {
    Boolean,
    Byte,
}

impl DiffType {
    pub fn value_type(self) -> ValueType {
        match self {
            DiffType::Boolean => ValueType::Bool,
            DiffType::Byte => ValueType::UChar,
        }
    }

    /// Current value of `name` on `node`, if it has this type.
    fn read(self, node: &dyn AttributeSource, name: &str) -> Option<Value> {
        match self {
            DiffType::Boolean => node.get_bool(name).map(Value::Bool),
            DiffType::Byte => node.get_byte(name).map(Value::UChar),
        }
    }
}

impl TryFrom<AttrType> for DiffType {
    type Error = ExportError;

    fn try_from(ty: AttrType) -> Result<Self, Self::Error> {
        match ty {
            AttrType::Boolean => Ok(DiffType::Boolean),
            AttrType::Byte => Ok(DiffType::Byte),
            other => Err(ExportError::UnsupportedDiffType(other)),
        }
    }
}

/// Attributes an instance may override, with their types.
pub const DIFFED_ATTRIBUTES: [(&str, DiffType); 6] = [
    ("visibility", DiffType::Byte),
    ("sidedness", DiffType::Byte),
    ("matte", DiffType::Boolean),
    ("receive_shadows", DiffType::Boolean),
    ("invert_normals", DiffType::Boolean),
    ("self_shadows", DiffType::Boolean),
];

/// Compare one attribute between an instance and its target.
///
/// Nothing happens if `target` does not declare `name`. Otherwise the
/// attribute is recorded in `exported`, and a field holding the instance
/// value is written only if the two values differ. Returns whether a field
/// was written.
pub fn process_instance_attribute(
    stage: &mut dyn PrimContainer,
    prim: &PrimHandle,
    node: &dyn AttributeSource,
    target: &dyn AttributeSource,
    name: &str,
    ty: DiffType,
    exported: &mut ExportedAttrs,
) -> bool {
    if target.lookup_param(name).is_none() {
        return false;
    }

    let (Some(value), Some(target_value)) = (ty.read(node, name), ty.read(target, name)) else {
        log::trace!(
            "{}: {} is not a comparable {:?} on {} and {}",
            prim.path,
            name,
            ty,
            node.name(),
            target.name()
        );
        return false;
    };

    let mut written = false;
    if value != target_value {
        let result = stage
            .create_field(prim, name, ty.value_type(), Variability::Varying)
            .and_then(|field| stage.set_field_value(&field, value));
        match result {
            Ok(()) => written = true,
            Err(e) => log::warn!("{}: skipping override {}: {}", prim.path, name, e),
        }
    }

    exported.insert(name);
    written
}

/// Writes instance nodes (`ginstance`).
///
/// The transform and material binding are always written. When the
/// instanced node resolves, the diffed attributes are compared against it
/// and the remaining attributes go through generic export. Without a
/// resolvable target nothing else is written.
#[derive(Clone, Debug)]
pub struct InstanceNodeTranslator {
    usd_name: String,
}

impl InstanceNodeTranslator {
    pub fn new(usd_name: impl Into<String>) -> Self {
        Self {
            usd_name: usd_name.into(),
        }
    }
}

impl NodeTranslator for InstanceNodeTranslator {
    fn usd_name(&self) -> &str {
        &self.usd_name
    }

    fn translate(&self, node: &dyn AttributeSource, writer: &mut Writer<'_>) {
        let Some(prim) = writer.define_prim_once(node, &self.usd_name) else {
            return;
        };

        let mut exported = ExportedAttrs::new();
        writer.write_matrix(&prim, node, &mut exported);
        writer.write_material_binding(&prim, node, &mut exported);

        let target = node
            .get_pointer(INSTANCE_TARGET)
            .and_then(|id| writer.nodes().node(id));
        let Some(target) = target else {
            log::debug!("{}: instance has no resolvable target", prim.path);
            return;
        };

        exported.insert(INSTANCE_TARGET);
        let mut overrides = 0;
        for (name, ty) in DIFFED_ATTRIBUTES {
            if process_instance_attribute(writer.stage(), &prim, node, target, name, ty, &mut exported) {
                overrides += 1;
            }
        }

        let written = writer.write_attributes(&prim, node, &mut exported);
        log::debug!(
            "{}: instance of {} with {} overrides, {} attributes",
            prim.path,
            target.name(),
            overrides,
            written
        );
    }
}
