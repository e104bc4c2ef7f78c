//! Generic attribute export.
//!
//! Every declared parameter of a node becomes a typed field named
//! `"{prefix}:{param}"`. Types without a USD counterpart (node pointers,
//! closures) are skipped; so are parameters still at their schema default
//! unless the config asks for defaults.

use bif_math::Mat4Ext;

use crate::config::ExportConfig;
use crate::node::{ArrayValue, AttrType, AttrValue, AttributeSource, ElemType};
use crate::usd::{PrimContainer, PrimHandle, Value, ValueType, Variability};

use super::ExportedAttrs;

/// Field name for `attr` under `prefix` (bare name when the prefix is empty).
pub fn prefixed_name(prefix: &str, attr: &str) -> String {
    if prefix.is_empty() {
        attr.to_string()
    } else {
        format!("{}:{}", prefix, attr)
    }
}

/// USD field type for a node parameter type.
pub fn usd_type(ty: AttrType) -> Option<ValueType> {
    let mapped = match ty {
        AttrType::Boolean => ValueType::Bool,
        AttrType::Byte => ValueType::UChar,
        AttrType::Int => ValueType::Int,
        AttrType::UInt => ValueType::UInt,
        AttrType::Float => ValueType::Float,
        AttrType::Rgb => ValueType::Color3f,
        AttrType::Rgba => ValueType::Color4f,
        AttrType::Vector => ValueType::Vector3f,
        AttrType::Vector2 => ValueType::Float2,
        AttrType::String => ValueType::String,
        AttrType::Enum => ValueType::Token,
        AttrType::Matrix => ValueType::Matrix4d,
        AttrType::Node | AttrType::Closure => return None,
        AttrType::Array(elem) => match elem {
            ElemType::Boolean => ValueType::BoolArray,
            ElemType::Byte => ValueType::UCharArray,
            ElemType::Int => ValueType::IntArray,
            ElemType::UInt => ValueType::UIntArray,
            ElemType::Float => ValueType::FloatArray,
            ElemType::Rgb => ValueType::Color3fArray,
            ElemType::Rgba => ValueType::Color4fArray,
            ElemType::Vector => ValueType::Vector3fArray,
            ElemType::Vector2 => ValueType::Float2Array,
            ElemType::String => ValueType::StringArray,
            ElemType::Matrix => ValueType::Matrix4dArray,
            ElemType::Node => return None,
        },
    };
    Some(mapped)
}

/// USD value for a node attribute value.
pub fn usd_value(value: &AttrValue) -> Option<Value> {
    let mapped = match value {
        AttrValue::Boolean(v) => Value::Bool(*v),
        AttrValue::Byte(v) => Value::UChar(*v),
        AttrValue::Int(v) => Value::Int(*v),
        AttrValue::UInt(v) => Value::UInt(*v),
        AttrValue::Float(v) => Value::Float(*v),
        AttrValue::Rgb(v) => Value::Color3f(*v),
        AttrValue::Rgba(v) => Value::Color4f(*v),
        AttrValue::Vector(v) => Value::Vector3f(*v),
        AttrValue::Vector2(v) => Value::Float2(*v),
        AttrValue::String(v) => Value::String(v.clone()),
        AttrValue::Enum(v) => Value::Token(v.clone()),
        AttrValue::Matrix(m) => Value::Matrix4d(m.to_double()),
        AttrValue::Node(_) | AttrValue::Closure => return None,
        AttrValue::Array(array) => match array {
            ArrayValue::Boolean(v) => Value::BoolArray(v.clone()),
            ArrayValue::Byte(v) => Value::UCharArray(v.clone()),
            ArrayValue::Int(v) => Value::IntArray(v.clone()),
            ArrayValue::UInt(v) => Value::UIntArray(v.clone()),
            ArrayValue::Float(v) => Value::FloatArray(v.clone()),
            ArrayValue::Rgb(v) => Value::Color3fArray(v.clone()),
            ArrayValue::Rgba(v) => Value::Color4fArray(v.clone()),
            ArrayValue::Vector(v) => Value::Vector3fArray(v.clone()),
            ArrayValue::Vector2(v) => Value::Float2Array(v.clone()),
            ArrayValue::String(v) => Value::StringArray(v.clone()),
            ArrayValue::Matrix(v) => Value::Matrix4dArray(v.iter().map(Mat4Ext::to_double).collect()),
            ArrayValue::Node(_) => return None,
        },
    };
    Some(mapped)
}

/// Writes a node's parameters as prefixed fields.
#[derive(Clone, Debug)]
pub struct AttributeWriter {
    prefix: String,
    write_defaults: bool,
}

impl AttributeWriter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            write_defaults: false,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            write_defaults: config.write_defaults,
        }
    }

    pub fn with_defaults(mut self, write_defaults: bool) -> Self {
        self.write_defaults = write_defaults;
        self
    }

    pub fn field_name(&self, attr: &str) -> String {
        prefixed_name(&self.prefix, attr)
    }

    /// Write every parameter of `node` not yet in `exported`.
    ///
    /// Each handled parameter is added to `exported`. Returns the number of
    /// fields written.
    pub fn write(
        &self,
        node: &dyn AttributeSource,
        prim: &PrimHandle,
        stage: &mut dyn PrimContainer,
        exported: &mut ExportedAttrs,
    ) -> usize {
        let mut written = 0;

        for param in node.params() {
            if exported.contains(&param.name) {
                continue;
            }

            let Some(value) = node.value(&param.name) else {
                continue;
            };
            if !self.write_defaults && *value == param.default {
                continue;
            }

            let (Some(ty), Some(value)) = (usd_type(param.ty), usd_value(value)) else {
                log::trace!("{}.{}: no USD type for {:?}", node.name(), param.name, param.ty);
                continue;
            };

            exported.insert(&param.name);
            let name = self.field_name(&param.name);
            let result = stage
                .create_field(prim, &name, ty, Variability::Varying)
                .and_then(|field| stage.set_field_value(&field, value));

            match result {
                Ok(()) => written += 1,
                Err(e) => log::warn!("{}: skipping {}: {}", prim.path, name, e),
            }
        }

        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Universe;
    use crate::usd::{SdfPath, Stage};
    use bif_math::{Mat4, Vec3};

    fn setup() -> (Universe, crate::node::NodeId, Stage, PrimHandle) {
        let mut universe = Universe::new();
        let id = universe.add_builtin("mesh", "polymesh").unwrap();
        let mut stage = Stage::new();
        let prim = stage
            .define_prim(&SdfPath::new("/mesh").unwrap(), "ArnoldPolymesh")
            .unwrap();
        (universe, id, stage, prim)
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(usd_type(AttrType::Boolean), Some(ValueType::Bool));
        assert_eq!(usd_type(AttrType::Byte), Some(ValueType::UChar));
        assert_eq!(usd_type(AttrType::Enum), Some(ValueType::Token));
        assert_eq!(usd_type(AttrType::Matrix), Some(ValueType::Matrix4d));
        assert_eq!(usd_type(AttrType::Array(ElemType::Vector)), Some(ValueType::Vector3fArray));
        assert_eq!(usd_type(AttrType::Node), None);
        assert_eq!(usd_type(AttrType::Closure), None);
        assert_eq!(usd_type(AttrType::Array(ElemType::Node)), None);
    }

    #[test]
    fn test_value_type_agrees_with_type_mapping() {
        let values = [
            AttrValue::Boolean(true),
            AttrValue::Byte(3),
            AttrValue::Int(-1),
            AttrValue::UInt(1),
            AttrValue::Float(0.5),
            AttrValue::Rgb(Vec3::ONE),
            AttrValue::Vector(Vec3::X),
            AttrValue::String("a".into()),
            AttrValue::Enum("zip".into()),
            AttrValue::Matrix(Mat4::IDENTITY),
            AttrValue::Array(ArrayValue::UInt(vec![3])),
            AttrValue::Array(ArrayValue::Matrix(vec![Mat4::IDENTITY])),
        ];
        for value in values {
            let mapped = usd_value(&value).unwrap();
            assert_eq!(Some(mapped.ty()), usd_type(value.ty()), "{:?}", value);
        }
    }

    #[test]
    fn test_prefixed_name() {
        assert_eq!(prefixed_name("arnold", "matte"), "arnold:matte");
        assert_eq!(prefixed_name("", "matte"), "matte");
    }

    #[test]
    fn test_writes_only_non_default_values() {
        let (mut universe, id, mut stage, prim) = setup();
        universe.set(id, "matte", true).unwrap();
        universe.set(id, "subdiv_iterations", 3u8).unwrap();

        let node = universe.get(id).unwrap();
        let mut exported = ExportedAttrs::new();
        let written = AttributeWriter::new("arnold").write(node, &prim, &mut stage, &mut exported);

        assert_eq!(written, 2);
        let mesh = stage.prim("/mesh").unwrap();
        assert_eq!(mesh.value("arnold:matte"), Some(&Value::Bool(true)));
        assert_eq!(mesh.value("arnold:subdiv_iterations"), Some(&Value::UChar(3)));
        assert_eq!(mesh.fields.len(), 2);
    }

    #[test]
    fn test_write_defaults_covers_all_mapped_params() {
        let (universe, id, mut stage, prim) = setup();
        let node = universe.get(id).unwrap();
        let mut exported = ExportedAttrs::new();

        let writer = AttributeWriter::new("arnold").with_defaults(true);
        let written = writer.write(node, &prim, &mut stage, &mut exported);

        let mapped = node.params().iter().filter(|p| usd_type(p.ty).is_some()).count();
        assert_eq!(written, mapped);

        let mesh = stage.prim("/mesh").unwrap();
        assert_eq!(mesh.value("arnold:visibility"), Some(&Value::UChar(255)));
        assert_eq!(mesh.value("arnold:subdiv_type"), Some(&Value::Token("none".into())));
        // node pointers have no field
        assert!(mesh.field("arnold:shader").is_none());
    }

    #[test]
    fn test_exported_names_are_skipped() {
        let (mut universe, id, mut stage, prim) = setup();
        universe.set(id, "matte", true).unwrap();
        universe.set(id, "opaque", false).unwrap();

        let node = universe.get(id).unwrap();
        let mut exported = ExportedAttrs::new();
        exported.insert("matte");
        AttributeWriter::new("arnold").write(node, &prim, &mut stage, &mut exported);

        let mesh = stage.prim("/mesh").unwrap();
        assert!(mesh.field("arnold:matte").is_none());
        assert_eq!(mesh.value("arnold:opaque"), Some(&Value::Bool(false)));
        assert!(exported.contains("opaque"));
    }

    #[test]
    fn test_second_write_in_same_call_is_noop() {
        let (mut universe, id, mut stage, prim) = setup();
        universe.set(id, "matte", true).unwrap();

        let node = universe.get(id).unwrap();
        let mut exported = ExportedAttrs::new();
        let writer = AttributeWriter::new("arnold");
        assert_eq!(writer.write(node, &prim, &mut stage, &mut exported), 1);
        assert_eq!(writer.write(node, &prim, &mut stage, &mut exported), 0);
    }

    #[test]
    fn test_array_values() {
        let (mut universe, id, mut stage, prim) = setup();
        universe
            .set(id, "nsides", ArrayValue::UInt(vec![4, 3]))
            .unwrap();
        universe
            .set(id, "vlist", ArrayValue::Vector(vec![Vec3::ZERO, Vec3::X, Vec3::Y]))
            .unwrap();

        let node = universe.get(id).unwrap();
        AttributeWriter::new("arnold").write(node, &prim, &mut stage, &mut ExportedAttrs::new());

        let mesh = stage.prim("/mesh").unwrap();
        assert_eq!(mesh.value("arnold:nsides"), Some(&Value::UIntArray(vec![4, 3])));
        assert_eq!(mesh.field("arnold:vlist").unwrap().ty, ValueType::Vector3fArray);
    }

    #[test]
    fn test_field_conflict_is_skipped() {
        let (mut universe, id, mut stage, prim) = setup();
        universe.set(id, "matte", true).unwrap();
        universe.set(id, "opaque", false).unwrap();
        stage
            .create_field(&prim, "arnold:matte", ValueType::Int, Variability::Varying)
            .unwrap();

        let node = universe.get(id).unwrap();
        let written = AttributeWriter::new("arnold").write(node, &prim, &mut stage, &mut ExportedAttrs::new());

        assert_eq!(written, 1);
        let mesh = stage.prim("/mesh").unwrap();
        assert_eq!(mesh.field("arnold:matte").unwrap().ty, ValueType::Int);
        assert_eq!(mesh.value("arnold:opaque"), Some(&Value::Bool(false)));
    }
}
