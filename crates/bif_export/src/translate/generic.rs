//! Translation of any renderer node to a typed `Arnold*` prim.

use crate::node::{AttributeSource, NodeKind};

use super::{ExportedAttrs, NodeTranslator, Writer};

/// Writes a node to a prim of a fixed schema type.
///
/// Shapes, cameras and lights also get their transform written as
/// xformOps, and shapes their material binding. Everything else goes
/// through generic attribute export.
#[derive(Clone, Debug)]
pub struct GenericNodeTranslator {
    usd_name: String,
}

impl GenericNodeTranslator {
    pub fn new(usd_name: impl Into<String>) -> Self {
        Self {
            usd_name: usd_name.into(),
        }
    }
}

impl NodeTranslator for GenericNodeTranslator {
    fn usd_name(&self) -> &str {
        &self.usd_name
    }

    fn translate(&self, node: &dyn AttributeSource, writer: &mut Writer<'_>) {
        let Some(prim) = writer.define_prim_once(node, &self.usd_name) else {
            return;
        };

        let mut exported = ExportedAttrs::new();
        let kind = node.kind();
        if kind.is_xformable() {
            writer.write_matrix(&prim, node, &mut exported);
            if kind == NodeKind::Shape {
                writer.write_material_binding(&prim, node, &mut exported);
            }
        }

        let written = writer.write_attributes(&prim, node, &mut exported);
        log::debug!("{}: {} attributes", prim.path, written);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::node::Universe;
    use crate::translate::{MATERIAL_BINDING, XFORM_OP_TRANSFORM};
    use crate::usd::{Stage, Value};
    use bif_math::{Mat4, Vec3};

    fn translate(universe: &Universe, stage: &mut Stage, name: &str, usd_name: &str) {
        let config = ExportConfig::default();
        let node = universe.get(universe.find(name).unwrap()).unwrap();
        let mut writer = Writer::new(stage, universe, &config);
        GenericNodeTranslator::new(usd_name).translate(node, &mut writer);
    }

    #[test]
    fn test_shape_gets_xform_binding_and_attributes() {
        let mut universe = Universe::new();
        let mesh = universe.add_builtin("mesh", "polymesh").unwrap();
        let shader = universe.add_builtin("red", "standard_surface").unwrap();
        universe.set(mesh, "matte", true).unwrap();
        universe.set(mesh, "shader", shader).unwrap();
        universe
            .set(mesh, "matrix", Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();

        let mut stage = Stage::new();
        translate(&universe, &mut stage, "mesh", "ArnoldPolymesh");

        let prim = stage.prim("/mesh").unwrap();
        assert_eq!(prim.type_name, "ArnoldPolymesh");
        assert_eq!(prim.value("arnold:matte"), Some(&Value::Bool(true)));
        assert!(prim.field(XFORM_OP_TRANSFORM).is_some());
        assert!(prim.field("arnold:matrix").is_none());
        assert!(prim.relationship(MATERIAL_BINDING).is_some());
    }

    #[test]
    fn test_camera_gets_xform_but_no_binding() {
        let mut universe = Universe::new();
        let cam = universe.add_builtin("cam", "persp_camera").unwrap();
        universe.set(cam, "fov", 35.0f32).unwrap();

        let mut stage = Stage::new();
        translate(&universe, &mut stage, "cam", "ArnoldPerspCamera");

        let prim = stage.prim("/cam").unwrap();
        assert!(prim.field(XFORM_OP_TRANSFORM).is_some());
        assert!(prim.relationships.is_empty());
        assert_eq!(prim.value("arnold:fov"), Some(&Value::Float(35.0)));
    }

    #[test]
    fn test_generic_node_has_no_xform() {
        let mut universe = Universe::new();
        let opts = universe.add_builtin("options", "options").unwrap();
        universe.set(opts, "xres", 1920i32).unwrap();

        let mut stage = Stage::new();
        translate(&universe, &mut stage, "options", "ArnoldOptions");

        let prim = stage.prim("/options").unwrap();
        assert!(prim.field(XFORM_OP_TRANSFORM).is_none());
        assert_eq!(prim.value("arnold:xres"), Some(&Value::Int(1920)));
        assert_eq!(prim.fields.len(), 1);
    }

    #[test]
    fn test_translate_twice_is_noop() {
        let mut universe = Universe::new();
        let mesh = universe.add_builtin("mesh", "polymesh").unwrap();
        universe.set(mesh, "matte", true).unwrap();

        let mut stage = Stage::new();
        translate(&universe, &mut stage, "mesh", "ArnoldPolymesh");
        let first = stage.clone();

        // a changed value must not leak into the already written prim
        universe.set(mesh, "opaque", false).unwrap();
        translate(&universe, &mut stage, "mesh", "ArnoldPolymesh");

        assert_eq!(stage, first);
    }

    #[test]
    fn test_custom_prefix() {
        let mut universe = Universe::new();
        let mesh = universe.add_builtin("mesh", "polymesh").unwrap();
        universe.set(mesh, "matte", true).unwrap();

        let config = ExportConfig {
            prefix: "primvars:arnold".to_string(),
            ..Default::default()
        };
        let mut stage = Stage::new();
        {
            let node = universe.get(mesh).unwrap();
            let mut writer = Writer::new(&mut stage, &universe, &config);
            GenericNodeTranslator::new("ArnoldPolymesh").translate(node, &mut writer);
        }

        let prim = stage.prim("/mesh").unwrap();
        assert_eq!(prim.value("primvars:arnold:matte"), Some(&Value::Bool(true)));
    }
}
