//! Default material-binding writer.
//!
//! A node's `shader` (and optional `disp_map`) pointers become a `Material`
//! prim under the configured material scope, bound to the node's prim via
//! `material:binding`. Shapes sharing a shader share the material prim.

use crate::error::ExportResult;
use crate::node::AttributeSource;
use crate::usd::{PrimContainer, PrimHandle, SdfPath};

use super::{ExportedAttrs, MaterialBindingWriter, Writer};

pub const MATERIAL_BINDING: &str = "material:binding";
pub const MATERIAL_TYPE: &str = "Material";

const SHADER_ATTRIBUTE: &str = "shader";
const DISPLACEMENT_ATTRIBUTE: &str = "disp_map";
const SURFACE_OUTPUT: &str = "outputs:arnold:surface";
const DISPLACEMENT_OUTPUT: &str = "outputs:arnold:displacement";

/// Binds the material built from a node's `shader` / `disp_map` pointers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShaderBindingWriter;

impl ShaderBindingWriter {
    /// Path of the node a pointer attribute references, if it resolves.
    fn pointer_path(node: &dyn AttributeSource, attr: &str, writer: &Writer<'_>) -> Option<SdfPath> {
        let id = node.get_pointer(attr)?;
        match writer.nodes().node(id) {
            Some(target) => writer.resolve_path(target),
            None => {
                log::warn!("{}.{} references a missing node", node.name(), attr);
                None
            }
        }
    }

    fn bind(
        stage: &mut dyn PrimContainer,
        prim: &PrimHandle,
        material: &SdfPath,
        surface: &SdfPath,
        displacement: Option<SdfPath>,
    ) -> ExportResult<()> {
        let handle = if stage.is_active(material) {
            PrimHandle { path: material.clone() }
        } else {
            stage.define_prim(material, MATERIAL_TYPE)?
        };

        stage.set_relationship_targets(&handle, SURFACE_OUTPUT, vec![surface.clone()])?;
        if let Some(displacement) = displacement {
            stage.set_relationship_targets(&handle, DISPLACEMENT_OUTPUT, vec![displacement])?;
        }
        stage.set_relationship_targets(prim, MATERIAL_BINDING, vec![material.clone()])
    }
}

impl MaterialBindingWriter for ShaderBindingWriter {
    fn write(
        &self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        writer: &mut Writer<'_>,
        exported: &mut ExportedAttrs,
    ) {
        exported.insert(SHADER_ATTRIBUTE);
        exported.insert(DISPLACEMENT_ATTRIBUTE);

        let Some(surface) = Self::pointer_path(node, SHADER_ATTRIBUTE, writer) else {
            return;
        };
        let displacement = Self::pointer_path(node, DISPLACEMENT_ATTRIBUTE, writer);

        let scope = match SdfPath::new(&writer.config().material_scope) {
            Ok(scope) => scope,
            Err(e) => {
                log::warn!("{}: {}", prim.path, e);
                return;
            }
        };
        let material = scope.join(&surface);

        match Self::bind(writer.stage(), prim, &material, &surface, displacement) {
            Ok(()) => log::trace!("{}: bound {}", prim.path, material),
            Err(e) => log::warn!("{}: cannot bind {}: {}", prim.path, material, e),
        }
    }
}
