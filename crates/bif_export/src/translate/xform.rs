//! Default spatial writer: the node `matrix` as a single transform op.

use bif_math::Mat4;

use crate::error::ExportResult;
use crate::node::{ArrayValue, AttrValue, AttributeSource};
use crate::usd::{self, PrimContainer, PrimHandle, Value, ValueType, Variability};

use super::{ExportedAttrs, SpatialWriter, Writer};

/// Node attribute holding the local transform.
pub const MATRIX_ATTRIBUTE: &str = "matrix";

pub const XFORM_OP_TRANSFORM: &str = "xformOp:transform";
pub const XFORM_OP_ORDER: &str = "xformOpOrder";

/// Writes `xformOp:transform` (double precision) and `xformOpOrder`.
///
/// Motion-blurred nodes store an array of matrices; only the first key is
/// written since every field holds a single time-independent value.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatrixXformWriter;

impl MatrixXformWriter {
    fn matrix(node: &dyn AttributeSource) -> Option<Mat4> {
        match node.value(MATRIX_ATTRIBUTE)? {
            AttrValue::Matrix(m) => Some(*m),
            AttrValue::Array(ArrayValue::Matrix(keys)) => keys.first().copied(),
            _ => None,
        }
    }

    fn write_ops(stage: &mut dyn PrimContainer, prim: &PrimHandle, matrix: Mat4) -> ExportResult<()> {
        let transform =
            stage.create_field(prim, XFORM_OP_TRANSFORM, ValueType::Matrix4d, Variability::Varying)?;
        stage.set_field_value(&transform, usd::matrix4d(matrix))?;

        let order =
            stage.create_field(prim, XFORM_OP_ORDER, ValueType::TokenArray, Variability::Uniform)?;
        stage.set_field_value(&order, Value::TokenArray(vec![XFORM_OP_TRANSFORM.to_string()]))
    }
}

impl SpatialWriter for MatrixXformWriter {
    fn write(
        &self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        writer: &mut Writer<'_>,
        exported: &mut ExportedAttrs,
    ) {
        exported.insert(MATRIX_ATTRIBUTE);

        let Some(matrix) = Self::matrix(node) else {
            log::trace!("{}: no transform on {}", prim.path, node.name());
            return;
        };

        if let Err(e) = Self::write_ops(writer.stage(), prim, matrix) {
            log::warn!("{}: cannot write transform: {}", prim.path, e);
        }
    }
}
