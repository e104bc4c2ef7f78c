//! Error types shared by the node graph, the stage and the translators.
//!
//! Translators never surface these to their caller: every recoverable
//! failure is logged and absorbed at the translation site. The node and
//! stage mutators still report them so that misuse is visible in tests.

use thiserror::Error;

use crate::node::{AttrType, NodeId};
use crate::usd::ValueType;

/// Errors that can occur while building a universe or writing a stage.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid prim path: {0:?}")]
    InvalidPath(String),

    #[error("No prim at path {0}")]
    PrimNotFound(String),

    #[error("Field {field} on {path} is {expected:?}, got a {actual:?} value")]
    FieldTypeMismatch {
        path: String,
        field: String,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("No node with id {0:?}")]
    UnknownNode(NodeId),

    #[error("Node {0} already exists")]
    DuplicateNode(String),

    #[error("Unknown node entry {0}")]
    UnknownEntry(String),

    #[error("Node entry {entry} has no parameter {param}")]
    UnknownParameter { entry: String, param: String },

    #[error("Parameter {param} is declared {expected:?}, got a {actual:?} value")]
    ParameterTypeMismatch {
        param: String,
        expected: AttrType,
        actual: AttrType,
    },

    #[error("Attribute type {0:?} cannot be diffed on instances")]
    UnsupportedDiffType(AttrType),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
