//! BIF Export - renderer node graph to USD translation.
//!
//! This crate provides:
//!
//! - **Source nodes**: `Universe`, `Node`, typed attributes and schemas
//! - **Target stage**: `Stage`, an in-memory USD document with USDA output
//! - **Translators**: generic node translation and diff-on-write instances
//!
//! # Example
//!
//! ```ignore
//! use bif_export::{ExportConfig, Registry, Stage, Universe, Writer};
//!
//! let mut universe = Universe::new();
//! let mesh = universe.add_builtin("mesh", "polymesh")?;
//! universe.set(mesh, "matte", true)?;
//!
//! let config = ExportConfig::default();
//! let mut stage = Stage::new();
//! let mut writer = Writer::new(&mut stage, &universe, &config);
//! Registry::new().write_universe(&universe, &mut writer);
//!
//! println!("{}", stage.to_usda());
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod translate;
pub mod usd;

// Re-export commonly used types
pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use node::{AttrType, AttrValue, AttributeSource, Node, NodeEntry, NodeId, NodeKind, NodeLookup, Universe};
pub use translate::{
    AttributeWriter, GenericNodeTranslator, InstanceNodeTranslator, NodeTranslator, Registry, Writer,
};
pub use usd::{PrimContainer, SdfPath, Stage, Value, ValueType};
