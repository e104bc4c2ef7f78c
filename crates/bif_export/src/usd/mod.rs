//! USD (Universal Scene Description) target side of the export.
//!
//! This module provides the document the translators write into:
//!
//! - `SdfPath`, `ValueType`, `Value`: prim paths and typed field values
//! - `PrimContainer`: the narrow write interface translators depend on
//! - `Stage`: an in-memory container with USDA serialization
//!
//! ## Not Yet Supported
//!
//! - Binary `.usdc` output
//! - Time samples (every field holds a single default value)
//! - Composition arcs (references, payloads, variants)

mod stage;
mod types;
mod writer;

pub use stage::*;
pub use types::*;
