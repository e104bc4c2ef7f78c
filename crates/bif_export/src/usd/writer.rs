//! USDA (ASCII) serialization of an in-memory stage.
//!
//! Output layout:
//!
//! ```text
//! #usda 1.0
//!
//! over "World"
//! {
//!     def ArnoldPolymesh "mesh" (
//!         active = false
//!     )
//!     {
//!         bool arnold:matte = 1
//!         rel material:binding = </materials/shader>
//!     }
//! }
//! ```

use std::fmt::Write as _;
use std::path::Path;

use crate::error::ExportResult;

use super::stage::{Prim, Specifier, Stage};
use super::types::Variability;

const INDENT: &str = "    ";

impl Stage {
    /// Serialize the stage as USDA text.
    pub fn to_usda(&self) -> String {
        let mut out = String::from("#usda 1.0\n");
        for name in &self.pseudo_root().children {
            if let Some(prim) = self.child_of(self.pseudo_root(), name) {
                out.push('\n');
                self.write_prim(&mut out, prim, 0);
            }
        }
        out
    }

    /// Write the stage to a `.usda` file.
    pub fn write_usda<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_usda())?;
        log::info!("Wrote {} prims to {}", self.prim_count(), path.display());
        Ok(())
    }

    fn child_of(&self, parent: &Prim, name: &str) -> Option<&Prim> {
        let path = parent.path.child(name).ok()?;
        self.prim_at(&path)
    }

    fn write_prim(&self, out: &mut String, prim: &Prim, depth: usize) {
        let pad = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);

        let specifier = match prim.specifier {
            Specifier::Def => "def",
            Specifier::Over => "over",
        };
        if prim.type_name.is_empty() {
            let _ = write!(out, "{}{} \"{}\"", pad, specifier, prim.path.name());
        } else {
            let _ = write!(
                out,
                "{}{} {} \"{}\"",
                pad,
                specifier,
                prim.type_name,
                prim.path.name()
            );
        }
        if !prim.active {
            let _ = write!(out, " (\n{}active = false\n{})", inner, pad);
        }
        let _ = writeln!(out, "\n{}{{", pad);

        for field in &prim.fields {
            let uniform = match field.variability {
                Variability::Uniform => "uniform ",
                Variability::Varying => "",
            };
            let _ = write!(out, "{}{}{} {}", inner, uniform, field.ty.usda_name(), field.name);
            if let Some(value) = &field.value {
                let _ = write!(out, " = {}", value.to_usda());
            }
            out.push('\n');
        }

        for rel in &prim.relationships {
            let targets: Vec<String> = rel.targets.iter().map(|t| format!("<{}>", t)).collect();
            let targets = match targets.len() {
                1 => targets[0].clone(),
                _ => format!("[{}]", targets.join(", ")),
            };
            let _ = writeln!(out, "{}rel {} = {}", inner, rel.name, targets);
        }

        for name in &prim.children {
            if let Some(child) = self.child_of(prim, name) {
                out.push('\n');
                self.write_prim(out, child, depth + 1);
            }
        }

        let _ = writeln!(out, "{}}}", pad);
    }
}
