//! Node entry → translator registry and the registry-driven export pass.

use std::collections::HashMap;

use crate::node::{AttributeSource, Universe};

use super::{GenericNodeTranslator, InstanceNodeTranslator, NodeTranslator, Writer};

/// Schema type name for a node entry: `Arnold` + CamelCase entry name.
///
/// `polymesh` → `ArnoldPolymesh`, `persp_camera` → `ArnoldPerspCamera`.
pub fn usd_type_name(entry: &str) -> String {
    let mut name = String::from("Arnold");
    for part in entry.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Chooses the translator for each node entry.
///
/// Entries without a registered translator fall back to generic
/// translation with the derived [`usd_type_name`].
pub struct Registry {
    translators: HashMap<String, Box<dyn NodeTranslator>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with the built-in instance translator.
    pub fn new() -> Self {
        let mut registry = Self {
            translators: HashMap::new(),
        };
        registry.register(
            "ginstance",
            Box::new(InstanceNodeTranslator::new(usd_type_name("ginstance"))),
        );
        registry
    }

    pub fn register(&mut self, entry: &str, translator: Box<dyn NodeTranslator>) {
        self.translators.insert(entry.to_string(), translator);
    }

    /// Registered translator for an entry, if any.
    pub fn translator(&self, entry: &str) -> Option<&dyn NodeTranslator> {
        self.translators.get(entry).map(|t| t.as_ref())
    }

    /// Translate one node with its entry's translator.
    pub fn write_node(&self, node: &dyn AttributeSource, writer: &mut Writer<'_>) {
        match self.translator(&node.entry().name) {
            Some(translator) => translator.translate(node, writer),
            None => {
                GenericNodeTranslator::new(usd_type_name(&node.entry().name)).translate(node, writer)
            }
        }
    }

    /// Translate every node of `universe` whose kind passes the config mask.
    ///
    /// Nodes are visited in creation order. Returns the number of nodes
    /// handed to a translator.
    pub fn write_universe(&self, universe: &Universe, writer: &mut Writer<'_>) -> usize {
        let mut visited = 0;
        for node in universe.iter() {
            if !writer.config().accepts(node.kind()) {
                log::trace!("Skipping masked node {}", node.name());
                continue;
            }
            self.write_node(node, writer);
            visited += 1;
        }
        log::info!("Translated {} of {} nodes", visited, universe.len());
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::node::NodeKind;
    use crate::usd::Stage;

    #[test]
    fn test_usd_type_name() {
        assert_eq!(usd_type_name("polymesh"), "ArnoldPolymesh");
        assert_eq!(usd_type_name("persp_camera"), "ArnoldPerspCamera");
        assert_eq!(usd_type_name("driver_exr"), "ArnoldDriverExr");
        assert_eq!(usd_type_name("ginstance"), "ArnoldGinstance");
    }

    #[test]
    fn test_instance_translator_registered() {
        let registry = Registry::new();
        assert_eq!(registry.translator("ginstance").unwrap().usd_name(), "ArnoldGinstance");
        assert!(registry.translator("polymesh").is_none());
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = Registry::new();
        registry.register("polymesh", Box::new(GenericNodeTranslator::new("Mesh")));

        let mut universe = Universe::new();
        universe.add_builtin("mesh", "polymesh").unwrap();
        let config = ExportConfig::default();
        let mut stage = Stage::new();
        {
            let mut writer = Writer::new(&mut stage, &universe, &config);
            registry.write_universe(&universe, &mut writer);
        }

        assert_eq!(stage.prim("/mesh").unwrap().type_name, "Mesh");
    }

    #[test]
    fn test_write_universe_respects_mask() {
        let mut universe = Universe::new();
        universe.add_builtin("mesh", "polymesh").unwrap();
        universe.add_builtin("cam", "persp_camera").unwrap();
        universe.add_builtin("options", "options").unwrap();

        let mut config = ExportConfig::default();
        config.mask.remove(&NodeKind::Generic);
        let mut stage = Stage::new();
        let visited = {
            let mut writer = Writer::new(&mut stage, &universe, &config);
            Registry::new().write_universe(&universe, &mut writer)
        };

        assert_eq!(visited, 2);
        assert_eq!(stage.prim("/mesh").unwrap().type_name, "ArnoldPolymesh");
        assert_eq!(stage.prim("/cam").unwrap().type_name, "ArnoldPerspCamera");
        assert!(stage.prim("/options").is_none());
    }
}
