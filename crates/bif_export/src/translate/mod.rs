//! Node-to-primitive translation.
//!
//! A driving pass hands each renderer node to a [`NodeTranslator`] together
//! with a [`Writer`], the per-session context holding the target stage, the
//! node graph and the collaborators translators delegate to:
//!
//! - [`NameResolver`]: node → prim path
//! - [`SpatialWriter`]: node transform → xformOps
//! - [`MaterialBindingWriter`]: assigned shader → `material:binding`
//!
//! Translators never fail: a prim that is already defined and active makes
//! translation a no-op, and write errors are logged and skipped. Within one
//! writer session every node gets its own prim: when a second node resolves
//! to a path another node already claimed, it is written next to it under a
//! name suffixed with its id.

mod attributes;
mod generic;
mod instance;
mod material;
mod naming;
mod registry;
mod xform;

use std::collections::{HashMap, HashSet};

use crate::config::ExportConfig;
use crate::node::{AttributeSource, NodeId, NodeLookup};
use crate::usd::{PrimContainer, PrimHandle, SdfPath};

pub use attributes::{prefixed_name, usd_type, usd_value, AttributeWriter};
pub use generic::GenericNodeTranslator;
pub use instance::{process_instance_attribute, DiffType, InstanceNodeTranslator, DIFFED_ATTRIBUTES};
pub use material::{ShaderBindingWriter, MATERIAL_BINDING, MATERIAL_TYPE};
pub use naming::{sanitize_node_name, PathNameResolver};
pub use registry::{usd_type_name, Registry};
pub use xform::{MatrixXformWriter, XFORM_OP_ORDER, XFORM_OP_TRANSFORM};

/// Translates one renderer node into a prim.
pub trait NodeTranslator {
    /// Schema type name of the prims this translator defines.
    fn usd_name(&self) -> &str;

    fn translate(&self, node: &dyn AttributeSource, writer: &mut Writer<'_>);
}

/// Maps a node to its output prim path. Must be deterministic.
pub trait NameResolver {
    fn resolve(&self, node: &dyn AttributeSource) -> Option<SdfPath>;
}

/// Writes a node's transform onto an xformable prim.
pub trait SpatialWriter {
    fn write(
        &self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        writer: &mut Writer<'_>,
        exported: &mut ExportedAttrs,
    );
}

/// Writes the material binding for a node's assigned shader.
pub trait MaterialBindingWriter {
    fn write(
        &self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        writer: &mut Writer<'_>,
        exported: &mut ExportedAttrs,
    );
}

/// Attribute names already handled for one prim during one translation.
#[derive(Clone, Debug, Default)]
pub struct ExportedAttrs(HashSet<String>);

impl ExportedAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the name was already recorded.
    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Session context passed explicitly to every translation.
pub struct Writer<'a> {
    stage: &'a mut dyn PrimContainer,
    nodes: &'a dyn NodeLookup,
    config: &'a ExportConfig,
    names: &'a dyn NameResolver,
    spatial: &'a dyn SpatialWriter,
    binding: &'a dyn MaterialBindingWriter,
    /// Paths defined during this session and the node each belongs to
    claimed: HashMap<SdfPath, NodeId>,
    paths: HashMap<NodeId, SdfPath>,
}

impl<'a> Writer<'a> {
    /// Create a writer using the default collaborators.
    pub fn new(
        stage: &'a mut dyn PrimContainer,
        nodes: &'a dyn NodeLookup,
        config: &'a ExportConfig,
    ) -> Self {
        Self {
            stage,
            nodes,
            config,
            names: &PathNameResolver,
            spatial: &MatrixXformWriter,
            binding: &ShaderBindingWriter,
            claimed: HashMap::new(),
            paths: HashMap::new(),
        }
    }

    pub fn with_name_resolver(mut self, names: &'a dyn NameResolver) -> Self {
        self.names = names;
        self
    }

    pub fn with_spatial_writer(mut self, spatial: &'a dyn SpatialWriter) -> Self {
        self.spatial = spatial;
        self
    }

    pub fn with_binding_writer(mut self, binding: &'a dyn MaterialBindingWriter) -> Self {
        self.binding = binding;
        self
    }

    pub fn stage(&mut self) -> &mut dyn PrimContainer {
        &mut *self.stage
    }

    pub fn nodes(&self) -> &'a dyn NodeLookup {
        self.nodes
    }

    pub fn config(&self) -> &'a ExportConfig {
        self.config
    }

    /// Output path of a node: where it was written this session, otherwise
    /// the name resolver's path.
    pub fn resolve_path(&self, node: &dyn AttributeSource) -> Option<SdfPath> {
        match self.paths.get(&node.id()) {
            Some(path) => Some(path.clone()),
            None => self.names.resolve(node),
        }
    }

    /// First free sibling of `path` named after `id`.
    fn disambiguate(&self, path: &SdfPath, id: NodeId) -> Option<SdfPath> {
        let parent = path.parent()?;
        let base = format!("{}_{}", path.name(), id.0);
        for n in 0usize.. {
            let name = match n {
                0 => base.clone(),
                n => format!("{}_{}", base, n),
            };
            let candidate = parent.child(&name).ok()?;
            if !self.claimed.contains_key(&candidate) && self.stage.prim_status(&candidate).is_none() {
                return Some(candidate);
            }
        }
        None
    }

    /// Define the prim for `node` unless an active prim is already there.
    ///
    /// Returns `None` when translation should stop: the node was already
    /// written, its name does not resolve, or the stage refused the prim.
    pub fn define_prim_once(
        &mut self,
        node: &dyn AttributeSource,
        type_name: &str,
    ) -> Option<PrimHandle> {
        let id = node.id();
        if let Some(path) = self.paths.get(&id) {
            log::trace!("{} already written", path);
            return None;
        }

        let Some(resolved) = self.names.resolve(node) else {
            log::warn!("Node {} has no valid output path", node.name());
            return None;
        };

        let path = if self.claimed.contains_key(&resolved) {
            let Some(path) = self.disambiguate(&resolved, id) else {
                log::warn!("No free path next to {} for node {}", resolved, node.name());
                return None;
            };
            log::debug!("{} is taken, writing node {} to {}", resolved, node.name(), path);
            path
        } else if self.stage.is_active(&resolved) {
            log::trace!("{} already written", resolved);
            return None;
        } else {
            resolved
        };

        match self.stage.define_prim(&path, type_name) {
            Ok(prim) => {
                log::debug!("Defined {} {} for node {}", type_name, path, node.name());
                self.claimed.insert(path.clone(), id);
                self.paths.insert(id, path);
                Some(prim)
            }
            Err(e) => {
                log::warn!("Cannot define {} for node {}: {}", path, node.name(), e);
                None
            }
        }
    }

    pub fn write_matrix(
        &mut self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        exported: &mut ExportedAttrs,
    ) {
        let spatial = self.spatial;
        spatial.write(prim, node, self, exported);
    }

    pub fn write_material_binding(
        &mut self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        exported: &mut ExportedAttrs,
    ) {
        let binding = self.binding;
        binding.write(prim, node, self, exported);
    }

    /// Generic export of every remaining attribute under the configured prefix.
    pub fn write_attributes(
        &mut self,
        prim: &PrimHandle,
        node: &dyn AttributeSource,
        exported: &mut ExportedAttrs,
    ) -> usize {
        let config = self.config;
        AttributeWriter::from_config(config).write(node, prim, self.stage(), exported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Universe;
    use crate::usd::Stage;

    #[test]
    fn test_exported_attrs() {
        let mut exported = ExportedAttrs::new();
        assert!(exported.is_empty());
        assert!(exported.insert("matrix"));
        assert!(!exported.insert("matrix"));
        assert!(exported.contains("matrix"));
        assert_eq!(exported.len(), 1);
    }

    #[test]
    fn test_define_prim_once() {
        let mut universe = Universe::new();
        let id = universe.add_builtin("mesh", "polymesh").unwrap();
        let config = ExportConfig::default();
        let mut stage = Stage::new();

        {
            let mut writer = Writer::new(&mut stage, &universe, &config);
            let node = universe.get(id).unwrap();
            assert!(writer.define_prim_once(node, "ArnoldPolymesh").is_some());
            assert!(writer.define_prim_once(node, "ArnoldPolymesh").is_none());
        }

        assert_eq!(stage.prim_count(), 1);
    }

    #[test]
    fn test_define_prim_once_redefines_inactive() {
        let mut universe = Universe::new();
        let id = universe.add_builtin("mesh", "polymesh").unwrap();
        let config = ExportConfig::default();
        let mut stage = Stage::new();
        let path = SdfPath::new("/mesh").unwrap();
        stage.define_prim(&path, "ArnoldPolymesh").unwrap();
        stage.set_active(&path, false).unwrap();

        let mut writer = Writer::new(&mut stage, &universe, &config);
        let node = universe.get(id).unwrap();
        assert!(writer.define_prim_once(node, "ArnoldPolymesh").is_some());
    }

    struct FixedName;

    impl NameResolver for FixedName {
        fn resolve(&self, _node: &dyn AttributeSource) -> Option<SdfPath> {
            SdfPath::new("/fixed").ok()
        }
    }

    #[test]
    fn test_custom_name_resolver() {
        let mut universe = Universe::new();
        let id = universe.add_builtin("mesh", "polymesh").unwrap();
        let config = ExportConfig::default();
        let mut stage = Stage::new();

        {
            let mut writer = Writer::new(&mut stage, &universe, &config).with_name_resolver(&FixedName);
            let node = universe.get(id).unwrap();
            writer.define_prim_once(node, "ArnoldPolymesh");
        }

        assert!(stage.prim("/fixed").is_some());
        assert!(stage.prim("/mesh").is_none());
    }

    #[test]
    fn test_colliding_paths_get_distinct_prims() {
        let mut universe = Universe::new();
        let a = universe.add_builtin("a", "polymesh").unwrap();
        let b = universe.add_builtin("b", "polymesh").unwrap();
        let config = ExportConfig::default();
        let mut stage = Stage::new();

        {
            let mut writer = Writer::new(&mut stage, &universe, &config).with_name_resolver(&FixedName);
            let node_a = universe.get(a).unwrap();
            let node_b = universe.get(b).unwrap();

            let prim_a = writer.define_prim_once(node_a, "ArnoldPolymesh").unwrap();
            let prim_b = writer.define_prim_once(node_b, "ArnoldPolymesh").unwrap();
            assert_eq!(prim_a.path.as_str(), "/fixed");
            assert_eq!(prim_b.path.as_str(), format!("/fixed_{}", b.0));

            // each node resolves to where it was written and stays written once
            assert_eq!(writer.resolve_path(node_b), Some(prim_b.path.clone()));
            assert!(writer.define_prim_once(node_a, "ArnoldPolymesh").is_none());
            assert!(writer.define_prim_once(node_b, "ArnoldPolymesh").is_none());
        }

        assert_eq!(stage.prim_count(), 2);
    }

    #[test]
    fn test_disambiguation_skips_existing_prims() {
        let mut universe = Universe::new();
        let a = universe.add_builtin("a", "polymesh").unwrap();
        let b = universe.add_builtin("b", "polymesh").unwrap();
        let config = ExportConfig::default();
        let mut stage = Stage::new();
        let taken = SdfPath::new(&format!("/fixed_{}", b.0)).unwrap();
        stage.define_prim(&taken, "Scope").unwrap();

        {
            let mut writer = Writer::new(&mut stage, &universe, &config).with_name_resolver(&FixedName);
            writer.define_prim_once(universe.get(a).unwrap(), "ArnoldPolymesh");
            let prim = writer
                .define_prim_once(universe.get(b).unwrap(), "ArnoldPolymesh")
                .unwrap();
            assert_eq!(prim.path.as_str(), format!("/fixed_{}_1", b.0));
        }

        assert_eq!(stage.prim_at(&taken).unwrap().type_name, "Scope");
    }
}
