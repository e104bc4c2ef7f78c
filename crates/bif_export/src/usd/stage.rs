//! Path-addressed primitive container.
//!
//! [`PrimContainer`] is the narrow interface translators write through;
//! [`Stage`] is the in-memory implementation used for export and tests.

use std::collections::HashMap;

use crate::error::{ExportError, ExportResult};

use super::types::{SdfPath, Value, ValueType, Variability};

/// How a prim came to exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Specifier {
    /// Defined through [`PrimContainer::define_prim`]
    #[default]
    Def,
    /// Created implicitly as the ancestor of a defined prim
    Over,
}

/// Result of looking up a prim path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimStatus {
    pub active: bool,
}

/// Handle to a defined prim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimHandle {
    pub path: SdfPath,
}

/// Handle to a field created on a prim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldHandle {
    pub prim: SdfPath,
    pub name: String,
}

/// Write interface of a scene description document.
pub trait PrimContainer {
    /// `None` unless a prim was defined at `path`. Implicit ancestors do
    /// not count.
    fn prim_status(&self, path: &SdfPath) -> Option<PrimStatus>;

    /// Define (or redefine) a prim of `type_name`. Missing ancestors are
    /// created as typeless `over` prims.
    fn define_prim(&mut self, path: &SdfPath, type_name: &str) -> ExportResult<PrimHandle>;

    /// Create a field, or return the existing field of the same name.
    fn create_field(
        &mut self,
        prim: &PrimHandle,
        name: &str,
        ty: ValueType,
        variability: Variability,
    ) -> ExportResult<FieldHandle>;

    fn set_field_value(&mut self, field: &FieldHandle, value: Value) -> ExportResult<()>;

    /// Replace the targets of a relationship.
    fn set_relationship_targets(
        &mut self,
        prim: &PrimHandle,
        name: &str,
        targets: Vec<SdfPath>,
    ) -> ExportResult<()>;

    /// A prim is defined at `path` and is active.
    fn is_active(&self, path: &SdfPath) -> bool {
        matches!(self.prim_status(path), Some(PrimStatus { active: true }))
    }
}

/// A typed attribute on a prim.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: ValueType,
    pub variability: Variability,
    /// Unset until a value is authored
    pub value: Option<Value>,
}

/// A relationship to other prims.
#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
    pub name: String,
    pub targets: Vec<SdfPath>,
}

/// A prim in the stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Prim {
    pub path: SdfPath,

    pub specifier: Specifier,

    /// Schema type name; empty for typeless prims
    pub type_name: String,

    pub active: bool,

    /// Child names in definition order
    pub children: Vec<String>,

    /// Fields in creation order
    pub fields: Vec<Field>,

    pub relationships: Vec<Relationship>,
}

impl Prim {
    fn new(path: SdfPath, specifier: Specifier, type_name: &str) -> Self {
        Self {
            path,
            specifier,
            type_name: type_name.to_string(),
            active: true,
            children: Vec::new(),
            fields: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Authored value of a field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(|f| f.value.as_ref())
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Field names starting with `prefix`.
    pub fn field_names_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .filter(move |n| n.starts_with(prefix))
    }
}

/// An in-memory scene description document.
///
/// This corresponds to a `UsdStage` in USD terminology.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    prims: HashMap<SdfPath, Prim>,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Create a stage holding only the pseudo-root.
    pub fn new() -> Self {
        let root = SdfPath::root();
        let mut prims = HashMap::new();
        prims.insert(root.clone(), Prim::new(root, Specifier::Def, ""));
        Self { prims }
    }

    /// Prim at `path`, if any. Invalid paths yield `None`.
    pub fn prim(&self, path: &str) -> Option<&Prim> {
        let path = SdfPath::new(path).ok()?;
        self.prims.get(&path)
    }

    pub fn prim_at(&self, path: &SdfPath) -> Option<&Prim> {
        self.prims.get(path)
    }

    pub fn pseudo_root(&self) -> &Prim {
        &self.prims[&SdfPath::root()]
    }

    /// Number of prims, excluding the pseudo-root.
    pub fn prim_count(&self) -> usize {
        self.prims.len() - 1
    }

    /// Author the `active` metadata of a prim.
    pub fn set_active(&mut self, path: &SdfPath, active: bool) -> ExportResult<()> {
        let prim = self
            .prims
            .get_mut(path)
            .ok_or_else(|| ExportError::PrimNotFound(path.to_string()))?;
        prim.active = active;
        Ok(())
    }

    fn prim_mut(&mut self, path: &SdfPath) -> ExportResult<&mut Prim> {
        self.prims
            .get_mut(path)
            .ok_or_else(|| ExportError::PrimNotFound(path.to_string()))
    }

    /// Ensure a prim exists at `path`, creating it and its missing ancestors
    /// as `over` prims.
    fn ensure_prim(&mut self, path: &SdfPath) -> ExportResult<()> {
        if self.prims.contains_key(path) {
            return Ok(());
        }

        let parent = path
            .parent()
            .ok_or_else(|| ExportError::InvalidPath(path.to_string()))?;
        self.ensure_prim(&parent)?;
        self.prim_mut(&parent)?.children.push(path.name().to_string());
        self.prims
            .insert(path.clone(), Prim::new(path.clone(), Specifier::Over, ""));
        Ok(())
    }
}

impl PrimContainer for Stage {
    fn prim_status(&self, path: &SdfPath) -> Option<PrimStatus> {
        if path.is_root() {
            return None;
        }
        self.prims
            .get(path)
            .filter(|p| p.specifier == Specifier::Def)
            .map(|p| PrimStatus { active: p.active })
    }

    fn define_prim(&mut self, path: &SdfPath, type_name: &str) -> ExportResult<PrimHandle> {
        if path.is_root() {
            return Err(ExportError::InvalidPath(path.to_string()));
        }

        self.ensure_prim(path)?;
        let prim = self.prim_mut(path)?;
        prim.specifier = Specifier::Def;
        if !type_name.is_empty() {
            prim.type_name = type_name.to_string();
        }
        prim.active = true;

        Ok(PrimHandle { path: path.clone() })
    }

    fn create_field(
        &mut self,
        prim: &PrimHandle,
        name: &str,
        ty: ValueType,
        variability: Variability,
    ) -> ExportResult<FieldHandle> {
        let target = self.prim_mut(&prim.path)?;

        let existing = target.fields.iter().find(|f| f.name == name).map(|f| f.ty);
        match existing {
            Some(existing) if existing != ty => {
                return Err(ExportError::FieldTypeMismatch {
                    path: prim.path.to_string(),
                    field: name.to_string(),
                    expected: existing,
                    actual: ty,
                });
            }
            Some(_) => {}
            None => target.fields.push(Field {
                name: name.to_string(),
                ty,
                variability,
                value: None,
            }),
        }

        Ok(FieldHandle {
            prim: prim.path.clone(),
            name: name.to_string(),
        })
    }

    fn set_field_value(&mut self, field: &FieldHandle, value: Value) -> ExportResult<()> {
        let prim = self.prim_mut(&field.prim)?;
        let slot = prim
            .fields
            .iter_mut()
            .find(|f| f.name == field.name)
            .ok_or_else(|| ExportError::PrimNotFound(format!("{}.{}", field.prim, field.name)))?;

        if slot.ty != value.ty() {
            return Err(ExportError::FieldTypeMismatch {
                path: field.prim.to_string(),
                field: field.name.clone(),
                expected: slot.ty,
                actual: value.ty(),
            });
        }

        slot.value = Some(value);
        Ok(())
    }

    fn set_relationship_targets(
        &mut self,
        prim: &PrimHandle,
        name: &str,
        targets: Vec<SdfPath>,
    ) -> ExportResult<()> {
        let target = self.prim_mut(&prim.path)?;

        match target.relationships.iter().position(|r| r.name == name) {
            Some(i) => target.relationships[i].targets = targets,
            None => target.relationships.push(Relationship {
                name: name.to_string(),
                targets,
            }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> SdfPath {
        SdfPath::new(p).unwrap()
    }

    #[test]
    fn test_empty_stage() {
        let stage = Stage::new();
        assert_eq!(stage.prim_count(), 0);
        assert!(stage.prim_status(&SdfPath::root()).is_none());
    }

    #[test]
    fn test_define_creates_ancestors() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/geo/mesh"), "ArnoldPolymesh").unwrap();

        assert_eq!(stage.prim_count(), 3);
        assert_eq!(stage.prim("/World").unwrap().type_name, "");
        assert_eq!(stage.prim("/World").unwrap().specifier, Specifier::Over);
        assert_eq!(stage.prim("/World/geo/mesh").unwrap().specifier, Specifier::Def);
        assert_eq!(stage.prim("/World/geo").unwrap().children, vec!["mesh"]);
        assert_eq!(stage.prim("/World/geo/mesh").unwrap().type_name, "ArnoldPolymesh");
        assert_eq!(stage.pseudo_root().children, vec!["World"]);
    }

    #[test]
    fn test_implicit_ancestors_are_not_defined() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/World/mesh"), "ArnoldPolymesh").unwrap();

        let world = path("/World");
        assert!(stage.prim_status(&world).is_none());
        assert!(!stage.is_active(&world));

        // defining the ancestor later turns it into a real prim, children kept
        stage.define_prim(&world, "ArnoldOptions").unwrap();
        assert_eq!(stage.prim_status(&world), Some(PrimStatus { active: true }));
        let prim = stage.prim_at(&world).unwrap();
        assert_eq!(prim.specifier, Specifier::Def);
        assert_eq!(prim.type_name, "ArnoldOptions");
        assert_eq!(prim.children, vec!["mesh"]);
        assert_eq!(stage.prim_count(), 2);
    }

    #[test]
    fn test_define_twice_keeps_single_prim() {
        let mut stage = Stage::new();
        stage.define_prim(&path("/mesh"), "ArnoldPolymesh").unwrap();
        stage.define_prim(&path("/mesh"), "ArnoldPolymesh").unwrap();

        assert_eq!(stage.prim_count(), 1);
        assert_eq!(stage.pseudo_root().children.len(), 1);
    }

    #[test]
    fn test_define_root_rejected() {
        let mut stage = Stage::new();
        assert!(stage.define_prim(&SdfPath::root(), "X").is_err());
    }

    #[test]
    fn test_status_and_activity() {
        let mut stage = Stage::new();
        let p = path("/mesh");
        assert!(stage.prim_status(&p).is_none());

        stage.define_prim(&p, "ArnoldPolymesh").unwrap();
        assert!(stage.is_active(&p));

        stage.set_active(&p, false).unwrap();
        assert_eq!(stage.prim_status(&p), Some(PrimStatus { active: false }));
        assert!(!stage.is_active(&p));

        // redefinition re-activates
        stage.define_prim(&p, "ArnoldPolymesh").unwrap();
        assert!(stage.is_active(&p));
    }

    #[test]
    fn test_create_and_set_field() {
        let mut stage = Stage::new();
        let prim = stage.define_prim(&path("/mesh"), "ArnoldPolymesh").unwrap();
        let field = stage
            .create_field(&prim, "arnold:matte", ValueType::Bool, Variability::Varying)
            .unwrap();
        stage.set_field_value(&field, Value::Bool(true)).unwrap();

        let mesh = stage.prim("/mesh").unwrap();
        assert_eq!(mesh.value("arnold:matte"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_create_field_returns_existing() {
        let mut stage = Stage::new();
        let prim = stage.define_prim(&path("/mesh"), "").unwrap();
        stage
            .create_field(&prim, "visibility", ValueType::UChar, Variability::Varying)
            .unwrap();
        stage
            .create_field(&prim, "visibility", ValueType::UChar, Variability::Varying)
            .unwrap();

        assert_eq!(stage.prim("/mesh").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_field_type_mismatch() {
        let mut stage = Stage::new();
        let prim = stage.define_prim(&path("/mesh"), "").unwrap();
        let field = stage
            .create_field(&prim, "visibility", ValueType::UChar, Variability::Varying)
            .unwrap();

        let err = stage.set_field_value(&field, Value::Bool(true)).unwrap_err();
        assert!(matches!(err, ExportError::FieldTypeMismatch { .. }));

        let err = stage
            .create_field(&prim, "visibility", ValueType::Int, Variability::Varying)
            .unwrap_err();
        assert!(matches!(err, ExportError::FieldTypeMismatch { .. }));
    }

    #[test]
    fn test_write_to_missing_prim() {
        let mut stage = Stage::new();
        let handle = PrimHandle { path: path("/ghost") };
        let err = stage
            .create_field(&handle, "x", ValueType::Int, Variability::Varying)
            .unwrap_err();
        assert!(matches!(err, ExportError::PrimNotFound(_)));
    }

    #[test]
    fn test_relationship_targets_replaced() {
        let mut stage = Stage::new();
        let prim = stage.define_prim(&path("/mesh"), "").unwrap();
        stage
            .set_relationship_targets(&prim, "material:binding", vec![path("/materials/a")])
            .unwrap();
        stage
            .set_relationship_targets(&prim, "material:binding", vec![path("/materials/b")])
            .unwrap();

        let mesh = stage.prim("/mesh").unwrap();
        assert_eq!(mesh.relationships.len(), 1);
        assert_eq!(mesh.relationship("material:binding").unwrap().targets, vec![path("/materials/b")]);
    }
}
