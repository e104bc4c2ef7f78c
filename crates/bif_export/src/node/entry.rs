//! Node entries: the parameter schema shared by every node of one type.

use bif_math::{Mat4, Vec2, Vec3};

use super::value::{ArrayValue, AttrType, AttrValue, ElemType};
use super::NodeKind;

/// A declared parameter with its schema default.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: AttrType,
    pub default: AttrValue,
}

impl ParamDecl {
    /// Declare a parameter whose type is taken from its default.
    pub fn new(name: impl Into<String>, default: impl Into<AttrValue>) -> Self {
        let default = default.into();
        Self {
            name: name.into(),
            ty: default.ty(),
            default,
        }
    }

    /// Declare an unset node pointer.
    pub fn node(name: impl Into<String>) -> Self {
        Self::new(name, AttrValue::Node(None))
    }

    /// Declare an array parameter defaulting to empty.
    pub fn array(name: impl Into<String>, elem: ElemType) -> Self {
        Self::new(name, ArrayValue::empty(elem))
    }
}

/// The schema of a node type (`polymesh`, `ginstance`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEntry {
    /// Entry name as the renderer knows it
    pub name: String,

    /// Classifier used to decide spatial and binding writes
    pub kind: NodeKind,

    /// Declared parameters, in schema order
    pub params: Vec<ParamDecl>,
}

impl NodeEntry {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
        }
    }

    /// Append a parameter declaration.
    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Find a declared parameter by name.
    pub fn lookup(&self, name: &str) -> Option<&ParamDecl> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Look up one of the built-in entries by name.
    pub fn builtin(name: &str) -> Option<Self> {
        let entry = match name {
            "polymesh" => Self::polymesh(),
            "ginstance" => Self::ginstance(),
            "persp_camera" => Self::persp_camera(),
            "point_light" => Self::point_light(),
            "standard_surface" => Self::standard_surface(),
            "options" => Self::options(),
            "driver_exr" => Self::driver_exr(),
            _ => return None,
        };
        Some(entry)
    }

    /// Parameters every shape carries.
    fn shape(name: &str, kind: NodeKind) -> Self {
        Self::new(name, kind)
            .with_param(ParamDecl::new("matrix", Mat4::IDENTITY))
            .with_param(ParamDecl::new("visibility", 255u8))
            .with_param(ParamDecl::new("sidedness", 255u8))
            .with_param(ParamDecl::new("matte", false))
            .with_param(ParamDecl::new("receive_shadows", true))
            .with_param(ParamDecl::new("self_shadows", true))
            .with_param(ParamDecl::new("invert_normals", false))
            .with_param(ParamDecl::new("opaque", true))
            .with_param(ParamDecl::node("shader"))
            .with_param(ParamDecl::node("disp_map"))
    }

    pub fn polymesh() -> Self {
        Self::shape("polymesh", NodeKind::Shape)
            .with_param(ParamDecl::array("nsides", ElemType::UInt))
            .with_param(ParamDecl::array("vidxs", ElemType::UInt))
            .with_param(ParamDecl::array("vlist", ElemType::Vector))
            .with_param(ParamDecl::new("subdiv_type", AttrValue::Enum("none".into())))
            .with_param(ParamDecl::new("subdiv_iterations", 1u8))
            .with_param(ParamDecl::new("smoothing", false))
    }

    pub fn ginstance() -> Self {
        Self::shape("ginstance", NodeKind::Instance)
            .with_param(ParamDecl::node("node"))
            .with_param(ParamDecl::new("inherit_xform", true))
    }

    pub fn persp_camera() -> Self {
        Self::new("persp_camera", NodeKind::Camera)
            .with_param(ParamDecl::new("matrix", Mat4::IDENTITY))
            .with_param(ParamDecl::new("fov", 54.0f32))
            .with_param(ParamDecl::new("near_clip", 0.0001f32))
            .with_param(ParamDecl::new("far_clip", 1.0e30f32))
            .with_param(ParamDecl::new(
                "screen_window_min",
                AttrValue::Vector2(Vec2::new(-1.0, -1.0)),
            ))
            .with_param(ParamDecl::new(
                "screen_window_max",
                AttrValue::Vector2(Vec2::new(1.0, 1.0)),
            ))
    }

    pub fn point_light() -> Self {
        Self::new("point_light", NodeKind::Light)
            .with_param(ParamDecl::new("matrix", Mat4::IDENTITY))
            .with_param(ParamDecl::new("color", AttrValue::Rgb(Vec3::ONE)))
            .with_param(ParamDecl::new("intensity", 1.0f32))
            .with_param(ParamDecl::new("exposure", 0.0f32))
            .with_param(ParamDecl::new("radius", 0.0f32))
            .with_param(ParamDecl::new("cast_shadows", true))
    }

    pub fn standard_surface() -> Self {
        Self::new("standard_surface", NodeKind::Generic)
            .with_param(ParamDecl::new("base", 0.8f32))
            .with_param(ParamDecl::new("base_color", AttrValue::Rgb(Vec3::ONE)))
            .with_param(ParamDecl::new("metalness", 0.0f32))
            .with_param(ParamDecl::new("specular_roughness", 0.2f32))
            .with_param(ParamDecl::new("emission_color", AttrValue::Rgb(Vec3::ONE)))
    }

    pub fn options() -> Self {
        Self::new("options", NodeKind::Generic)
            .with_param(ParamDecl::new("AA_samples", 1i32))
            .with_param(ParamDecl::new("xres", 320i32))
            .with_param(ParamDecl::new("yres", 240i32))
            .with_param(ParamDecl::node("camera"))
            .with_param(ParamDecl::array("outputs", ElemType::String))
    }

    pub fn driver_exr() -> Self {
        Self::new("driver_exr", NodeKind::Generic)
            .with_param(ParamDecl::new("filename", "output.exr"))
            .with_param(ParamDecl::new("compression", AttrValue::Enum("zip".into())))
            .with_param(ParamDecl::new("half_precision", false))
    }
}
