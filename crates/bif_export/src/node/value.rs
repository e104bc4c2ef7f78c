//! Typed attribute values on renderer nodes.

use bif_math::{Mat4, Vec2, Vec3, Vec4};

use super::NodeId;

/// Element type of an array attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElemType {
    Boolean,
    Byte,
    Int,
    UInt,
    Float,
    Rgb,
    Rgba,
    Vector,
    Vector2,
    String,
    Matrix,
    Node,
}

/// Declared type of a node parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrType {
    Boolean,
    Byte,
    Int,
    UInt,
    Float,
    Rgb,
    Rgba,
    Vector,
    Vector2,
    String,
    /// One of a fixed set of string choices
    Enum,
    Matrix,
    /// Non-owning reference to another node
    Node,
    /// Shader closure; carries no storable value
    Closure,
    Array(ElemType),
}

/// A homogeneous array value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValue {
    Boolean(Vec<bool>),
    Byte(Vec<u8>),
    Int(Vec<i32>),
    UInt(Vec<u32>),
    Float(Vec<f32>),
    Rgb(Vec<Vec3>),
    Rgba(Vec<Vec4>),
    Vector(Vec<Vec3>),
    Vector2(Vec<Vec2>),
    String(Vec<String>),
    Matrix(Vec<Mat4>),
    Node(Vec<Option<NodeId>>),
}

impl ArrayValue {
    pub fn elem_type(&self) -> ElemType {
        match self {
            ArrayValue::Boolean(_) => ElemType::Boolean,
            ArrayValue::Byte(_) => ElemType::Byte,
            ArrayValue::Int(_) => ElemType::Int,
            ArrayValue::UInt(_) => ElemType::UInt,
            ArrayValue::Float(_) => ElemType::Float,
            ArrayValue::Rgb(_) => ElemType::Rgb,
            ArrayValue::Rgba(_) => ElemType::Rgba,
            ArrayValue::Vector(_) => ElemType::Vector,
            ArrayValue::Vector2(_) => ElemType::Vector2,
            ArrayValue::String(_) => ElemType::String,
            ArrayValue::Matrix(_) => ElemType::Matrix,
            ArrayValue::Node(_) => ElemType::Node,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Boolean(v) => v.len(),
            ArrayValue::Byte(v) => v.len(),
            ArrayValue::Int(v) => v.len(),
            ArrayValue::UInt(v) => v.len(),
            ArrayValue::Float(v) => v.len(),
            ArrayValue::Rgb(v) | ArrayValue::Vector(v) => v.len(),
            ArrayValue::Rgba(v) => v.len(),
            ArrayValue::Vector2(v) => v.len(),
            ArrayValue::String(v) => v.len(),
            ArrayValue::Matrix(v) => v.len(),
            ArrayValue::Node(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty array of the given element type.
    pub fn empty(elem: ElemType) -> Self {
        match elem {
            ElemType::Boolean => ArrayValue::Boolean(Vec::new()),
            ElemType::Byte => ArrayValue::Byte(Vec::new()),
            ElemType::Int => ArrayValue::Int(Vec::new()),
            ElemType::UInt => ArrayValue::UInt(Vec::new()),
            ElemType::Float => ArrayValue::Float(Vec::new()),
            ElemType::Rgb => ArrayValue::Rgb(Vec::new()),
            ElemType::Rgba => ArrayValue::Rgba(Vec::new()),
            ElemType::Vector => ArrayValue::Vector(Vec::new()),
            ElemType::Vector2 => ArrayValue::Vector2(Vec::new()),
            ElemType::String => ArrayValue::String(Vec::new()),
            ElemType::Matrix => ArrayValue::Matrix(Vec::new()),
            ElemType::Node => ArrayValue::Node(Vec::new()),
        }
    }
}

/// A typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Boolean(bool),
    Byte(u8),
    Int(i32),
    UInt(u32),
    Float(f32),
    Rgb(Vec3),
    Rgba(Vec4),
    Vector(Vec3),
    Vector2(Vec2),
    String(String),
    Enum(String),
    Matrix(Mat4),
    Node(Option<NodeId>),
    Closure,
    Array(ArrayValue),
}

impl AttrValue {
    /// The type this value satisfies.
    pub fn ty(&self) -> AttrType {
        match self {
            AttrValue::Boolean(_) => AttrType::Boolean,
            AttrValue::Byte(_) => AttrType::Byte,
            AttrValue::Int(_) => AttrType::Int,
            AttrValue::UInt(_) => AttrType::UInt,
            AttrValue::Float(_) => AttrType::Float,
            AttrValue::Rgb(_) => AttrType::Rgb,
            AttrValue::Rgba(_) => AttrType::Rgba,
            AttrValue::Vector(_) => AttrType::Vector,
            AttrValue::Vector2(_) => AttrType::Vector2,
            AttrValue::String(_) => AttrType::String,
            AttrValue::Enum(_) => AttrType::Enum,
            AttrValue::Matrix(_) => AttrType::Matrix,
            AttrValue::Node(_) => AttrType::Node,
            AttrValue::Closure => AttrType::Closure,
            AttrValue::Array(a) => AttrType::Array(a.elem_type()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self {
            AttrValue::Byte(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<Mat4> {
        match self {
            AttrValue::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    /// Referenced node, if this is a set node pointer.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            AttrValue::Node(id) => *id,
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Boolean(v)
    }
}

impl From<u8> for AttrValue {
    fn from(v: u8) -> Self {
        AttrValue::Byte(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::UInt(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<Mat4> for AttrValue {
    fn from(v: Mat4) -> Self {
        AttrValue::Matrix(v)
    }
}

impl From<NodeId> for AttrValue {
    fn from(v: NodeId) -> Self {
        AttrValue::Node(Some(v))
    }
}

impl From<ArrayValue> for AttrValue {
    fn from(v: ArrayValue) -> Self {
        AttrValue::Array(v)
    }
}
