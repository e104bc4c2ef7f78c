//! USD value types, values and prim paths.
//!
//! These mirror the subset of `Sdf` the translators write: scalar and array
//! attribute types, the `uniform` variability flag and absolute prim paths.

use std::fmt;

use bif_math::{DMat4, DMat4Ext, Mat4Ext, Vec2, Vec3, Vec4};

use crate::error::{ExportError, ExportResult};

/// An absolute prim path (e.g. `/World/mesh`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SdfPath(String);

impl SdfPath {
    /// Parse and validate an absolute prim path.
    pub fn new(path: &str) -> ExportResult<Self> {
        if path == "/" {
            return Ok(Self::root());
        }
        if !path.starts_with('/') || path.ends_with('/') {
            return Err(ExportError::InvalidPath(path.to_string()));
        }
        if !path[1..].split('/').all(is_valid_identifier) {
            return Err(ExportError::InvalidPath(path.to_string()));
        }
        Ok(Self(path.to_string()))
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path component (empty for the root).
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Parent path; `None` for the root.
    pub fn parent(&self) -> Option<SdfPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(i) => Some(Self(self.0[..i].to_string())),
            None => None,
        }
    }

    /// Child path. The child name must be a valid identifier.
    pub fn child(&self, name: &str) -> ExportResult<SdfPath> {
        if !is_valid_identifier(name) {
            return Err(ExportError::InvalidPath(format!("{}/{}", self.0, name)));
        }
        if self.is_root() {
            Ok(Self(format!("/{}", name)))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// Concatenate an absolute path below this one (`/materials` + `/a/b`).
    pub fn join(&self, absolute: &SdfPath) -> SdfPath {
        if self.is_root() {
            absolute.clone()
        } else if absolute.is_root() {
            self.clone()
        } else {
            Self(format!("{}{}", self.0, absolute.0))
        }
    }
}

impl fmt::Display for SdfPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether a field may vary over time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Variability {
    #[default]
    Varying,
    Uniform,
}

/// Attribute value type names (`SdfValueTypeNames`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    UChar,
    Int,
    UInt,
    Float,
    String,
    Token,
    Matrix4d,
    Color3f,
    Color4f,
    Vector3f,
    Float2,
    BoolArray,
    UCharArray,
    IntArray,
    UIntArray,
    FloatArray,
    StringArray,
    TokenArray,
    Matrix4dArray,
    Color3fArray,
    Color4fArray,
    Vector3fArray,
    Float2Array,
}

impl ValueType {
    /// Type name as written in USDA.
    pub fn usda_name(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::UChar => "uchar",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Token => "token",
            ValueType::Matrix4d => "matrix4d",
            ValueType::Color3f => "color3f",
            ValueType::Color4f => "color4f",
            ValueType::Vector3f => "vector3f",
            ValueType::Float2 => "float2",
            ValueType::BoolArray => "bool[]",
            ValueType::UCharArray => "uchar[]",
            ValueType::IntArray => "int[]",
            ValueType::UIntArray => "uint[]",
            ValueType::FloatArray => "float[]",
            ValueType::StringArray => "string[]",
            ValueType::TokenArray => "token[]",
            ValueType::Matrix4dArray => "matrix4d[]",
            ValueType::Color3fArray => "color3f[]",
            ValueType::Color4fArray => "color4f[]",
            ValueType::Vector3fArray => "vector3f[]",
            ValueType::Float2Array => "float2[]",
        }
    }
}

/// A typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    UChar(u8),
    Int(i32),
    UInt(u32),
    Float(f32),
    String(String),
    Token(String),
    Matrix4d(DMat4),
    Color3f(Vec3),
    Color4f(Vec4),
    Vector3f(Vec3),
    Float2(Vec2),
    BoolArray(Vec<bool>),
    UCharArray(Vec<u8>),
    IntArray(Vec<i32>),
    UIntArray(Vec<u32>),
    FloatArray(Vec<f32>),
    StringArray(Vec<String>),
    TokenArray(Vec<String>),
    Matrix4dArray(Vec<DMat4>),
    Color3fArray(Vec<Vec3>),
    Color4fArray(Vec<Vec4>),
    Vector3fArray(Vec<Vec3>),
    Float2Array(Vec<Vec2>),
}

impl Value {
    pub fn ty(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::UChar(_) => ValueType::UChar,
            Value::Int(_) => ValueType::Int,
            Value::UInt(_) => ValueType::UInt,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Token(_) => ValueType::Token,
            Value::Matrix4d(_) => ValueType::Matrix4d,
            Value::Color3f(_) => ValueType::Color3f,
            Value::Color4f(_) => ValueType::Color4f,
            Value::Vector3f(_) => ValueType::Vector3f,
            Value::Float2(_) => ValueType::Float2,
            Value::BoolArray(_) => ValueType::BoolArray,
            Value::UCharArray(_) => ValueType::UCharArray,
            Value::IntArray(_) => ValueType::IntArray,
            Value::UIntArray(_) => ValueType::UIntArray,
            Value::FloatArray(_) => ValueType::FloatArray,
            Value::StringArray(_) => ValueType::StringArray,
            Value::TokenArray(_) => ValueType::TokenArray,
            Value::Matrix4dArray(_) => ValueType::Matrix4dArray,
            Value::Color3fArray(_) => ValueType::Color3fArray,
            Value::Color4fArray(_) => ValueType::Color4fArray,
            Value::Vector3fArray(_) => ValueType::Vector3fArray,
            Value::Float2Array(_) => ValueType::Float2Array,
        }
    }

    /// Value as written in USDA.
    pub fn to_usda(&self) -> String {
        match self {
            Value::Bool(b) => usda_bool(*b),
            Value::UChar(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(s) | Value::Token(s) => usda_string(s),
            Value::Matrix4d(m) => usda_matrix(m),
            Value::Color3f(v) | Value::Vector3f(v) => usda_vec3(*v),
            Value::Color4f(v) => format!("({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Value::Float2(v) => format!("({}, {})", v.x, v.y),
            Value::BoolArray(v) => usda_list(v, |b| usda_bool(*b)),
            Value::UCharArray(v) => usda_list(v, u8::to_string),
            Value::IntArray(v) => usda_list(v, i32::to_string),
            Value::UIntArray(v) => usda_list(v, u32::to_string),
            Value::FloatArray(v) => usda_list(v, f32::to_string),
            Value::StringArray(v) | Value::TokenArray(v) => usda_list(v, |s| usda_string(s)),
            Value::Matrix4dArray(v) => usda_list(v, usda_matrix),
            Value::Color3fArray(v) | Value::Vector3fArray(v) => usda_list(v, |x| usda_vec3(*x)),
            Value::Color4fArray(v) => {
                usda_list(v, |x| format!("({}, {}, {}, {})", x.x, x.y, x.z, x.w))
            }
            Value::Float2Array(v) => usda_list(v, |x| format!("({}, {})", x.x, x.y)),
        }
    }
}

fn usda_bool(b: bool) -> String {
    let s = if b { "1" } else { "0" };
    s.to_string()
}

fn usda_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

fn usda_vec3(v: Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

fn usda_matrix(m: &DMat4) -> String {
    let rows: Vec<String> = m
        .to_usd_rows()
        .iter()
        .map(|r| format!("({}, {}, {}, {})", r[0], r[1], r[2], r[3]))
        .collect();
    format!("( {} )", rows.join(", "))
}

fn usda_list<T>(items: &[T], fmt: impl Fn(&T) -> String) -> String {
    let items: Vec<String> = items.iter().map(fmt).collect();
    format!("[{}]", items.join(", "))
}

/// Widen a renderer matrix for a `matrix4d` field.
pub fn matrix4d(m: bif_math::Mat4) -> Value {
    Value::Matrix4d(m.to_double())
}
