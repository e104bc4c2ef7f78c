// Re-export glam for convenience
pub use glam::*;

// BIF math types
mod transform;
pub use transform::{DMat4Ext, Mat4Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat4_creation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_dmat4_reexport() {
        let m = DMat4::IDENTITY;
        assert_eq!(m.x_axis, DVec4::X);
    }
}
