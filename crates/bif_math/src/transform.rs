// Transform utilities for Mat4
//
// Extends glam::Mat4 with the conversions needed to hand renderer matrices
// (single precision, column-major) to USD (double precision, row-vector
// convention where the translation sits in the last row).

use glam::{DMat4, Mat4};

/// Extension trait for Mat4 to provide USD-facing transform utilities
pub trait Mat4Ext {
    /// Widen to double precision, the only precision USD xformOps store.
    fn to_double(&self) -> DMat4;
}

impl Mat4Ext for Mat4 {
    fn to_double(&self) -> DMat4 {
        self.as_dmat4()
    }
}

/// Extension trait for DMat4 (the `matrix4d` value type)
pub trait DMat4Ext {
    /// Rows as USD writes them in `matrix4d` values.
    ///
    /// USD multiplies row vectors, so each USD row is one glam column.
    fn to_usd_rows(&self) -> [[f64; 4]; 4];
}

impl DMat4Ext for DMat4 {
    fn to_usd_rows(&self) -> [[f64; 4]; 4] {
        self.to_cols_array_2d()
    }
}
