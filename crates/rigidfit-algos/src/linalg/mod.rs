//! Linear algebra utilities
//!
//! Small dense matrix routines used by the rotation solver and the
//! affine transformation:
//!
//! - [`svd3`] — Analytical 3×3 SVD decomposition (Jacobi eigenvalue method)
//! - [`mat4`] — 4×4 / 3×3 row-major matrix operations (homogeneous embedding, product, determinant)

pub mod mat4;
pub mod svd3;

pub use mat4::{det3, left_multiply_mat4, mat3_mul, mat3x3_to_mat4, translation_mat4, transpose3};
pub use svd3::{svd3, Svd3};

/// Row-major 3×3 matrix: `m[row][col]`
pub type Mat3 = [[f64; 3]; 3];

/// The 3×3 identity matrix
pub const IDENTITY3: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
