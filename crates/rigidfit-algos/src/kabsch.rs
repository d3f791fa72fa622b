//! Kabsch algorithm for optimal rigid-body rotation
//!
//! Given stacks of corresponding 3D points that are already centered at the
//! origin, finds for every model the proper rotation that minimizes the RMSD
//! between the rotated mobile points and the fixed points.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis};

use crate::linalg::{det3, mat3_mul, svd3, Mat3};

/// Rotation matrices superimposing `mobile` onto `fixed`, shape (m,3,3).
///
/// Both stacks must be centered per model. Each model is solved
/// independently.
///
/// # Panics
///
/// Panics if `fixed` and `mobile` differ in shape.
pub fn rotation_matrices(fixed: ArrayView3<'_, f64>, mobile: ArrayView3<'_, f64>) -> Array3<f64> {
    assert_eq!(
        fixed.shape(),
        mobile.shape(),
        "fixed and mobile stacks must have the same shape"
    );

    let n_models = fixed.len_of(Axis(0));
    let mut rotations = Array3::zeros((n_models, 3, 3));

    for (model, ((fix, mob), mut out)) in fixed
        .outer_iter()
        .zip(mobile.outer_iter())
        .zip(rotations.outer_iter_mut())
        .enumerate()
    {
        let (rotation, reflected) = rotation_matrix(fix, mob);
        if reflected {
            log::trace!("Model {}: corrected improper SVD solution", model);
        }
        for (i, row) in rotation.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                out[[i, j]] = value;
            }
        }
    }

    rotations
}

/// Rotation for a single centered model.
///
/// Returns the rotation and whether the reflection correction was applied.
pub fn rotation_matrix(fixed: ArrayView2<'_, f64>, mobile: ArrayView2<'_, f64>) -> (Mat3, bool) {
    let h = cross_covariance(fixed, mobile);
    let mut svd = svd3(&h);

    // The product of signs, not either determinant alone
    let reflected = det3(&svd.u) * det3(&svd.vt) < 0.0;
    if reflected {
        for row in svd.u.iter_mut() {
            row[2] = -row[2];
        }
    }

    (mat3_mul(&svd.u, &svd.vt), reflected)
}

/// Cross-covariance H = Σ_k fixed_k ⊗ mobile_k, i.e. `H[i][j] = Σ_k fixed[k][i] · mobile[k][j]`
pub fn cross_covariance(fixed: ArrayView2<'_, f64>, mobile: ArrayView2<'_, f64>) -> Mat3 {
    let mut h = [[0.0f64; 3]; 3];
    for (f, m) in fixed.outer_iter().zip(mobile.outer_iter()) {
        for (i, row) in h.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value += f[i] * m[j];
            }
        }
    }
    h
}
