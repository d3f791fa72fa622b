//! Analytical 3×3 SVD decomposition
//!
//! Computes A = U · diag(S) · Vᵀ for a 3×3 matrix using the Jacobi
//! eigenvalue algorithm on AᵀA (symmetric positive semi-definite).
//!
//! All matrices use row-major layout: `m[row][col]`.
//!
//! V is always right-handed. U is not: for a full-rank input its handedness
//! follows from A, which is exactly what the Kabsch reflection test reads.

use super::Mat3;

/// Upper bound on cyclic Jacobi sweeps; 3×3 inputs converge in a handful
const MAX_SWEEPS: usize = 50;

/// Singular values below `RANK_EPS * s[0]` are treated as zero
const RANK_EPS: f64 = 1e-12;

/// Result of 3×3 SVD decomposition: A = U · diag(S) · Vᵀ
#[derive(Debug, Clone, PartialEq)]
pub struct Svd3 {
    /// Left singular vectors (orthogonal, row-major)
    pub u: Mat3,
    /// Singular values (sorted descending, non-negative)
    pub s: [f64; 3],
    /// Right singular vectors transposed (orthogonal, row-major)
    pub vt: Mat3,
}

/// Compute the SVD of a row-major 3×3 matrix
pub fn svd3(a: &Mat3) -> Svd3 {
    // 1. AᵀA is symmetric positive semi-definite
    let ata = mat_mul_ata(a);

    // 2. Its eigenvectors are the right singular vectors
    let (eigenvalues, eigvec_cols) = jacobi_eigen_3x3(&ata);

    // 3. Sort by descending eigenvalue
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| eigenvalues[j].total_cmp(&eigenvalues[i]));
    let mut v_cols = order.map(|i| eigvec_cols[i]);

    if triple_product(&v_cols[0], &v_cols[1], &v_cols[2]) < 0.0 {
        v_cols[2] = negate(&v_cols[2]);
    }

    // 4. σᵢ = |A·vᵢ| is more accurate than sqrt(λᵢ) for small values
    let av = v_cols.map(|v| mat_vec_mul(a, &v));
    let sigma = av.map(|w| norm(&w));
    let u_cols = left_singular_vectors(&av, &sigma);

    // 5. Assemble row-major outputs: U has u_cols as columns, Vᵀ has v_cols as rows
    let mut u = [[0.0f64; 3]; 3];
    for (col, u_col) in u_cols.iter().enumerate() {
        for row in 0..3 {
            u[row][col] = u_col[row];
        }
    }

    Svd3 {
        u,
        s: sigma,
        vt: v_cols,
    }
}

/// Build an orthonormal U from the images A·vᵢ.
///
/// Columns belonging to (numerically) zero singular values are completed
/// so that U stays orthonormal. The third column keeps the orientation of
/// A·v₂ whenever σ₂ is significant.
fn left_singular_vectors(av: &[[f64; 3]; 3], sigma: &[f64; 3]) -> [[f64; 3]; 3] {
    if sigma[0] <= f64::MIN_POSITIVE {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let tol = sigma[0] * RANK_EPS;

    let u0 = scale(&av[0], 1.0 / sigma[0]);

    // Gram-Schmidt against u0 guards against drift in nearly degenerate inputs
    let w1 = sub(&av[1], &scale(&u0, dot(&u0, &av[1])));
    let w1_len = norm(&w1);
    let u1 = if w1_len > tol {
        scale(&w1, 1.0 / w1_len)
    } else {
        arbitrary_perpendicular(&u0)
    };

    let mut u2 = cross(&u0, &u1);
    normalize(&mut u2);
    if sigma[2] > tol && dot(&u2, &av[2]) < 0.0 {
        u2 = negate(&u2);
    }

    [u0, u1, u2]
}

// ============================================================================
// Internal helpers
// ============================================================================

/// (AᵀA)_{ij} = Σ_k A_{ki}·A_{kj}
fn mat_mul_ata(a: &Mat3) -> Mat3 {
    let mut result = [[0.0f64; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = a[0][i] * a[0][j] + a[1][i] * a[1][j] + a[2][i] * a[2][j];
        }
    }
    result
}

fn mat_vec_mul(a: &Mat3, v: &[f64; 3]) -> [f64; 3] {
    [
        a[0][0] * v[0] + a[0][1] * v[1] + a[0][2] * v[2],
        a[1][0] * v[0] + a[1][1] * v[1] + a[1][2] * v[2],
        a[2][0] * v[0] + a[2][1] * v[1] + a[2][2] * v[2],
    ]
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

fn scale(v: &[f64; 3], factor: f64) -> [f64; 3] {
    [v[0] * factor, v[1] * factor, v[2] * factor]
}

fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn negate(v: &[f64; 3]) -> [f64; 3] {
    [-v[0], -v[1], -v[2]]
}

fn triple_product(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    dot(a, &cross(b, c))
}

fn normalize(v: &mut [f64; 3]) {
    let len = norm(v);
    if len > 1e-300 {
        v[0] /= len;
        v[1] /= len;
        v[2] /= len;
    }
}

fn arbitrary_perpendicular(v: &[f64; 3]) -> [f64; 3] {
    let candidate = if v[0].abs() < v[1].abs() && v[0].abs() < v[2].abs() {
        [1.0, 0.0, 0.0]
    } else if v[1].abs() < v[2].abs() {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    let mut perp = cross(v, &candidate);
    normalize(&mut perp);
    perp
}

/// Jacobi eigenvalue algorithm for symmetric 3×3 matrices.
///
/// Returns (eigenvalues, eigenvector_columns).
fn jacobi_eigen_3x3(m: &Mat3) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut a = *m;
    let mut v = [[1.0f64, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..MAX_SWEEPS {
        let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        let diag = a[0][0] * a[0][0] + a[1][1] * a[1][1] + a[2][2] * a[2][2];
        if off <= f64::EPSILON * f64::EPSILON * diag {
            break;
        }

        for &(p, q) in &[(0usize, 1usize), (0, 2), (1, 2)] {
            if a[p][q] == 0.0 {
                continue;
            }
            jacobi_rotate(&mut a, &mut v, p, q);
        }
    }

    let eigenvalues = [a[0][0], a[1][1], a[2][2]];
    let eigvec_cols = [
        [v[0][0], v[1][0], v[2][0]],
        [v[0][1], v[1][1], v[2][1]],
        [v[0][2], v[1][2], v[2][2]],
    ];

    (eigenvalues, eigvec_cols)
}

/// Apply a single Jacobi rotation to eliminate a[p][q].
fn jacobi_rotate(a: &mut Mat3, v: &mut Mat3, p: usize, q: usize) {
    let app = a[p][p];
    let aqq = a[q][q];
    let apq = a[p][q];

    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;

    // A' = GᵀAG with G the Givens rotation in the (p,q) plane
    a[p][p] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
    a[q][q] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
    a[p][q] = 0.0;
    a[q][p] = 0.0;

    let r = 3 - p - q;
    let arp = a[r][p];
    let arq = a[r][q];
    a[r][p] = c * arp - s * arq;
    a[p][r] = a[r][p];
    a[r][q] = s * arp + c * arq;
    a[q][r] = a[r][q];

    // V' = V · G
    for row in v.iter_mut() {
        let vip = row[p];
        let viq = row[q];
        row[p] = c * vip - s * viq;
        row[q] = s * vip + c * viq;
    }
}
