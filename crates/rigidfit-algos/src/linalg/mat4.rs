//! 4×4 and 3×3 row-major matrix utilities
//!
//! Homogeneous transformation helpers. `Mat4::data` is read as row-major
//! (`data[row * 4 + col]`), so a point (x, y, z, 1) is transformed as a
//! column vector on the right.

use lin_alg::f64::{Mat4, Vec3};

use super::Mat3;

/// Expand a 3×3 row-major matrix into a 4×4 homogeneous Mat4
///
/// Top-left 3×3 from `m`, column 3 = 0, row 3 = [0,0,0,1].
pub fn mat3x3_to_mat4(m: &Mat3) -> Mat4 {
    Mat4 {
        data: [
            m[0][0], m[0][1], m[0][2], 0.0, // row 0
            m[1][0], m[1][1], m[1][2], 0.0, // row 1
            m[2][0], m[2][1], m[2][2], 0.0, // row 2
            0.0, 0.0, 0.0, 1.0, // row 3
        ],
    }
}

/// Homogeneous translation by `t`: identity with `t` in column 3
pub fn translation_mat4(t: Vec3) -> Mat4 {
    Mat4 {
        data: [
            1.0, 0.0, 0.0, t.x, // row 0
            0.0, 1.0, 0.0, t.y, // row 1
            0.0, 0.0, 1.0, t.z, // row 2
            0.0, 0.0, 0.0, 1.0, // row 3
        ],
    }
}

/// Left-multiply: result = left * right (row-major 4×4)
pub fn left_multiply_mat4(left: &Mat4, right: &Mat4) -> Mat4 {
    let l = &left.data;
    let r = &right.data;
    let mut out = [0.0f64; 16];
    for row in 0..4 {
        for col in 0..4 {
            out[row * 4 + col] = l[row * 4] * r[col]
                + l[row * 4 + 1] * r[4 + col]
                + l[row * 4 + 2] * r[8 + col]
                + l[row * 4 + 3] * r[12 + col];
        }
    }
    Mat4 { data: out }
}

/// 3×3 matrix product: result = a * b
pub fn mat3_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0f64; 3]; 3];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, value) in out_row.iter_mut().enumerate() {
            *value = a[row][0] * b[0][col] + a[row][1] * b[1][col] + a[row][2] * b[2][col];
        }
    }
    out
}

pub fn transpose3(m: &Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Determinant of a 3×3 matrix (cofactor expansion along row 0)
pub fn det3(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::IDENTITY3;

    const ROT_Z_90: Mat3 = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn test_mat3x3_to_mat4() {
        let m3 = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let m4 = mat3x3_to_mat4(&m3);
        assert_eq!(m4.data[0], 1.0);
        assert_eq!(m4.data[1], 2.0); // row-major
        assert_eq!(m4.data[3], 0.0); // col 3
        assert_eq!(m4.data[12], 0.0); // row 3
        assert_eq!(m4.data[15], 1.0); // [3][3]
    }

    #[test]
    fn test_left_multiply_identity() {
        let id = Mat4::new_identity();
        let m = Mat4 {
            data: [
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 0.0, 0.0, 0.0,
                1.0,
            ],
        };
        let result = left_multiply_mat4(&id, &m);
        for i in 0..16 {
            assert!(
                (result.data[i] - m.data[i]).abs() < 1e-12,
                "mismatch at index {i}"
            );
        }
    }

    #[test]
    fn test_left_multiply_order() {
        // Translate after rotating: the translation column is left untouched
        let rotate = mat3x3_to_mat4(&ROT_Z_90);
        let translate = translation_mat4(Vec3::new(5.0, 0.0, 0.0));
        let combined = left_multiply_mat4(&translate, &rotate);
        assert_eq!(&combined.data[0..4], &[0.0, -1.0, 0.0, 5.0]);
        assert_eq!(&combined.data[4..8], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&combined.data[8..12], &[0.0, 0.0, 1.0, 0.0]);

        // Rotating after translating rotates the translation too
        let combined = left_multiply_mat4(&rotate, &translate);
        assert_eq!(combined.data[3], 0.0);
        assert_eq!(combined.data[7], 5.0);
        assert_eq!(combined.data[11], 0.0);
    }

    #[test]
    fn test_translation_mat4() {
        let m = translation_mat4(Vec3::new(5.0, -1.0, 2.0));
        assert_eq!(
            m.data,
            [
                1.0, 0.0, 0.0, 5.0, //
                0.0, 1.0, 0.0, -1.0, //
                0.0, 0.0, 1.0, 2.0, //
                0.0, 0.0, 0.0, 1.0,
            ]
        );
    }

    #[test]
    fn test_det3() {
        assert_eq!(det3(&IDENTITY3), 1.0);
        assert_eq!(det3(&ROT_Z_90), 1.0);
        let mirror = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        assert_eq!(det3(&mirror), -1.0);
        let singular = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]];
        assert_eq!(det3(&singular), 0.0);
    }

    #[test]
    fn test_mat3_mul_transpose_of_rotation_is_inverse() {
        let prod = mat3_mul(&ROT_Z_90, &transpose3(&ROT_Z_90));
        assert_eq!(prod, IDENTITY3);
    }
}
