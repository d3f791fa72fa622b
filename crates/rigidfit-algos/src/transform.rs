//! Affine transformation produced by superimposition
//!
//! A transformation moves coordinates in three steps per model: add the
//! center translation (mobile centroid → origin), rotate, add the target
//! translation (origin → fixed centroid). The same mapping is available as
//! one 4×4 homogeneous matrix per model via [`AffineTransformation::as_matrix`].

use lin_alg::f64::{Mat4, Vec3};
use ndarray::{Array2, Array3, ArrayD, ArrayView1, ArrayView2, ArrayView3, Axis, Ix2, Ix3};

use crate::coord::{from_batch, to_batch, Coordinates};
use crate::error::{AlignError, AlignResult};
use crate::linalg::{left_multiply_mat4, mat3x3_to_mat4, translation_mat4, Mat3};

/// Rigid-body transformation for one or more models.
///
/// Immutable once constructed. Translations are stored as (m,3) and the
/// rotation as (m,3,3); a translation with a single row applies to every
/// model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineTransformation {
    center_translation: Array2<f64>,
    rotation: Array3<f64>,
    target_translation: Array2<f64>,
}

impl AffineTransformation {
    /// Create a transformation from arrays of any compatible rank.
    ///
    /// Translations of shape (3,) or (m,3) and rotations of shape (3,3) or
    /// (m,3,3) are accepted; missing leading axes are added with length 1.
    /// Leading dimensions are not compared here, a mismatch surfaces when
    /// the transformation is used.
    pub fn new(
        center_translation: ArrayD<f64>,
        rotation: ArrayD<f64>,
        target_translation: ArrayD<f64>,
    ) -> AlignResult<Self> {
        Ok(Self {
            center_translation: expand_vectors(center_translation)?,
            rotation: expand_matrices(rotation)?,
            target_translation: expand_vectors(target_translation)?,
        })
    }

    /// Create a transformation from arrays already in stacked form
    pub fn from_parts(
        center_translation: Array2<f64>,
        rotation: Array3<f64>,
        target_translation: Array2<f64>,
    ) -> Self {
        Self {
            center_translation,
            rotation,
            target_translation,
        }
    }

    /// Single-model transformation from plain vectors and a row-major rotation
    pub fn single(center_translation: [f64; 3], rotation: Mat3, target_translation: [f64; 3]) -> Self {
        Self {
            center_translation: Array2::from_shape_fn((1, 3), |(_, j)| center_translation[j]),
            rotation: Array3::from_shape_fn((1, 3, 3), |(_, i, j)| rotation[i][j]),
            target_translation: Array2::from_shape_fn((1, 3), |(_, j)| target_translation[j]),
        }
    }

    /// Transformation that leaves `n_models` models unchanged
    pub fn identity(n_models: usize) -> Self {
        Self {
            center_translation: Array2::zeros((n_models, 3)),
            rotation: Array3::from_shape_fn((n_models, 3, 3), |(_, i, j)| {
                if i == j {
                    1.0
                } else {
                    0.0
                }
            }),
            target_translation: Array2::zeros((n_models, 3)),
        }
    }

    /// Translation moving the mobile centroid into the origin, shape (m,3)
    pub fn center_translation(&self) -> ArrayView2<'_, f64> {
        self.center_translation.view()
    }

    /// Rotation matrices, shape (m,3,3)
    pub fn rotation(&self) -> ArrayView3<'_, f64> {
        self.rotation.view()
    }

    /// Translation moving the rotated coordinates onto the fixed centroid, shape (m,3)
    pub fn target_translation(&self) -> ArrayView2<'_, f64> {
        self.target_translation.view()
    }

    /// Number of models this transformation applies to
    pub fn n_models(&self) -> usize {
        self.rotation.len_of(Axis(0))
    }

    /// Apply the transformation to coordinates or a structure.
    ///
    /// Returns a transformed copy of the same kind and rank as `atoms`.
    /// The number of models in `atoms` must equal [`Self::n_models`].
    pub fn apply<C: Coordinates>(&self, atoms: &C) -> AlignResult<C> {
        let coord = atoms.coord();
        let ndim = coord.ndim();
        let batch = to_batch(coord)?;

        let n_models = self.n_models();
        let actual = batch.len_of(Axis(0));
        if actual != n_models {
            return Err(AlignError::model_count(n_models, actual));
        }
        let center = self.broadcast_translation(&self.center_translation)?;
        let target = self.broadcast_translation(&self.target_translation)?;

        let mut transformed = Array3::zeros(batch.raw_dim());
        for (model, (points, mut out)) in batch
            .outer_iter()
            .zip(transformed.outer_iter_mut())
            .enumerate()
        {
            let rotation = self.rotation.index_axis(Axis(0), model);
            let centered = &points + &center.row(model);
            out.assign(&(centered.dot(&rotation.t()) + &target.row(model)));
        }

        atoms.with_coord(from_batch(transformed, ndim))
    }

    /// Combined 4×4 homogeneous matrix per model, shape (m,4,4).
    ///
    /// Multiplying a matrix with (x, y, z, 1) gives the same point as
    /// [`Self::apply`] on (x, y, z) for that model.
    pub fn as_matrix(&self) -> AlignResult<Array3<f64>> {
        let center = self.broadcast_translation(&self.center_translation)?;
        let target = self.broadcast_translation(&self.target_translation)?;

        let mut matrices = Array3::zeros((self.n_models(), 4, 4));
        for (model, mut out) in matrices.outer_iter_mut().enumerate() {
            let m = homogeneous(
                self.rotation.index_axis(Axis(0), model),
                center.row(model),
                target.row(model),
            );
            for row in 0..4 {
                for col in 0..4 {
                    out[[row, col]] = m.data[row * 4 + col];
                }
            }
        }
        Ok(matrices)
    }

    /// View a translation as (m,3), repeating a single row for every model
    fn broadcast_translation<'a>(
        &self,
        translation: &'a Array2<f64>,
    ) -> AlignResult<ArrayView2<'a, f64>> {
        let n_models = self.n_models();
        translation
            .broadcast((n_models, 3))
            .ok_or_else(|| AlignError::model_count(n_models, translation.nrows()))
    }
}

/// T_target · R · T_center for one model
fn homogeneous(rotation: ArrayView2<'_, f64>, center: ArrayView1<'_, f64>, target: ArrayView1<'_, f64>) -> Mat4 {
    let r = [
        [rotation[[0, 0]], rotation[[0, 1]], rotation[[0, 2]]],
        [rotation[[1, 0]], rotation[[1, 1]], rotation[[1, 2]]],
        [rotation[[2, 0]], rotation[[2, 1]], rotation[[2, 2]]],
    ];
    let center_mat = translation_mat4(Vec3::new(center[0], center[1], center[2]));
    let target_mat = translation_mat4(Vec3::new(target[0], target[1], target[2]));
    left_multiply_mat4(&target_mat, &left_multiply_mat4(&mat3x3_to_mat4(&r), &center_mat))
}

/// Add leading axes until `array` has `n_dims` dimensions
fn expand_dims(mut array: ArrayD<f64>, n_dims: usize) -> AlignResult<ArrayD<f64>> {
    if array.ndim() > n_dims {
        return Err(AlignError::InvalidRank(array.ndim()));
    }
    while array.ndim() < n_dims {
        array = array.insert_axis(Axis(0));
    }
    Ok(array)
}

fn expand_vectors(array: ArrayD<f64>) -> AlignResult<Array2<f64>> {
    let array = expand_dims(array, 2)?;
    let width = array.shape()[1];
    if width != 3 {
        return Err(AlignError::NotCartesian(width));
    }
    array
        .into_dimensionality::<Ix2>()
        .map_err(|_| AlignError::InvalidRank(2))
}

fn expand_matrices(array: ArrayD<f64>) -> AlignResult<Array3<f64>> {
    let array = expand_dims(array, 3)?;
    for &width in &array.shape()[1..] {
        if width != 3 {
            return Err(AlignError::NotCartesian(width));
        }
    }
    array
        .into_dimensionality::<Ix3>()
        .map_err(|_| AlignError::InvalidRank(3))
}
