//! Coordinate access for raw arrays and structure-like containers
//!
//! Anything that can hand out its coordinates as an (n,3) or (m,n,3) array
//! and rebuild itself around a replacement array can be superimposed. Raw
//! `ndarray` arrays and point lists implement [`Coordinates`] here; atom
//! containers from other crates implement it themselves.

use ndarray::{Array2, Array3, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix2, Ix3};

use crate::error::{AlignError, AlignResult};

/// Capability to expose and replace a coordinate payload.
///
/// `coord()` must return a rank-2 (n,3) or rank-3 (m,n,3) array.
/// `with_coord()` receives an array of exactly that shape and returns a
/// copy of `self` in which only the coordinates differ.
pub trait Coordinates: Sized {
    /// The coordinate payload
    fn coord(&self) -> ArrayViewD<'_, f64>;

    /// Copy of `self` carrying `coord` instead of the current coordinates
    fn with_coord(&self, coord: ArrayD<f64>) -> AlignResult<Self>;
}

impl Coordinates for ArrayD<f64> {
    fn coord(&self) -> ArrayViewD<'_, f64> {
        self.view()
    }

    fn with_coord(&self, coord: ArrayD<f64>) -> AlignResult<Self> {
        Ok(coord)
    }
}

impl Coordinates for Array2<f64> {
    fn coord(&self) -> ArrayViewD<'_, f64> {
        self.view().into_dyn()
    }

    fn with_coord(&self, coord: ArrayD<f64>) -> AlignResult<Self> {
        let ndim = coord.ndim();
        coord
            .into_dimensionality::<Ix2>()
            .map_err(|_| AlignError::InvalidRank(ndim))
    }
}

impl Coordinates for Array3<f64> {
    fn coord(&self) -> ArrayViewD<'_, f64> {
        self.view().into_dyn()
    }

    fn with_coord(&self, coord: ArrayD<f64>) -> AlignResult<Self> {
        let ndim = coord.ndim();
        coord
            .into_dimensionality::<Ix3>()
            .map_err(|_| AlignError::InvalidRank(ndim))
    }
}

/// A single model given as a list of points
impl Coordinates for Vec<[f64; 3]> {
    fn coord(&self) -> ArrayViewD<'_, f64> {
        ArrayView2::from(self.as_slice()).into_dyn()
    }

    fn with_coord(&self, coord: ArrayD<f64>) -> AlignResult<Self> {
        let ndim = coord.ndim();
        let coord = coord
            .into_dimensionality::<Ix2>()
            .map_err(|_| AlignError::InvalidRank(ndim))?;
        if coord.ncols() != 3 {
            return Err(AlignError::NotCartesian(coord.ncols()));
        }
        Ok(coord.rows().into_iter().map(|p| [p[0], p[1], p[2]]).collect())
    }
}

/// Normalize coordinates to a model stack of shape (m,n,3).
///
/// A single model (n,3) becomes (1,n,3). Always returns an owned copy.
pub fn to_batch(coord: ArrayViewD<'_, f64>) -> AlignResult<Array3<f64>> {
    let ndim = coord.ndim();
    if !(2..=3).contains(&ndim) {
        return Err(AlignError::InvalidRank(ndim));
    }
    let width = coord.shape()[ndim - 1];
    if width != 3 {
        return Err(AlignError::NotCartesian(width));
    }

    let coord = if ndim == 2 {
        coord.insert_axis(Axis(0))
    } else {
        coord
    };
    coord
        .into_dimensionality::<Ix3>()
        .map(|c| c.to_owned())
        .map_err(|_| AlignError::InvalidRank(ndim))
}

/// Undo [`to_batch`]: drop the model axis again if the caller passed a
/// single model (`ndim == 2`).
pub fn from_batch(batch: Array3<f64>, ndim: usize) -> ArrayD<f64> {
    if ndim == 2 && batch.len_of(Axis(0)) == 1 {
        batch.index_axis_move(Axis(0), 0).into_dyn()
    } else {
        batch.into_dyn()
    }
}

/// Per-model mean point of a stack, shape (m,3)
pub fn centroid(batch: ArrayView3<'_, f64>) -> AlignResult<Array2<f64>> {
    batch.mean_axis(Axis(1)).ok_or(AlignError::NoAtoms)
}
