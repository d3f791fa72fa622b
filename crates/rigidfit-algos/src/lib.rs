//! Rigid-body superimposition of 3D coordinates
//!
//! This crate fits one set of atom coordinates onto another with the
//! Kabsch algorithm and describes the fit as an affine transformation:
//!
//! - [`superimpose`] - Find and apply the RMSD-minimizing rigid motion
//! - [`AffineTransformation`] - Center, rotate and translate coordinates
//! - [`rotation_matrices`] - Kabsch rotation for centered model stacks
//! - [`linalg`] - 3×3 SVD and homogeneous matrix helpers
//!
//! Coordinates are either a single model of shape (n,3) or a stack of
//! models of shape (m,n,3). Plain `ndarray` arrays work directly; other
//! containers opt in by implementing [`Coordinates`].
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use rigidfit_algos::{superimpose, AffineTransformation};
//!
//! let fixed = array![
//!     [0.0, 0.0, 0.0],
//!     [1.0, 0.0, 0.0],
//!     [0.0, 2.0, 0.0],
//!     [0.0, 0.0, 3.0],
//! ];
//!
//! // Move the structure away: rotate 90° about z, then shift
//! let rot_z = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
//! let shift = AffineTransformation::single([0.0; 3], rot_z, [5.0, -2.0, 1.0]);
//! let mobile = shift.apply(&fixed)?;
//!
//! let (fitted, transformation) = superimpose(&fixed, &mobile, None)?;
//! for (a, b) in fitted.iter().zip(fixed.iter()) {
//!     assert!((a - b).abs() < 1e-9);
//! }
//! assert_eq!(transformation.as_matrix()?.shape(), &[1, 4, 4]);
//! # Ok::<(), rigidfit_algos::AlignError>(())
//! ```

mod coord;
mod error;
mod kabsch;
pub mod linalg;
mod superimpose;
mod transform;

pub use coord::{centroid, from_batch, to_batch, Coordinates};
pub use error::{AlignError, AlignResult};
pub use kabsch::{cross_covariance, rotation_matrices, rotation_matrix};
#[allow(deprecated)]
pub use superimpose::{superimpose, superimpose_apply};
pub use transform::AffineTransformation;
