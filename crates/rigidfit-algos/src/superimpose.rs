//! Superimposition of structures onto a fixed reference
//!
//! Centers both coordinate sets, solves for the optimal rotation with the
//! Kabsch algorithm and moves the mobile structure onto the fixed one.

use ndarray::{Array3, Axis};

use crate::coord::{centroid, to_batch, Coordinates};
use crate::error::{AlignError, AlignResult};
use crate::kabsch::rotation_matrices;
use crate::transform::AffineTransformation;

/// Superimpose `mobile` onto `fixed`, minimizing the RMSD.
///
/// Atom `i` of `mobile` must correspond to atom `i` of `fixed`, and both
/// must contain the same number of models; model `k` of `mobile` is fitted
/// onto model `k` of `fixed`.
///
/// If `atom_mask` is given, only the selected atoms drive the fit. The
/// returned structure still contains every atom of `mobile`, all of them
/// moved by the returned transformation.
pub fn superimpose<F, M>(
    fixed: &F,
    mobile: &M,
    atom_mask: Option<&[bool]>,
) -> AlignResult<(M, AffineTransformation)>
where
    F: Coordinates,
    M: Coordinates,
{
    let fix_coord = to_batch(fixed.coord())?;
    let mob_coord = to_batch(mobile.coord())?;

    let n_models = fix_coord.len_of(Axis(0));
    if mob_coord.len_of(Axis(0)) != n_models {
        return Err(AlignError::model_count(n_models, mob_coord.len_of(Axis(0))));
    }
    let n_atoms = fix_coord.len_of(Axis(1));
    if mob_coord.len_of(Axis(1)) != n_atoms {
        return Err(AlignError::AtomCountMismatch(
            n_atoms,
            mob_coord.len_of(Axis(1)),
        ));
    }

    let (fix_filtered, mob_filtered) = match atom_mask {
        Some(mask) => {
            let selected = mask_indices(mask, n_atoms)?;
            (
                fix_coord.select(Axis(1), &selected),
                mob_coord.select(Axis(1), &selected),
            )
        }
        None => (fix_coord, mob_coord),
    };
    let n_selected = fix_filtered.len_of(Axis(1));
    if n_selected == 0 {
        return Err(AlignError::NoAtoms);
    }

    let fix_centroid = centroid(fix_filtered.view())?;
    let mob_centroid = centroid(mob_filtered.view())?;
    let fix_centered: Array3<f64> = &fix_filtered - &fix_centroid.view().insert_axis(Axis(1));
    let mob_centered: Array3<f64> = &mob_filtered - &mob_centroid.view().insert_axis(Axis(1));

    let rotation = rotation_matrices(fix_centered.view(), mob_centered.view());
    let transformation = AffineTransformation::from_parts(-mob_centroid, rotation, fix_centroid);

    log::debug!(
        "Superimposed {} model(s) using {} of {} atoms",
        n_models,
        n_selected,
        n_atoms
    );

    let fitted = transformation.apply(mobile)?;
    Ok((fitted, transformation))
}

/// Superimpose `atoms` with a transformation from an earlier fit
#[deprecated(note = "use `AffineTransformation::apply` instead")]
pub fn superimpose_apply<C: Coordinates>(
    atoms: &C,
    transformation: &AffineTransformation,
) -> AlignResult<C> {
    transformation.apply(atoms)
}

/// Indices of the atoms selected by `mask`
fn mask_indices(mask: &[bool], n_atoms: usize) -> AlignResult<Vec<usize>> {
    if mask.len() != n_atoms {
        return Err(AlignError::MaskLength {
            mask: mask.len(),
            atoms: n_atoms,
        });
    }
    Ok(mask
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{det3, Mat3};
    use ndarray::{array, Array2};

    fn points() -> Array2<f64> {
        array![
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 3.0],
            [1.0, 1.0, 0.5],
        ]
    }

    fn moved(points: &Array2<f64>) -> Array2<f64> {
        let rot: Mat3 = [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        AffineTransformation::single([0.0; 3], rot, [3.0, -4.0, 5.0])
            .apply(points)
            .unwrap()
    }

    fn max_deviation(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_recovers_rigid_motion() {
        let fixed = points();
        let mobile = moved(&fixed);
        let (fitted, transformation) = superimpose(&fixed, &mobile, None).unwrap();
        assert!(max_deviation(&fitted, &fixed) < 1e-9);

        let r = transformation.rotation();
        let r0 = r.index_axis(Axis(0), 0);
        let rot = [
            [r0[[0, 0]], r0[[0, 1]], r0[[0, 2]]],
            [r0[[1, 0]], r0[[1, 1]], r0[[1, 2]]],
            [r0[[2, 0]], r0[[2, 1]], r0[[2, 2]]],
        ];
        assert!((det3(&rot) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_translations_are_centroids() {
        let fixed = points();
        let mobile = moved(&fixed);
        let (_, transformation) = superimpose(&fixed, &mobile, None).unwrap();

        let fix_centroid = fixed.mean_axis(Axis(0)).unwrap();
        let mob_centroid = mobile.mean_axis(Axis(0)).unwrap();
        for k in 0..3 {
            assert!((transformation.target_translation()[[0, k]] - fix_centroid[k]).abs() < 1e-12);
            assert!((transformation.center_translation()[[0, k]] + mob_centroid[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mask_length_error() {
        let fixed = points();
        let mask = [true, false];
        let err = superimpose(&fixed, &fixed, Some(&mask)).unwrap_err();
        assert_eq!(err, AlignError::MaskLength { mask: 2, atoms: 5 });
    }

    #[test]
    fn test_empty_mask_error() {
        let fixed = points();
        let mask = [false; 5];
        assert_eq!(
            superimpose(&fixed, &fixed, Some(&mask)).unwrap_err(),
            AlignError::NoAtoms
        );
    }

    #[test]
    fn test_atom_count_mismatch() {
        let fixed = points();
        let mobile = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        assert_eq!(
            superimpose(&fixed, &mobile, None).unwrap_err(),
            AlignError::AtomCountMismatch(5, 2)
        );
    }

    #[test]
    fn test_model_count_mismatch_is_not_broadcast() {
        let fixed = points();
        let mobile = ndarray::stack![Axis(0), points(), moved(&points())];
        let err = superimpose(&fixed, &mobile, None).unwrap_err();
        assert_eq!(err, AlignError::ModelCountMismatch { expected: 1, actual: 2 });
    }

    #[test]
    #[allow(deprecated)]
    fn test_superimpose_apply_matches_apply() {
        let fixed = points();
        let mobile = moved(&fixed);
        let (_, transformation) = superimpose(&fixed, &mobile, None).unwrap();
        assert_eq!(
            superimpose_apply(&mobile, &transformation).unwrap(),
            transformation.apply(&mobile).unwrap()
        );
    }

    #[test]
    fn test_mask_indices() {
        assert_eq!(mask_indices(&[true, false, true], 3).unwrap(), vec![0, 2]);
        assert!(mask_indices(&[true], 3).is_err());
    }
}
