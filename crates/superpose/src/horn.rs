//! Horn's quaternion method for weighted rigid-body superposition.
//!
//! Given two ordered point sets with known index correspondence, finds the
//! proper rotation and translation that superimpose the first onto the second
//! with minimal mass-weighted RMSD, via the eigen-decomposition of a symmetric
//! 4×4 key matrix built from the centered coordinates.

use glam::DVec3;
use superpose_linalg::eigen::eigen4_symmetric;

use crate::error::AlignError;
use crate::linalg::transform_points;

/// Result of a rigid superposition fit.
///
/// The transformation maps the x frame onto the y frame:
/// `aligned_i = rotation * x_i + translation`.
#[derive(Debug, Clone)]
pub struct HornFit {
    /// Estimated rotation matrix, row-major, determinant +1.
    pub rotation: [[f64; 3]; 3],
    /// Estimated translation vector (applied after rotation).
    pub translation: [f64; 3],
    /// Unit quaternion (q0, q1, q2, q3) the rotation was derived from.
    /// Its sign is arbitrary; q and -q encode the same rotation.
    pub quaternion: [f64; 4],
}

/// Mass-weighted centroid of a point set.
fn weighted_centroid(points: &[[f64; 3]], weights: &[f64]) -> Result<DVec3, AlignError> {
    let mut acc = DVec3::ZERO;
    let mut weight_sum = 0.0;
    for (point, weight) in points.iter().zip(weights.iter()) {
        acc += *weight * DVec3::from_array(*point);
        weight_sum += *weight;
    }
    if weight_sum <= 0.0 {
        return Err(AlignError::InvalidWeight(weight_sum));
    }
    Ok(acc / weight_sum)
}

/// Convert a unit quaternion into a row-major rotation matrix.
///
/// The construction always yields a proper rotation (determinant +1),
/// for either sign of the quaternion.
fn quaternion_to_rotation_matrix(q: &[f64; 4]) -> [[f64; 3]; 3] {
    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);
    [
        [
            q0 * q0 + q1 * q1 - q2 * q2 - q3 * q3,
            2.0 * (q1 * q2 + q0 * q3),
            2.0 * (q1 * q3 - q0 * q2),
        ],
        [
            2.0 * (q1 * q2 - q0 * q3),
            q0 * q0 + q2 * q2 - q1 * q1 - q3 * q3,
            2.0 * (q2 * q3 + q0 * q1),
        ],
        [
            2.0 * (q1 * q3 + q0 * q2),
            2.0 * (q2 * q3 - q0 * q1),
            q0 * q0 + q3 * q3 - q1 * q1 - q2 * q2,
        ],
    ]
}

/// Compute the rigid transformation that best superimposes `x` onto `y`.
///
/// # Arguments
///
/// * `x` - The point set to be moved.
/// * `y` - The reference point set; `x[i]` corresponds to `y[i]`.
/// * `xmass` - Strictly positive weights for `x`, one per point.
/// * `ymass` - Strictly positive weights for `y`, one per point.
///
/// # Returns
///
/// The fitted rotation, translation, and the underlying unit quaternion.
///
/// The inputs are borrowed immutably and never modified. All validation
/// happens before any numeric work, so there is no partial result on error.
pub fn fit_alignment(
    x: &[[f64; 3]],
    y: &[[f64; 3]],
    xmass: &[f64],
    ymass: &[f64],
) -> Result<HornFit, AlignError> {
    if x.len() != y.len() {
        return Err(AlignError::DimensionMismatch(x.len(), y.len()));
    }
    if x.len() != xmass.len() {
        return Err(AlignError::DimensionMismatch(x.len(), xmass.len()));
    }
    if y.len() != ymass.len() {
        return Err(AlignError::DimensionMismatch(y.len(), ymass.len()));
    }
    if x.is_empty() {
        return Err(AlignError::EmptyInput);
    }

    let cmx = weighted_centroid(x, xmass)?;
    let cmy = weighted_centroid(y, ymass)?;

    // accumulate the symmetric key matrix over the centered pairs,
    // from the per-pair difference d and sum s
    let mut key = [[0.0; 4]; 4];
    for (xi, yi) in x.iter().zip(y.iter()) {
        let xc = DVec3::from_array(*xi) - cmx;
        let yc = DVec3::from_array(*yi) - cmy;
        let d = yc - xc;
        let s = yc + xc;

        key[0][0] += d.x * d.x + d.y * d.y + d.z * d.z;
        key[0][1] += s.y * d.z - d.y * s.z;
        key[0][2] += d.x * s.z - s.x * d.z;
        key[0][3] += s.x * d.y - d.x * s.y;
        key[1][1] += s.y * s.y + s.z * s.z + d.x * d.x;
        key[1][2] += d.x * d.y - s.x * s.y;
        key[1][3] += d.x * d.z - s.x * s.z;
        key[2][2] += s.x * s.x + s.z * s.z + d.y * d.y;
        key[2][3] += d.y * d.z - s.y * s.z;
        key[3][3] += s.x * s.x + s.y * s.y + d.z * d.z;
    }

    // the optimal quaternion is the eigenvector for the algebraically
    // smallest eigenvalue, located by explicit search
    let eigen = eigen4_symmetric(&key);
    let (lambda_min, quaternion) = eigen.min_pair();
    log::debug!("minimal key matrix eigenvalue: {}", lambda_min);

    let rotation = quaternion_to_rotation_matrix(&quaternion);

    // t = cmy - U * cmx, so that U * x + t == cmy + U * (x - cmx)
    let mut translation = [0.0; 3];
    let cmx_arr = cmx.to_array();
    let cmy_arr = cmy.to_array();
    for (k, t) in translation.iter_mut().enumerate() {
        *t = cmy_arr[k]
            - (rotation[k][0] * cmx_arr[0]
                + rotation[k][1] * cmx_arr[1]
                + rotation[k][2] * cmx_arr[2]);
    }

    Ok(HornFit {
        rotation,
        translation,
        quaternion,
    })
}

/// Superimpose `x` onto `y` and return the transformed points.
///
/// # Arguments
///
/// * `x` - The point set to be moved.
/// * `y` - The reference point set; `x[i]` corresponds to `y[i]`.
/// * `xmass` - Strictly positive weights for `x`, one per point.
/// * `ymass` - Strictly positive weights for `y`, one per point.
///
/// # Returns
///
/// A newly allocated point set of the same length as `x`, rigidly
/// transformed to best match `y`. Neither input is mutated.
///
/// Example:
///
/// ```
/// let x = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
/// let y = vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
/// let masses = vec![1.0, 1.0];
///
/// let aligned = superpose::align(&x, &y, &masses, &masses).unwrap();
/// assert_eq!(aligned.len(), x.len());
/// ```
pub fn align(
    x: &[[f64; 3]],
    y: &[[f64; 3]],
    xmass: &[f64],
    ymass: &[f64],
) -> Result<Vec<[f64; 3]>, AlignError> {
    let mut out = vec![[0.0; 3]; x.len()];
    align_into(&mut out, x, y, xmass, ymass)?;
    Ok(out)
}

/// Superimpose `x` onto `y`, writing the result into a preallocated buffer.
///
/// # Arguments
///
/// * `out` - Preallocated output buffer of the same length as `x`.
/// * `x` - The point set to be moved.
/// * `y` - The reference point set; `x[i]` corresponds to `y[i]`.
/// * `xmass` - Strictly positive weights for `x`, one per point.
/// * `ymass` - Strictly positive weights for `y`, one per point.
///
/// The fit works on internal centered copies, so `x` and `y` are left
/// untouched throughout the call; only `out` is written. Concurrent calls
/// over shared inputs are therefore safe.
pub fn align_into(
    out: &mut [[f64; 3]],
    x: &[[f64; 3]],
    y: &[[f64; 3]],
    xmass: &[f64],
    ymass: &[f64],
) -> Result<(), AlignError> {
    if out.len() != x.len() {
        return Err(AlignError::DimensionMismatch(out.len(), x.len()));
    }

    let fit = fit_alignment(x, y, xmass, ymass)?;
    transform_points(x, &fit.rotation, &fit.translation, out);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn det3(m: &[[f64; 3]; 3]) -> f64 {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    #[test]
    fn test_quaternion_identity() {
        let u = quaternion_to_rotation_matrix(&[1.0, 0.0, 0.0, 0.0]);
        for (i, row) in u.iter().enumerate() {
            for (j, val) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(*val, expected);
            }
        }
    }

    #[test]
    fn test_quaternion_sign_invariance() {
        let q = [0.5, -0.5, 0.5, 0.5];
        let neg_q = [-0.5, 0.5, -0.5, -0.5];
        assert_eq!(
            quaternion_to_rotation_matrix(&q),
            quaternion_to_rotation_matrix(&neg_q)
        );
    }

    #[test]
    fn test_ninety_degrees_about_z() -> Result<(), AlignError> {
        let x = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let y = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let masses = [1.0, 1.0];

        let fit = fit_alignment(&x, &y, &masses, &masses)?;
        assert_relative_eq!(det3(&fit.rotation), 1.0, epsilon = 1e-9);

        let aligned = align(&x, &y, &masses, &masses)?;
        for (a, b) in aligned.iter().zip(y.iter()) {
            for (av, bv) in a.iter().zip(b.iter()) {
                assert_relative_eq!(av, bv, epsilon = 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_single_point() -> Result<(), AlignError> {
        let x = [[5.0, 5.0, 5.0]];
        let y = [[1.0, 2.0, 3.0]];
        let masses = [1.0];

        let aligned = align(&x, &y, &masses, &masses)?;
        for (av, bv) in aligned[0].iter().zip(y[0].iter()) {
            assert_relative_eq!(av, bv, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_weighted_centroid_pulls_toward_heavy_point() -> Result<(), AlignError> {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let weights = [1.0, 3.0];
        let centroid = weighted_centroid(&points, &weights)?;
        assert_relative_eq!(centroid.x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(centroid.y, 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let x = [[0.0; 3]; 3];
        let y = [[0.0; 3]; 2];
        let xmass = [1.0; 3];
        let ymass = [1.0; 2];
        assert!(matches!(
            fit_alignment(&x, &y, &xmass, &ymass),
            Err(AlignError::DimensionMismatch(3, 2))
        ));
    }

    #[test]
    fn test_mass_length_mismatch() {
        let x = [[0.0; 3]; 2];
        let y = [[0.0; 3]; 2];
        let xmass = [1.0; 3];
        let ymass = [1.0; 2];
        assert!(matches!(
            fit_alignment(&x, &y, &xmass, &ymass),
            Err(AlignError::DimensionMismatch(2, 3))
        ));
    }

    #[test]
    fn test_empty_input() {
        let x: [[f64; 3]; 0] = [];
        let y: [[f64; 3]; 0] = [];
        let mass: [f64; 0] = [];
        assert!(matches!(
            fit_alignment(&x, &y, &mass, &mass),
            Err(AlignError::EmptyInput)
        ));
    }

    #[test]
    fn test_non_positive_weight_sum() {
        let x = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let y = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let bad = [1.0, -1.0];
        let good = [1.0, 1.0];
        assert!(matches!(
            fit_alignment(&x, &y, &bad, &good),
            Err(AlignError::InvalidWeight(_))
        ));
        assert!(matches!(
            fit_alignment(&x, &y, &good, &bad),
            Err(AlignError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_output_buffer_mismatch() {
        let x = [[0.0; 3]; 2];
        let y = [[0.0; 3]; 2];
        let mass = [1.0; 2];
        let mut out = [[0.0; 3]; 3];
        assert!(matches!(
            align_into(&mut out, &x, &y, &mass, &mass),
            Err(AlignError::DimensionMismatch(3, 2))
        ));
    }
}
