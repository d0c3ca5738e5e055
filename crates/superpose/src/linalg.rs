use glam::{DMat3, DVec3};

/// Transform a set of points using a rotation and translation.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `rotation` - A row-major rotation matrix.
/// * `translation` - A translation vector.
/// * `dst_points` - A pre-allocated buffer to store the transformed points.
///
/// PRECONDITION: dst_points is a pre-allocated buffer of the same size as src_points.
///
/// Example:
///
/// ```
/// use superpose::linalg::transform_points;
///
/// let src_points = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [0.0, 0.0, 1.0];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points(&src_points, &rotation, &translation, &mut dst_points);
/// assert_eq!(dst_points, vec![[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
/// ```
pub fn transform_points(
    src_points: &[[f64; 3]],
    rotation: &[[f64; 3]; 3],
    translation: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    assert_eq!(src_points.len(), dst_points.len());

    // glam is column-major, the public matrix convention here is row-major
    let r = DMat3::from_cols(
        DVec3::new(rotation[0][0], rotation[1][0], rotation[2][0]),
        DVec3::new(rotation[0][1], rotation[1][1], rotation[2][1]),
        DVec3::new(rotation[0][2], rotation[1][2], rotation[2][2]),
    );
    let t = DVec3::from_array(*translation);

    for (src, dst) in src_points.iter().zip(dst_points.iter_mut()) {
        *dst = (r * DVec3::from_array(*src) + t).to_array();
    }
}
