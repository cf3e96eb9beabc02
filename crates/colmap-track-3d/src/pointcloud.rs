use glam::DVec3;

use crate::io::colmap::ColmapPoint3d;
use crate::transforms::WORLD_AXIS;

/// Convert COLMAP points into the target world convention.
///
/// Points are static, so only the uniform scale and the world axis change apply.
///
/// # Arguments
///
/// * `points` - The reconstructed points.
/// * `scale` - Uniform scale, the same one applied to camera translations.
///
/// # Returns
///
/// The converted positions, in input order.
pub fn colmap_points_to_target(points: &[ColmapPoint3d], scale: f64) -> Vec<[f64; 3]> {
    points
        .iter()
        .map(|point| (WORLD_AXIS * (DVec3::from_array(point.xyz) * scale)).to_array())
        .collect()
}
