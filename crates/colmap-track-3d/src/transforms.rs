use glam::{DMat3, DVec3, DVec4};
use serde::Serialize;

/// World axis change from COLMAP (Y down) to the target convention (Y up).
///
/// Applied to world space vectors, and to every basis column and the offset of
/// a world space transform.
pub const WORLD_AXIS: DMat3 = DMat3::from_cols(DVec3::X, DVec3::NEG_Y, DVec3::Z);

/// Camera local axis change, right-multiplied onto every camera orientation.
pub const CAMERA_LOCAL_AXIS: DMat3 = DMat3::from_cols(DVec3::X, DVec3::NEG_Y, DVec3::Z);

/// Below this `cos(pitch)` the heading and bank axes are considered aligned.
const GIMBAL_EPSILON: f64 = 1e-9;

/// A camera pose in the target convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetPose {
    /// Camera to world rotation; the columns are the camera local axes.
    pub rotation: DMat3,
    /// Camera position in world space.
    pub offset: DVec3,
}

/// Compute the rotation matrix from a quaternion.
///
/// # Arguments
///
/// * `quaternion` - The quaternion as `[qw, qx, qy, qz]`. It does not need to be
///   normalized; a zero quaternion is treated as the identity rotation.
///
/// # Returns
///
/// The rotation matrix.
///
/// Example:
///
/// ```
/// use colmap_track_3d::transforms::quaternion_to_rotation_matrix;
/// use glam::DMat3;
///
/// let rotation = quaternion_to_rotation_matrix(&[0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(rotation, DMat3::IDENTITY);
/// ```
pub fn quaternion_to_rotation_matrix(quaternion: &[f64; 4]) -> DMat3 {
    let q = DVec4::from_array(*quaternion);
    // scale by the largest component first so squaring cannot overflow
    let largest = q.abs().max_element();
    let [w, x, y, z] = match largest == 0.0 || !largest.is_finite() {
        true => [1.0, 0.0, 0.0, 0.0],
        false => {
            let q = q / largest;
            (q / q.length()).to_array()
        }
    };

    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (wx, wy, wz) = (w * x, w * y, w * z);

    let m00 = 1.0 - 2.0 * (yy + zz);
    let m01 = 2.0 * (xy - wz);
    let m02 = 2.0 * (xz + wy);

    let m10 = 2.0 * (xy + wz);
    let m11 = 1.0 - 2.0 * (xx + zz);
    let m12 = 2.0 * (yz - wx);

    let m20 = 2.0 * (xz - wy);
    let m21 = 2.0 * (yz + wx);
    let m22 = 1.0 - 2.0 * (xx + yy);

    DMat3::from_cols(
        DVec3::new(m00, m10, m20),
        DVec3::new(m01, m11, m21),
        DVec3::new(m02, m12, m22),
    )
}

/// Convert a COLMAP world to camera pose into a target camera pose.
///
/// The camera to world transform `(Rᵀ, -Rᵀ t)` is built first, then every basis
/// column and the offset are mapped through [`WORLD_AXIS`], and finally the basis
/// is right-multiplied by [`CAMERA_LOCAL_AXIS`] so the fix acts in the camera's
/// own frame.
///
/// # Arguments
///
/// * `rotation` - World to camera rotation as `[qw, qx, qy, qz]`.
/// * `translation` - World to camera translation.
///
/// # Returns
///
/// The camera pose in the target convention.
pub fn colmap_to_target(rotation: &[f64; 4], translation: &[f64; 3]) -> TargetPose {
    let camera_r_world = quaternion_to_rotation_matrix(rotation);
    let world_r_camera = camera_r_world.transpose();
    let camera_center = -(world_r_camera * DVec3::from_array(*translation));

    TargetPose {
        rotation: WORLD_AXIS * world_r_camera * CAMERA_LOCAL_AXIS,
        offset: WORLD_AXIS * camera_center,
    }
}

/// Invert [`colmap_to_target`].
///
/// # Returns
///
/// The world to camera rotation matrix and translation.
pub fn target_to_colmap(pose: &TargetPose) -> (DMat3, [f64; 3]) {
    // both axis matrices are their own inverse
    let world_r_camera = WORLD_AXIS * pose.rotation * CAMERA_LOCAL_AXIS;
    let camera_center = WORLD_AXIS * pose.offset;
    let camera_r_world = world_r_camera.transpose();
    let translation = -(camera_r_world * camera_center);
    (camera_r_world, translation.to_array())
}

/// Rotation matrix from heading, pitch and bank angles in radians.
///
/// The rotation order is `R = Ry(heading) * Rx(pitch) * Rz(bank)`.
pub fn hpb_to_matrix(hpb: &[f64; 3]) -> DMat3 {
    DMat3::from_rotation_y(hpb[0]) * DMat3::from_rotation_x(hpb[1]) * DMat3::from_rotation_z(hpb[2])
}

/// Decompose a rotation matrix into heading, pitch and bank angles in radians.
///
/// Inverse of [`hpb_to_matrix`], returning principal values: heading and bank in
/// `(-π, π]`, pitch in `[-π/2, π/2]`. At gimbal lock the heading is set to zero and
/// the whole rotation about the vertical axis is carried by the bank.
pub fn matrix_to_hpb(rotation: &DMat3) -> [f64; 3] {
    let (v1, v2, v3) = (rotation.x_axis, rotation.y_axis, rotation.z_axis);

    let pitch = (-v3.y).clamp(-1.0, 1.0).asin();
    if pitch.cos() > GIMBAL_EPSILON {
        let heading = v3.x.atan2(v3.z);
        let bank = v1.y.atan2(v2.y);
        [heading, pitch, bank]
    } else {
        let bank = (-v2.x).atan2(v1.x);
        [0.0, pitch, bank]
    }
}
