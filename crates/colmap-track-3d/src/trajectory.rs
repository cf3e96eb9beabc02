use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use serde::Serialize;

use crate::camera::DEFAULT_SENSOR_WIDTH_MM;
use crate::io::colmap::ColmapImage;
use crate::transforms::{colmap_to_target, matrix_to_hpb, TargetPose};

/// Default uniform scale from reconstruction units to scene units.
pub const DEFAULT_SCALE: f64 = 100.0;

/// Shift `curr` by whole turns so it lies in `(prev - π, prev + π]`.
///
/// Example:
///
/// ```
/// use colmap_track_3d::trajectory::unwrap_angle;
///
/// let unwrapped = unwrap_angle(3.0, -3.1);
/// assert!((unwrapped - (-3.1 + std::f64::consts::TAU)).abs() < 1e-12);
/// ```
pub fn unwrap_angle(prev: f64, mut curr: f64) -> f64 {
    let mut delta = curr - prev;
    if !delta.is_finite() {
        return curr;
    }

    // remove whole turns at once, the loops below settle the (-π, π] edge
    let turns = (delta / TAU).round();
    curr -= turns * TAU;
    delta -= turns * TAU;

    while delta > PI {
        curr -= TAU;
        delta -= TAU;
    }
    while delta <= -PI {
        curr += TAU;
        delta += TAU;
    }
    curr
}

/// Keeps heading, pitch and bank channels continuous across frames.
///
/// The first triple passes through unchanged and seeds the reference. Every later
/// triple is unwrapped channel by channel against the previously emitted one.
#[derive(Debug, Clone, Default)]
pub struct AngleUnwrapper {
    previous: Option<[f64; 3]>,
}

impl AngleUnwrapper {
    /// Create an unwrapper with no reference yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unwrap the next raw triple and make it the new reference.
    pub fn unwrap(&mut self, raw: [f64; 3]) -> [f64; 3] {
        let unwrapped = match self.previous {
            None => raw,
            Some(prev) => [
                unwrap_angle(prev[0], raw[0]),
                unwrap_angle(prev[1], raw[1]),
                unwrap_angle(prev[2], raw[2]),
            ],
        };
        self.previous = Some(unwrapped);
        unwrapped
    }
}

/// Settings applied while building a trajectory.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryOptions {
    /// Uniform scale applied to camera translations.
    pub scale: f64,
    /// Sensor width keyed alongside the focal length.
    pub aperture_mm: f64,
}

impl Default for TrajectoryOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            aperture_mm: DEFAULT_SENSOR_WIDTH_MM,
        }
    }
}

/// One camera keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    /// Time in frames.
    pub frame: u32,
    /// Id of the source image.
    pub image_id: u32,
    /// Camera pose in the target convention.
    pub pose: TargetPose,
    /// Unwrapped heading, pitch and bank in radians.
    pub hpb: [f64; 3],
    /// Focal length in millimeters.
    pub focal_length_mm: f64,
    /// Sensor width in millimeters.
    pub aperture_mm: f64,
}

/// Keyframes in ascending time order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trajectory {
    keyframes: Vec<Keyframe>,
    skipped: Vec<u32>,
}

impl Trajectory {
    /// The keyframes in ascending frame order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Ids of the images dropped because their camera is unknown.
    pub fn skipped(&self) -> &[u32] {
        &self.skipped
    }

    /// Number of keyframes.
    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Check if the trajectory has no keyframes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

/// Build the keyframe sequence for a camera track.
///
/// # Arguments
///
/// * `images` - The image poses, in ascending image id order.
/// * `focal_by_camera` - Resolved focal length in millimeters per camera id.
/// * `options` - Scale and aperture settings.
///
/// # Returns
///
/// One keyframe per image whose camera is known. Frame times are assigned
/// consecutively from zero in output order, so dropped images do not leave gaps.
pub fn build_trajectory(
    images: &[ColmapImage],
    focal_by_camera: &HashMap<u32, f64>,
    options: &TrajectoryOptions,
) -> Trajectory {
    let mut unwrapper = AngleUnwrapper::new();
    let mut trajectory = Trajectory::default();

    for image in images {
        let Some(&focal_length_mm) = focal_by_camera.get(&image.camera_id) else {
            log::warn!(
                "image {} ({}) references unknown camera {}, skipping",
                image.image_id,
                image.name,
                image.camera_id
            );
            trajectory.skipped.push(image.image_id);
            continue;
        };

        let translation = image.translation.map(|t| t * options.scale);
        let pose = colmap_to_target(&image.rotation, &translation);
        let hpb = unwrapper.unwrap(matrix_to_hpb(&pose.rotation));

        trajectory.keyframes.push(Keyframe {
            frame: trajectory.keyframes.len() as u32,
            image_id: image.image_id,
            pose,
            hpb,
            focal_length_mm,
            aperture_mm: options.aperture_mm,
        });
    }

    trajectory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::{hpb_to_matrix, target_to_colmap};
    use approx::assert_relative_eq;
    use glam::{DQuat, DVec3};

    fn assert_continuous(raw: &[f64], unwrapped: &[f64]) {
        for pair in unwrapped.windows(2) {
            assert!((pair[1] - pair[0]).abs() <= PI);
        }
        for (r, u) in raw.iter().zip(unwrapped) {
            let turns = (u - r) / TAU;
            assert_relative_eq!(turns, turns.round(), epsilon = 1e-12);
        }
    }

    fn image(image_id: u32, camera_id: u32, rotation: [f64; 4]) -> ColmapImage {
        ColmapImage {
            image_id,
            rotation,
            translation: [0.1, 0.2, 0.3],
            camera_id,
            name: format!("frame_{image_id:04}.png"),
        }
    }

    /// COLMAP quaternion whose target pose has the given heading, pitch and bank.
    fn colmap_rotation_for(hpb: [f64; 3]) -> [f64; 4] {
        let pose = TargetPose {
            rotation: hpb_to_matrix(&hpb),
            offset: DVec3::ZERO,
        };
        let (camera_r_world, _) = target_to_colmap(&pose);
        let q = DQuat::from_mat3(&camera_r_world);
        [q.w, q.x, q.y, q.z]
    }

    #[test]
    fn test_unwrap_angle_boundary_crossing() {
        let raw = [3.0, -3.1, 3.05];
        let mut unwrapped = vec![raw[0]];
        for &r in &raw[1..] {
            let prev = unwrapped[unwrapped.len() - 1];
            unwrapped.push(unwrap_angle(prev, r));
        }
        assert_relative_eq!(unwrapped[1], -3.1 + TAU, epsilon = 1e-12);
        assert_relative_eq!(unwrapped[2], 3.05, epsilon = 1e-12);
        assert_continuous(&raw, &unwrapped);
    }

    #[test]
    fn test_unwrap_angle_multiple_turns() {
        assert_relative_eq!(unwrap_angle(20.0, 0.5), 0.5 + 3.0 * TAU, epsilon = 1e-12);
        assert_relative_eq!(unwrap_angle(-20.0, 0.5), 0.5 - 3.0 * TAU, epsilon = 1e-12);
        // exactly π away stays, -π away moves up
        assert_eq!(unwrap_angle(0.0, PI), PI);
        assert_eq!(unwrap_angle(0.0, -PI), PI);
    }

    #[test]
    fn test_unwrap_angle_large_and_non_finite() {
        let unwrapped = unwrap_angle(0.0, 1000.0);
        assert!(unwrapped > -PI && unwrapped <= PI);
        let turns = (1000.0 - unwrapped) / TAU;
        assert_relative_eq!(turns, turns.round(), epsilon = 1e-9);

        // must return rather than spin when a single turn is below precision
        assert!(unwrap_angle(0.0, 1e17).is_finite());
        assert!(unwrap_angle(0.0, f64::NAN).is_nan());
        assert_eq!(unwrap_angle(0.0, f64::INFINITY), f64::INFINITY);
        assert_eq!(unwrap_angle(f64::NEG_INFINITY, 1.0), 1.0);
    }

    #[test]
    fn test_unwrapper_channels_independent() {
        let mut unwrapper = AngleUnwrapper::new();
        assert_eq!(unwrapper.unwrap([3.0, 0.1, -3.0]), [3.0, 0.1, -3.0]);
        let next = unwrapper.unwrap([-3.0, 0.2, 3.0]);
        assert_relative_eq!(next[0], -3.0 + TAU, epsilon = 1e-12);
        assert_eq!(next[1], 0.2);
        assert_relative_eq!(next[2], 3.0 - TAU, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_compaction() {
        let images = vec![
            image(1, 1, [1.0, 0.0, 0.0, 0.0]),
            image(2, 9, [1.0, 0.0, 0.0, 0.0]),
            image(3, 2, [1.0, 0.0, 0.0, 0.0]),
            image(4, 9, [1.0, 0.0, 0.0, 0.0]),
            image(5, 1, [1.0, 0.0, 0.0, 0.0]),
        ];
        let focal = HashMap::from([(1, 18.75), (2, 35.0)]);
        let trajectory = build_trajectory(&images, &focal, &TrajectoryOptions::default());

        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.skipped(), &[2, 4]);
        let frames = trajectory
            .keyframes()
            .iter()
            .map(|k| k.frame)
            .collect::<Vec<_>>();
        assert_eq!(frames, vec![0, 1, 2]);
        let ids = trajectory
            .keyframes()
            .iter()
            .map(|k| k.image_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(trajectory.keyframes()[1].focal_length_mm, 35.0);
        assert_eq!(trajectory.keyframes()[1].aperture_mm, 36.0);
    }

    #[test]
    fn test_translation_is_scaled() {
        let images = vec![image(1, 1, [1.0, 0.0, 0.0, 0.0])];
        let focal = HashMap::from([(1, 18.75)]);
        let options = TrajectoryOptions {
            scale: 10.0,
            aperture_mm: 24.0,
        };
        let trajectory = build_trajectory(&images, &focal, &options);
        let offset = trajectory.keyframes()[0].pose.offset;
        assert!(offset.abs_diff_eq(DVec3::new(-1.0, 2.0, -3.0), 1e-12));
        assert_eq!(trajectory.keyframes()[0].aperture_mm, 24.0);
    }

    #[test]
    fn test_spinning_camera_heading_is_continuous() {
        let headings = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let images = headings
            .iter()
            .enumerate()
            .map(|(i, &h)| image(i as u32 + 1, 1, colmap_rotation_for([h, 0.1, 0.2])))
            .collect::<Vec<_>>();
        let focal = HashMap::from([(1, 18.75)]);
        let trajectory = build_trajectory(&images, &focal, &TrajectoryOptions::default());

        assert_eq!(trajectory.len(), headings.len());
        for (keyframe, &h) in trajectory.keyframes().iter().zip(&headings) {
            assert_relative_eq!(keyframe.hpb[0], h, epsilon = 1e-9);
            assert_relative_eq!(keyframe.hpb[1], 0.1, epsilon = 1e-9);
            assert_relative_eq!(keyframe.hpb[2], 0.2, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_input() {
        let trajectory = build_trajectory(&[], &HashMap::new(), &TrajectoryOptions::default());
        assert!(trajectory.is_empty());
        assert!(trajectory.skipped().is_empty());
    }
}
