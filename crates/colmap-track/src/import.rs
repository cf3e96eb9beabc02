use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use colmap_track_3d::camera::focal_length_mm;
use colmap_track_3d::io::colmap;
use colmap_track_3d::pointcloud::colmap_points_to_target;
use colmap_track_3d::trajectory::{build_trajectory, Trajectory, TrajectoryOptions};

use crate::{ImportConfig, ImportError};

/// Animation range of an import, in frames.
///
/// The preview range equals the full range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timeline {
    /// Frames per second.
    pub fps: u32,
    /// First frame.
    pub start: u32,
    /// Last frame, at least one frame after `start`.
    pub end: u32,
}

/// Everything a scene assembler needs to build the animated camera.
#[derive(Debug, Clone, Serialize)]
pub struct SceneImport {
    /// The folder the model was read from.
    pub model_dir: PathBuf,
    /// Camera keyframes in ascending time order.
    pub trajectory: Trajectory,
    /// Scaled points in the target convention; empty unless points were requested.
    pub points: Vec<[f64; 3]>,
    /// Animation range.
    pub timeline: Timeline,
    /// Render resolution, from the camera of the first image.
    pub resolution: Option<(u32, u32)>,
    /// Sensor width in millimeters.
    pub aperture_mm: f64,
}

impl SceneImport {
    /// Short report of the import.
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            resolution: self.resolution,
            frames: self.trajectory.len(),
        }
    }
}

/// Short report of a finished import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Render resolution, if known.
    pub resolution: Option<(u32, u32)>,
    /// Number of keyed frames.
    pub frames: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scene import successful")?;
        match self.resolution {
            Some((width, height)) => writeln!(f, "Resolution: {width} x {height}")?,
            None => writeln!(f, "Resolution: Unknown")?,
        }
        write!(f, "Duration: {} frames", self.frames)
    }
}

/// Import the COLMAP text model of a scene folder.
///
/// # Arguments
///
/// * `scene_dir` - The scene folder, holding the model under `sparse`.
/// * `config` - The import settings.
///
/// # Returns
///
/// The camera trajectory, optional points and render hints. Nothing is returned
/// unless the whole model could be read.
///
/// Example:
///
/// ```no_run
/// use colmap_track::{import_scene, ImportConfig};
///
/// let scene = import_scene("/data/my_scene", &ImportConfig::default()).unwrap();
/// println!("{}", scene.summary());
/// ```
pub fn import_scene(
    scene_dir: impl AsRef<Path>,
    config: &ImportConfig,
) -> Result<SceneImport, ImportError> {
    config.validate()?;

    let scene_dir = scene_dir.as_ref();
    if !scene_dir.is_dir() {
        return Err(ImportError::SceneNotFound(scene_dir.to_path_buf()));
    }

    let model_dir = colmap::find_model_dir(scene_dir)
        .ok_or_else(|| ImportError::ModelNotFound(scene_dir.join(colmap::SPARSE_DIR)))?;
    log::info!("reading COLMAP model from {}", model_dir.display());

    let cameras = colmap::read_cameras_txt(model_dir.join(colmap::CAMERAS_TXT))?;
    let images = colmap::read_images_txt(model_dir.join(colmap::IMAGES_TXT))?;
    let points = match config.include_points {
        true => colmap::read_points3d_txt(model_dir.join(colmap::POINTS3D_TXT))?,
        false => Vec::new(),
    };

    if cameras.is_empty() || images.is_empty() {
        return Err(ImportError::EmptyModel(model_dir));
    }
    log::info!(
        "parsed {} cameras, {} images, {} points",
        cameras.len(),
        images.len(),
        points.len()
    );

    let focal_by_camera = cameras
        .iter()
        .map(|(&camera_id, camera)| (camera_id, focal_length_mm(camera, config.sensor_width_mm)))
        .collect::<HashMap<_, _>>();

    let options = TrajectoryOptions {
        scale: config.scale,
        aperture_mm: config.sensor_width_mm,
    };
    let trajectory = build_trajectory(&images, &focal_by_camera, &options);
    if trajectory.is_empty() {
        return Err(ImportError::NoUsableFrames(model_dir));
    }
    if !trajectory.skipped().is_empty() {
        log::warn!(
            "{} images dropped for unknown cameras",
            trajectory.skipped().len()
        );
    }

    let resolution = images
        .first()
        .and_then(|image| cameras.get(&image.camera_id))
        .map(|camera| (camera.width as u32, camera.height as u32));

    let timeline = Timeline {
        fps: config.fps,
        start: 0,
        end: (trajectory.len() as u32).max(1),
    };

    Ok(SceneImport {
        model_dir,
        points: colmap_points_to_target(&points, config.scale),
        trajectory,
        timeline,
        resolution,
        aperture_mm: config.sensor_width_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = ImportSummary {
            resolution: Some((1920, 1080)),
            frames: 120,
        };
        assert_eq!(
            summary.to_string(),
            "Scene import successful\nResolution: 1920 x 1080\nDuration: 120 frames"
        );

        let summary = ImportSummary {
            resolution: None,
            frames: 1,
        };
        assert!(summary.to_string().contains("Resolution: Unknown"));
    }

    #[test]
    fn test_missing_scene() {
        let result = import_scene("/definitely/not/a/scene", &ImportConfig::default());
        assert!(matches!(result, Err(ImportError::SceneNotFound(_))));
    }

    #[test]
    fn test_invalid_config_checked_first() {
        let config = ImportConfig {
            fps: 0,
            ..Default::default()
        };
        let result = import_scene("/definitely/not/a/scene", &config);
        assert!(matches!(result, Err(ImportError::InvalidConfig(_))));
    }
}
