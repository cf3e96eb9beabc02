use crate::io::colmap::{CameraModel, ColmapCamera};

/// Default sensor width in millimeters (full frame).
pub const DEFAULT_SENSOR_WIDTH_MM: f64 = 36.0;

/// Focal length returned when the image width cannot be used for the conversion.
pub const FALLBACK_FOCAL_LENGTH_MM: f64 = 36.0;

/// How a camera model stores its focal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocalFamily {
    /// A single focal parameter `f` shared by both axes.
    Shared,
    /// Separate `fx`, `fy` parameters.
    Separate,
}

impl FocalFamily {
    /// Extract the focal length in pixels from a parameter vector.
    ///
    /// For [`FocalFamily::Separate`] only `fx` is used; the conversion to
    /// millimeters is defined along the image width.
    pub fn focal_px(&self, params: &[f64]) -> f64 {
        match self {
            FocalFamily::Shared | FocalFamily::Separate => params.first().copied().unwrap_or(0.0),
        }
    }
}

impl CameraModel {
    /// The focal parameter layout of the model.
    ///
    /// Unknown models are treated as [`FocalFamily::Shared`].
    pub fn family(&self) -> FocalFamily {
        match self {
            CameraModel::SimplePinhole
            | CameraModel::SimpleRadial
            | CameraModel::SimpleRadialFisheye
            | CameraModel::Radial
            | CameraModel::RadialFisheye => FocalFamily::Shared,
            CameraModel::Pinhole
            | CameraModel::OpenCV
            | CameraModel::OpenCVFisheye
            | CameraModel::FullOpenCV
            | CameraModel::Fov
            | CameraModel::ThinPrismFisheye => FocalFamily::Separate,
            CameraModel::Unknown(_) => FocalFamily::Shared,
        }
    }
}

/// Convert a focal length in pixels into millimeters.
///
/// # Arguments
///
/// * `focal_px` - The focal length in pixels.
/// * `sensor_width_mm` - The physical sensor width.
/// * `image_width_px` - The image width in pixels.
///
/// # Returns
///
/// `focal_px * sensor_width_mm / image_width_px`, or [`FALLBACK_FOCAL_LENGTH_MM`]
/// when the image width is not positive.
pub fn focal_px_to_mm(focal_px: f64, sensor_width_mm: f64, image_width_px: f64) -> f64 {
    if image_width_px <= 0.0 {
        return FALLBACK_FOCAL_LENGTH_MM;
    }
    focal_px * sensor_width_mm / image_width_px
}

/// Resolve the physical focal length of a camera in millimeters.
///
/// Example:
///
/// ```
/// use colmap_track_3d::camera::focal_length_mm;
/// use colmap_track_3d::io::colmap::{CameraModel, ColmapCamera};
///
/// let camera = ColmapCamera {
///     camera_id: 1,
///     model: CameraModel::SimplePinhole,
///     width: 1920.0,
///     height: 1080.0,
///     params: vec![1000.0, 960.0, 540.0],
/// };
/// assert_eq!(focal_length_mm(&camera, 36.0), 18.75);
/// ```
pub fn focal_length_mm(camera: &ColmapCamera, sensor_width_mm: f64) -> f64 {
    let focal_px = camera.model.family().focal_px(&camera.params);
    focal_px_to_mm(focal_px, sensor_width_mm, camera.width)
}
