/// Represents a Colmap camera model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraModel {
    /// Simple pinhole camera model: f, cx, cy
    SimplePinhole,
    /// Pinhole camera model: fx, fy, cx, cy
    Pinhole,
    /// Simplified radial camera model: f, cx, cy, k
    SimpleRadial,
    /// Radial camera model: f, cx, cy, k1, k2
    Radial,
    /// OpenCV camera model: fx, fy, cx, cy, k1, k2, p1, p2
    OpenCV,
    /// OpenCV fisheye camera model: fx, fy, cx, cy, k1, k2, k3, k4
    OpenCVFisheye,
    /// Full OpenCV camera model: fx, fy, cx, cy, k1, k2, p1, p2, k3, k4, k5, k6
    FullOpenCV,
    /// Field of view camera model: fx, fy, cx, cy, omega
    Fov,
    /// Simple radial fisheye camera model: f, cx, cy, k
    SimpleRadialFisheye,
    /// Radial fisheye camera model: f, cx, cy, k1, k2
    RadialFisheye,
    /// Thin prism fisheye camera model: fx, fy, cx, cy, k1, k2, p1, p2, k3, k4, sx1, sy1
    ThinPrismFisheye,
    /// Any model tag this crate does not know about
    Unknown(String),
}

impl CameraModel {
    /// Parse a model tag as written in cameras.txt.
    ///
    /// Matching is case-insensitive. `SIMPLE_RADIAL_1` is accepted as an alias of
    /// `SIMPLE_RADIAL`. Unrecognized tags are kept as [`CameraModel::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "SIMPLE_PINHOLE" => Self::SimplePinhole,
            "PINHOLE" => Self::Pinhole,
            "SIMPLE_RADIAL" | "SIMPLE_RADIAL_1" => Self::SimpleRadial,
            "RADIAL" => Self::Radial,
            "OPENCV" => Self::OpenCV,
            "OPENCV_FISHEYE" => Self::OpenCVFisheye,
            "FULL_OPENCV" => Self::FullOpenCV,
            "FOV" => Self::Fov,
            "SIMPLE_RADIAL_FISHEYE" => Self::SimpleRadialFisheye,
            "RADIAL_FISHEYE" => Self::RadialFisheye,
            "THIN_PRISM_FISHEYE" => Self::ThinPrismFisheye,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

/// Represents a camera in the Colmap system.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapCamera {
    /// Camera id
    pub camera_id: u32,
    /// Camera model
    pub model: CameraModel,
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
    /// Camera parameters, layout given by the model
    pub params: Vec<f64>,
}

/// Represents an image in the Colmap system.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapImage {
    /// Image id
    pub image_id: u32,
    /// World to camera rotation
    pub rotation: [f64; 4], // qw, qx, qy, qz
    /// World to camera translation
    pub translation: [f64; 3], // x, y, z
    /// Camera id
    pub camera_id: u32,
    /// Image name
    pub name: String,
}

/// Represents a 3D point in the Colmap system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColmapPoint3d {
    /// x, y, z coordinates
    pub xyz: [f64; 3],
}
