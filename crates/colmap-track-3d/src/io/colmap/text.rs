use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use super::{CameraModel, ColmapCamera, ColmapError, ColmapImage, ColmapPoint3d};

/// Reasons a single record line is rejected. Rejected lines are skipped, never fatal.
#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("expected at least {expected} fields, got {got}")]
    TooFewFields { expected: usize, got: usize },

    #[error("invalid field {value:?}: {reason}")]
    InvalidField { value: String, reason: String },
}

/// Open a model file for buffered reading, or `None` if the file does not exist.
fn open_if_exists(path: &Path) -> Result<Option<BufReader<File>>, ColmapError> {
    if !path.is_file() {
        log::debug!("{} not found, treating as empty", path.display());
        return Ok(None);
    }
    Ok(Some(BufReader::new(File::open(path)?)))
}

/// Split a reader into lines, decoding each one independently.
///
/// Bytes that are not valid UTF-8 (e.g. Latin-1 image names) are replaced with
/// U+FFFD so that one badly encoded record does not end the whole file.
fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = std::io::Result<String>> {
    reader.split(b'\n').map(|bytes| {
        let bytes = bytes?;
        Ok(match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                let line = String::from_utf8_lossy(e.as_bytes()).into_owned();
                log::debug!("replaced invalid UTF-8 in line {line:?}");
                line
            }
        })
    })
}

/// Returns the trimmed line if it holds a record, `None` for blank and `#` comment lines.
fn record_line(line: &str) -> Option<&str> {
    let line = line.trim();
    match line.is_empty() || line.starts_with('#') {
        true => None,
        false => Some(line),
    }
}

/// Utility functions for parsing COLMAP text fields
fn parse_part<T: std::str::FromStr>(s: &str) -> Result<T, RecordError>
where
    T::Err: std::fmt::Display,
{
    s.parse::<T>().map_err(|e| RecordError::InvalidField {
        value: s.to_string(),
        reason: e.to_string(),
    })
}

fn require_fields(parts: &[&str], expected: usize) -> Result<(), RecordError> {
    match parts.len() < expected {
        true => Err(RecordError::TooFewFields {
            expected,
            got: parts.len(),
        }),
        false => Ok(()),
    }
}

fn parse_array<const N: usize>(parts: &[&str]) -> Result<[f64; N], RecordError> {
    let mut out = [0.0; N];
    for (dst, s) in out.iter_mut().zip(parts) {
        *dst = parse_part(s)?;
    }
    Ok(out)
}

/// Parse camera records from a reader, keeping input order.
///
/// Blank lines, `#` comments and malformed records are skipped.
pub fn parse_cameras<R: BufRead>(reader: R) -> Result<Vec<ColmapCamera>, ColmapError> {
    let mut cameras = Vec::new();
    for line in lossy_lines(reader) {
        let line = line?;
        let Some(record) = record_line(&line) else {
            continue;
        };
        match parse_camera_line(record) {
            Ok(camera) => cameras.push(camera),
            Err(e) => log::debug!("skipping camera record {record:?}: {e}"),
        }
    }
    Ok(cameras)
}

/// Read the cameras.txt file and return the cameras keyed by id.
///
/// # Arguments
///
/// * `path` - The path to the cameras.txt file.
///
/// # Returns
///
/// A map from camera id to [`ColmapCamera`]. A later record with the same id
/// replaces an earlier one. A missing file yields an empty map.
pub fn read_cameras_txt(
    path: impl AsRef<Path>,
) -> Result<HashMap<u32, ColmapCamera>, ColmapError> {
    let Some(reader) = open_if_exists(path.as_ref())? else {
        return Ok(HashMap::new());
    };

    let cameras = parse_cameras(reader)?
        .into_iter()
        .map(|camera| (camera.camera_id, camera))
        .collect();

    Ok(cameras)
}

/// Parse image records from a reader and sort them by image id.
///
/// Each record spans two lines: the pose line and the 2D observation line. The
/// observation line is consumed and discarded. Comment and blank lines are only
/// skipped while searching for a pose line.
pub fn parse_images<R: BufRead>(reader: R) -> Result<Vec<ColmapImage>, ColmapError> {
    let mut images = Vec::new();
    let mut lines = lossy_lines(reader);

    while let Some(line) = lines.next() {
        let line = line?;
        let Some(record) = record_line(&line) else {
            continue;
        };

        match parse_image_line(record) {
            Ok(image) => {
                images.push(image);
                // the 2D observations line belongs to this record
                let _ = lines.next().transpose()?;
            }
            Err(e) => log::debug!("skipping image record {record:?}: {e}"),
        }
    }

    // file order is not time order
    images.sort_by_key(|image| image.image_id);

    Ok(images)
}

/// Read the images.txt file and return the images sorted by id.
///
/// # Arguments
///
/// * `path` - The path to the images.txt file.
///
/// # Returns
///
/// A vector of [`ColmapImage`] in ascending image id order. A missing file
/// yields an empty vector.
pub fn read_images_txt(path: impl AsRef<Path>) -> Result<Vec<ColmapImage>, ColmapError> {
    match open_if_exists(path.as_ref())? {
        Some(reader) => parse_images(reader),
        None => Ok(Vec::new()),
    }
}

/// Parse 3D point records from a reader, keeping input order.
pub fn parse_points3d<R: BufRead>(reader: R) -> Result<Vec<ColmapPoint3d>, ColmapError> {
    let mut points = Vec::new();
    for line in lossy_lines(reader) {
        let line = line?;
        let Some(record) = record_line(&line) else {
            continue;
        };
        match parse_point3d_line(record) {
            Ok(point) => points.push(point),
            Err(e) => log::debug!("skipping point record {record:?}: {e}"),
        }
    }
    Ok(points)
}

/// Read the points3D.txt file and return the point positions.
///
/// # Arguments
///
/// * `path` - The path to the points3D.txt file.
///
/// # Returns
///
/// A vector of [`ColmapPoint3d`] in file order. A missing file yields an empty vector.
pub fn read_points3d_txt(path: impl AsRef<Path>) -> Result<Vec<ColmapPoint3d>, ColmapError> {
    match open_if_exists(path.as_ref())? {
        Some(reader) => parse_points3d(reader),
        None => Ok(Vec::new()),
    }
}

/// Parse a camera line and return a ColmapCamera struct.
/// NOTE: The number of parameters depends on the camera model and is not checked.
///       CAMERA_ID, MODEL, WIDTH, HEIGHT, PARAMS[0], PARAMS[1], ...
fn parse_camera_line(line: &str) -> Result<ColmapCamera, RecordError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    require_fields(&parts, 4)?;

    Ok(ColmapCamera {
        camera_id: parse_part(parts[0])?,
        model: CameraModel::from_name(parts[1]),
        width: parse_part(parts[2])?,
        height: parse_part(parts[3])?,
        params: parts[4..]
            .iter()
            .map(|s| parse_part(s))
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Parse an image pose line and return a ColmapImage struct.
/// #   IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME
fn parse_image_line(line: &str) -> Result<ColmapImage, RecordError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    require_fields(&parts, 10)?;

    Ok(ColmapImage {
        image_id: parse_part(parts[0])?,
        rotation: parse_array(&parts[1..5])?,
        translation: parse_array(&parts[5..8])?,
        camera_id: parse_part(parts[8])?,
        name: parts[9..].join(" "),
    })
}

/// Parse a point3d line and return a ColmapPoint3d struct.
///       POINT3D_ID, X, Y, Z, R, G, B, ERROR, TRACK[] ...
fn parse_point3d_line(line: &str) -> Result<ColmapPoint3d, RecordError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    require_fields(&parts, 4)?;

    Ok(ColmapPoint3d {
        xyz: parse_array(&parts[1..4])?,
    })
}
