use std::path::{Path, PathBuf};

/// Name of the folder, relative to the scene folder, holding the sparse model.
pub const SPARSE_DIR: &str = "sparse";

/// File names of a COLMAP text model.
pub const CAMERAS_TXT: &str = "cameras.txt";
/// Images file name.
pub const IMAGES_TXT: &str = "images.txt";
/// Points file name.
pub const POINTS3D_TXT: &str = "points3D.txt";

/// Check whether a directory directly holds all three model files.
pub fn has_text_model(dir: impl AsRef<Path>) -> bool {
    let dir = dir.as_ref();
    [CAMERAS_TXT, IMAGES_TXT, POINTS3D_TXT]
        .iter()
        .all(|name| dir.join(name).is_file())
}

/// Locate the COLMAP text model below a scene folder.
///
/// The model is expected in `<scene>/sparse`. If that folder holds the three
/// model files it is returned, otherwise its immediate subfolders are scanned in
/// lexicographic order and the first one holding all three files wins (COLMAP
/// writes numbered models as `sparse/0`, `sparse/1`, ...).
///
/// # Arguments
///
/// * `scene_dir` - The scene folder.
///
/// # Returns
///
/// The model folder, or `None` if no folder qualifies.
pub fn find_model_dir(scene_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let sparse = scene_dir.as_ref().join(SPARSE_DIR);
    if !sparse.is_dir() {
        return None;
    }

    if has_text_model(&sparse) {
        return Some(sparse);
    }

    let entries = match std::fs::read_dir(&sparse) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("cannot list {}: {e}", sparse.display());
            return None;
        }
    };

    let mut subdirs = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    subdirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    subdirs.into_iter().find(|dir| has_text_model(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_model(dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(dir)?;
        for name in [CAMERAS_TXT, IMAGES_TXT, POINTS3D_TXT] {
            fs::write(dir.join(name), "")?;
        }
        Ok(())
    }

    #[test]
    fn test_model_in_sparse() -> Result<(), Box<dyn std::error::Error>> {
        let scene = tempfile::tempdir()?;
        write_model(&scene.path().join("sparse"))?;
        write_model(&scene.path().join("sparse").join("0"))?;
        assert_eq!(
            find_model_dir(scene.path()),
            Some(scene.path().join("sparse"))
        );
        Ok(())
    }

    #[test]
    fn test_first_qualifying_subfolder_wins() -> Result<(), Box<dyn std::error::Error>> {
        let scene = tempfile::tempdir()?;
        let sparse = scene.path().join("sparse");
        write_model(&sparse.join("2"))?;
        write_model(&sparse.join("1"))?;
        // incomplete model sorts first and must be passed over
        fs::create_dir_all(sparse.join("0"))?;
        fs::write(sparse.join("0").join(CAMERAS_TXT), "")?;
        assert_eq!(find_model_dir(scene.path()), Some(sparse.join("1")));
        Ok(())
    }

    #[test]
    fn test_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let scene = tempfile::tempdir()?;
        assert_eq!(find_model_dir(scene.path()), None);

        fs::create_dir_all(scene.path().join("sparse").join("0"))?;
        assert_eq!(find_model_dir(scene.path()), None);
        Ok(())
    }
}
