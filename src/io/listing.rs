//! Frame file discovery
//!
//! Frames are expected to be numbered so that lexicographic path order
//! equals acquisition order; the lister only enforces the ordering, never
//! the naming scheme.

use crate::io::configuration::IMAGE_EXTENSION;
use crate::io::error::{Result, StackError};
use std::path::{Path, PathBuf};

/// List the frame files of an acquisition directory in ascending path order
///
/// Only regular files with the fixed frame extension are returned; there
/// is no recursion into subdirectories and no inspection of file content.
/// A directory without matching files yields an empty list.
///
/// # Errors
///
/// Returns [`StackError::DirectoryRead`] if the directory or one of its
/// entries cannot be read.
pub fn list_image_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory).map_err(|source| StackError::DirectoryRead {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| StackError::DirectoryRead {
            path: directory.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(IMAGE_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_matching_files_in_lexicographic_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame_03.tif", "frame_01.tif", "frame_02.tif", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.tif")).unwrap();

        let files = list_image_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["frame_01.tif", "frame_02.tif", "frame_03.tif"]);
    }

    #[test]
    fn test_directory_without_matches_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();
        assert!(list_image_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = list_image_files(&missing).unwrap_err();
        assert!(matches!(err, StackError::DirectoryRead { .. }));
    }
}
