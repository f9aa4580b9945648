//! Whole-file writes that never leave a half-written table behind.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::r#trait::StoreError;

/// Open `path` for reading, mapping "not found" to [`StoreError::Missing`].
pub(crate) fn open_existing(path: &Path) -> Result<File, StoreError> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::Missing(path.display().to_string()),
        _ => StoreError::io(path, e),
    })
}

/// Write `contents` to a sibling temp file, flush it to disk, then rename it
/// over `path`. Readers see either the old table or the new one.
pub(crate) fn replace_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = temp_path(path);
    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_creates_parent_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("table.csv");

        replace_atomically(&path, b"first").unwrap();
        replace_atomically(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn open_missing_file_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_existing(&dir.path().join("nope.csv")).unwrap_err();
        assert!(err.is_missing());
    }
}
