use std::fs;
use std::path::Path;

use pcl_error::{Error, Result, ResultExt};

use crate::stat::FileKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: FileKind,
}

/// Creates `path` and any missing parents. Existing directories are fine.
pub fn mkdirs(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path)
        .map_err(|e| Error::from(e).trace_msg(format!("mkdirs '{}'", path.display())))
}

/// Removes a directory and everything below it.
pub fn rmdir_r(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    log::debug!("removing directory tree {}", path.display());
    fs::remove_dir_all(path)
        .map_err(|e| Error::from(e).trace_msg(format!("rmdir_r '{}'", path.display())))
}

/// Lists a directory, sorted by name. `.` and `..` are never reported.
pub fn read_dir(path: impl AsRef<Path>) -> Result<Vec<DirEntry>> {
    let path = path.as_ref();
    let mut entries = Vec::new();
    let iter = fs::read_dir(path)
        .map_err(Error::from)
        .trace_msg(format!("opendir '{}'", path.display()))?;

    for entry in iter {
        let entry = entry.map_err(Error::from).trace()?;
        let kind = entry
            .file_type()
            .map(FileKind::from)
            .unwrap_or(FileKind::Other);
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcl_error::ErrorCode;

    #[test]
    fn test_mkdirs_and_rmdir_r() {
        let tmp = tempfile::tempdir().unwrap();
        let deep = tmp.path().join("a/b/c");
        mkdirs(&deep).unwrap();
        mkdirs(&deep).unwrap();
        assert!(deep.is_dir());

        fs::write(deep.join("f.txt"), "x").unwrap();
        rmdir_r(tmp.path().join("a")).unwrap();
        assert!(!tmp.path().join("a").exists());
    }

    #[test]
    fn test_read_dir_kinds() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), "data").unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();

        let entries = read_dir(tmp.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry { name: "a".into(), kind: FileKind::Dir },
                DirEntry { name: "b.txt".into(), kind: FileKind::File },
            ]
        );
    }

    #[test]
    fn test_read_dir_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_dir(tmp.path().join("nope")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoEntry);
        assert!(err.traces().any(|t| t.msg.as_deref().is_some_and(|m| m.starts_with("opendir"))));
    }
}
