use std::fs::{self, FileType, Metadata};
use std::path::Path;

use chrono::{DateTime, Utc};
use pcl_error::{Error, Result, ResultExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
    Link,
    Other,
}

impl From<FileType> for FileKind {
    fn from(ft: FileType) -> Self {
        if ft.is_symlink() {
            FileKind::Link
        } else if ft.is_dir() {
            FileKind::Dir
        } else if ft.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// `st_mode` bits, type included.
    pub mode: u32,
    pub size: u64,
    pub mtime: Option<DateTime<Utc>>,
    pub kind: FileKind,
}

impl FileStat {
    /// The `ls -l` style mode string, e.g. `drwxr-xr-x`.
    pub fn mode_string(&self) -> String {
        pcl_string::strmode(self.mode)
    }
}

/// Status of `path`. Symbolic links are not followed.
pub fn stat(path: impl AsRef<Path>) -> Result<FileStat> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path)
        .map_err(Error::from)
        .trace_msg(format!("stat '{}'", path.display()))?;
    let kind = FileKind::from(meta.file_type());
    Ok(FileStat {
        mode: mode_bits(&meta, kind),
        size: meta.len(),
        mtime: meta.modified().ok().map(DateTime::<Utc>::from),
        kind,
    })
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata, _kind: FileKind) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata, kind: FileKind) -> u32 {
    let perm = if meta.permissions().readonly() { 0o555 } else { 0o755 };
    let fmt = match kind {
        FileKind::Dir => 0o040000,
        FileKind::Link => 0o120000,
        FileKind::File => 0o100000,
        FileKind::Other => 0,
    };
    fmt | perm
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcl_error::ErrorCode;

    #[test]
    fn test_stat_file_and_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f.bin");
        fs::write(&file, [0u8; 10]).unwrap();

        let st = stat(&file).unwrap();
        assert_eq!(st.kind, FileKind::File);
        assert_eq!(st.size, 10);
        assert!(st.mtime.is_some());
        assert!(st.mode_string().starts_with('-'));

        let st = stat(tmp.path()).unwrap();
        assert_eq!(st.kind, FileKind::Dir);
        assert!(st.mode_string().starts_with('d'));
    }

    #[test]
    fn test_stat_missing() {
        let err = stat("/definitely/not/here").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoEntry);
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_does_not_follow_links() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("t");
        fs::write(&target, "x").unwrap();
        let link = tmp.path().join("l");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        assert_eq!(stat(&link).unwrap().kind, FileKind::Link);
        assert!(stat(&link).unwrap().mode_string().starts_with('l'));
    }
}
