use std::fs;
use std::path::{Path, PathBuf};

use pcl_error::{Error, ErrorCode, Result, ResultExt};

fn check_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::with_msg(ErrorCode::Invalid, "path is empty"));
    }
    Ok(())
}

/// Moves `from` to `to`, replacing `to` if it is a file.
pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    check_path(from)?;
    check_path(to)?;
    fs::rename(from, to).map_err(|e| {
        Error::from(e).trace_msg(format!("rename '{}' -> '{}'", from.display(), to.display()))
    })
}

/// Removes a file or an empty directory.
pub fn remove(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    check_path(path)?;
    let is_dir = fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .map_err(|e| Error::from(e).trace_msg(format!("remove '{}'", path.display())))?;

    let res = if is_dir { fs::remove_dir(path) } else { fs::remove_file(path) };
    res.map_err(|e| Error::from(e).trace_msg(format!("remove '{}'", path.display())))
}

/// The absolute path with every symlink, `.` and `..` resolved. The path must exist.
pub fn realpath(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    check_path(path)?;
    fs::canonicalize(path)
        .map_err(|e| Error::from(e).trace_msg(format!("realpath '{}'", path.display())))
}
