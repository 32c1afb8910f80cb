//! System layer: host information, directories, files, processes and file status.

mod dir;
mod file;
mod info;
mod process;
mod stat;

pub use dir::{DirEntry, mkdirs, read_dir, rmdir_r};
pub use file::{realpath, remove, rename};
pub use info::{
    CpuInfo, SysInfo, hostname, parse_cpuinfo, parse_meminfo, parse_os_release,
    parse_release_file, sysinfo,
};
pub use process::{ExecOptions, ExecOutput, exec, exec_with, getenv, proc_path};
pub use stat::{FileKind, FileStat, stat};
