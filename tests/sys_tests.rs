mod common;

use common::TestResult;
use pcl::ErrorCode;
use pcl::sys::{FileKind, mkdirs, read_dir, rmdir_r, stat};

#[test]
fn test_directory_lifecycle() -> TestResult {
    common::init_logging();
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("data");

    mkdirs(root.join("logs/2024"))?;
    common::write_file(&root, "config.json", b"{}")?;
    common::write_file(&root.join("logs"), "app.log", b"line\n")?;

    let names: Vec<_> = read_dir(&root)?.into_iter().map(|e| (e.name, e.kind)).collect();
    assert_eq!(
        names,
        [("config.json".to_string(), FileKind::File), ("logs".to_string(), FileKind::Dir)]
    );

    let st = stat(root.join("logs/app.log"))?;
    assert_eq!(st.size, 5);
    assert_eq!(pcl::string::fbytes(st.size, 0), "5");

    rmdir_r(&root)?;
    assert_eq!(stat(&root).unwrap_err().code(), ErrorCode::NoEntry);
    Ok(())
}

#[test]
fn test_sysinfo_has_host_details() {
    let info = pcl::sys::sysinfo();
    assert!(info.cpu_cores >= 1);
    assert!(info.cpu_sockets >= 1);
    assert!(!info.name.contains('.'));
    assert!(!info.tzabbr.is_empty());
}

#[cfg(unix)]
#[test]
fn test_exec_runs_parsed_command() -> TestResult {
    let out = pcl::sys::exec("printf \"%s-%s\" a b")?;
    assert_eq!(out.status, Some(0));
    assert_eq!(out.stdout, "a-b");
    Ok(())
}
