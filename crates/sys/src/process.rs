use std::path::PathBuf;
use std::process::Command;

use pcl_error::{Error, ErrorCode, Result, ResultExt};

/// How [`exec_with`] starts a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Run through `$SHELL -c` (default `/bin/sh`) instead of directly.
    pub shell: bool,
    /// Working directory of the child.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables.
    pub env: Vec<(String, String)>,
}

/// Result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit status, or `None` when the child was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs a command line and captures its output.
///
/// The line is split with [`pcl_string::parse_cmd`], so quoting works as in a shell
/// but no shell features (pipes, globbing, variables) are available.
pub fn exec(command: &str) -> Result<ExecOutput> {
    exec_with(command, &ExecOptions::default())
}

pub fn exec_with(command: &str, opts: &ExecOptions) -> Result<ExecOutput> {
    let command = command.trim_start();
    if command.is_empty() {
        return Err(Error::with_msg(ErrorCode::Invalid, "command is empty"));
    }

    let argv = pcl_string::parse_cmd(command)
        .trace_msg(format!("error parsing command: '{command}'"))?;
    let Some((program, args)) = argv.split_first() else {
        return Err(Error::with_msg(ErrorCode::BadCmd, "command is empty"));
    };

    let mut cmd = if opts.shell {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        let mut cmd = Command::new(&shell);
        if shell.contains("/tcsh") || shell.contains("/csh") {
            cmd.arg("-m");
        } else if !shell.contains("/zsh") {
            cmd.arg("-l");
        }
        cmd.arg("-c").arg(command);
        cmd
    } else {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    };
    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }
    cmd.envs(opts.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    log::debug!("exec: {program} ({} args, shell={})", args.len(), opts.shell);
    let output = cmd
        .output()
        .map_err(Error::from)
        .trace_msg(format!("cannot run '{program}'"))?;

    Ok(ExecOutput {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Absolute path of the running executable.
pub fn proc_path() -> Result<PathBuf> {
    std::env::current_exe().map_err(Error::from).trace()
}

/// Value of an environment variable; `None` when unset or not valid UTF-8.
pub fn getenv(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command() {
        assert_eq!(exec("   ").unwrap_err().code(), ErrorCode::Invalid);
    }

    #[test]
    fn test_bad_quoting() {
        let err = exec("echo \"open").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Syntax);
        assert!(err.report(0, None).contains("error parsing command"));
    }

    #[test]
    fn test_missing_program() {
        let err = exec("pcl-no-such-program-xyz").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoEntry);
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_captures_output() {
        let out = exec("echo \"hello world\" again").unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello world again\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_status_and_options() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = ExecOptions {
            cwd: Some(tmp.path().to_path_buf()),
            env: vec![("PCL_TEST_VAR".into(), "42".into())],
            ..Default::default()
        };
        let out = exec_with("sh -c \"echo $PCL_TEST_VAR; exit 3\"", &opts).unwrap();
        assert_eq!(out.status, Some(3));
        assert_eq!(out.stdout, "42\n");
    }

    #[test]
    fn test_proc_path_and_getenv() {
        assert!(proc_path().unwrap().is_absolute());
        assert_eq!(getenv(""), None);
        assert_eq!(getenv("PCL_SURELY_UNSET_VARIABLE"), None);
    }
}
