use pcl_error::{Error, ErrorCode, Result};

/// Splits a command line into arguments.
///
/// Arguments are separated by spaces or tabs. A double quote at the start of an
/// argument groups everything up to the closing quote; a backslash makes the next
/// character literal. A quote in the middle of an argument must be escaped.
pub fn parse_cmd(cmd: &str) -> Result<Vec<String>> {
    let is_sep = |c: &char| matches!(c, ' ' | '\t');
    let mut args = Vec::new();
    let mut chars = cmd.chars().peekable();

    loop {
        while chars.next_if(is_sep).is_some() {}
        if chars.peek().is_none() {
            break;
        }
        let quoted = chars.next_if_eq(&'"').is_some();
        let mut arg = String::new();

        loop {
            match chars.next() {
                None if quoted => {
                    return Err(Error::with_msg(ErrorCode::Syntax, "unterminated quote"));
                }
                None => break,
                Some('\\') => arg.push(chars.next().unwrap_or('\\')),
                Some('"') if quoted => break,
                Some('"') => {
                    return Err(Error::with_msg(ErrorCode::Syntax, "unescaped quote"));
                }
                Some(c) if !quoted && is_sep(&c) => break,
                Some(c) => arg.push(c),
            }
        }

        if !arg.is_empty() {
            args.push(arg);
        }
    }

    Ok(args)
}

/// Name of a signal number, e.g. `SIGTERM`. Unknown numbers give `UNDEF`.
///
/// Numbers that POSIX fixes are named everywhere; the rest follow the Linux
/// numbering and are only named on Linux.
pub fn strsignal(signum: i32) -> &'static str {
    match signum {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        4 => "SIGILL",
        5 => "SIGTRAP",
        6 => "SIGABRT",
        8 => "SIGFPE",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        n => platform_signal(n),
    }
}

#[cfg(target_os = "linux")]
fn platform_signal(signum: i32) -> &'static str {
    match signum {
        7 => "SIGBUS",
        10 => "SIGUSR1",
        12 => "SIGUSR2",
        16 => "SIGSTKFLT",
        17 => "SIGCHLD",
        18 => "SIGCONT",
        19 => "SIGSTOP",
        20 => "SIGTSTP",
        21 => "SIGTTIN",
        22 => "SIGTTOU",
        23 => "SIGURG",
        24 => "SIGXCPU",
        25 => "SIGXFSZ",
        26 => "SIGVTALRM",
        27 => "SIGPROF",
        28 => "SIGWINCH",
        29 => "SIGIO",
        30 => "SIGPWR",
        31 => "SIGSYS",
        _ => "UNDEF",
    }
}

#[cfg(not(target_os = "linux"))]
fn platform_signal(_signum: i32) -> &'static str {
    "UNDEF"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cmd_words() {
        assert_eq!(parse_cmd("ls -l  /tmp").unwrap(), vec!["ls", "-l", "/tmp"]);
        assert_eq!(parse_cmd("  \t ").unwrap(), Vec::<String>::new());
        assert_eq!(parse_cmd("echo\tone").unwrap(), vec!["echo", "one"]);
    }

    #[test]
    fn test_parse_cmd_only_splits_on_space_and_tab() {
        assert_eq!(parse_cmd("a\nb c").unwrap(), vec!["a\nb", "c"]);
        assert_eq!(parse_cmd("\na b").unwrap(), vec!["\na", "b"]);
        assert_eq!(parse_cmd(" \t\r\n").unwrap(), vec!["\r\n"]);
    }

    #[test]
    fn test_parse_cmd_quotes_and_escapes() {
        assert_eq!(
            parse_cmd(r#"grep "hello world" file"#).unwrap(),
            vec!["grep", "hello world", "file"]
        );
        assert_eq!(parse_cmd(r#"echo a\"b c\ d"#).unwrap(), vec!["echo", "a\"b", "c d"]);
        assert_eq!(parse_cmd(r#"echo """#).unwrap(), vec!["echo"]);
    }

    #[test]
    fn test_parse_cmd_errors() {
        let err = parse_cmd(r#"echo "open"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Syntax);
        assert_eq!(err.message(), Some("unterminated quote"));
        let err = parse_cmd(r#"echo ab"c"#).unwrap_err();
        assert_eq!(err.message(), Some("unescaped quote"));
    }

    #[test]
    fn test_strsignal() {
        assert_eq!(strsignal(9), "SIGKILL");
        assert_eq!(strsignal(15), "SIGTERM");
        assert_eq!(strsignal(99), "UNDEF");
        assert_eq!(strsignal(0), "UNDEF");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_strsignal_linux_numbering() {
        assert_eq!(strsignal(7), "SIGBUS");
        assert_eq!(strsignal(10), "SIGUSR1");
        assert_eq!(strsignal(17), "SIGCHLD");
        assert_eq!(strsignal(31), "SIGSYS");
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn test_strsignal_unnamed_off_linux() {
        assert_eq!(strsignal(10), "UNDEF");
        assert_eq!(strsignal(7), "UNDEF");
    }
}
