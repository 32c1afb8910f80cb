use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pcl::json::{JsonPath, Value};
use pcl::{ErrorCode, ResultExt, err, trc};
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Pcl(#[from] pcl::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pcl", version, about = "PCL command-line utilities", long_about = None)]
struct Args {
    /// Log in PCL line format, filtered by PCL_LOG, instead of through RUST_LOG
    #[arg(long, global = true, default_value_t = false)]
    pcl_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a JSON file and print it, optionally selecting values with JSONPath
    Json {
        file: PathBuf,
        /// JSONPath expression, e.g. `$.store.book[*].author`
        #[arg(short, long)]
        query: Option<String>,
        /// Print without whitespace
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
    /// Print information about this host as JSON
    Sysinfo,
    /// Hash a file
    Digest {
        /// sha224, sha256, sha384 or sha512
        algo: String,
        file: PathBuf,
    },
    /// Hex encode or decode text
    Hex {
        #[command(subcommand)]
        op: HexOp,
    },
    /// List a directory
    Ls { dir: PathBuf },
    /// Run a command line and print its output
    Exec {
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
    /// Print a traced error as text and JSON
    ErrorDemo,
}

#[derive(Subcommand, Debug)]
enum HexOp {
    Encode { text: String },
    Decode { text: String },
}

fn main() {
    let args = Args::parse();
    if args.pcl_log {
        if let Err(e) = pcl::log::PclLogger::from_env().facility("pcl").init() {
            eprint!("{}", e.report(0, Some("logger setup failed")));
        }
    } else {
        env_logger::init();
    }

    if let Err(e) = run(args.command) {
        match &e {
            CliError::Pcl(err) => eprint!("{}", err.report(0, Some("pcl failed"))),
            other => eprintln!("ERROR: {other}"),
        }
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Json { file, query, compact } => json(&file, query.as_deref(), compact),
        Command::Sysinfo => {
            println!("{}", serde_json::to_string_pretty(&pcl::sys::sysinfo())?);
            Ok(())
        }
        Command::Digest { algo, file } => {
            let data = fs::read(&file)
                .map_err(pcl::Error::from)
                .trace_msg(format!("reading '{}'", file.display()))?;
            let hex = pcl::crypto::digest_hex(&algo, &data)?;
            println!("{hex}  {}", file.display());
            Ok(())
        }
        Command::Hex { op: HexOp::Encode { text } } => {
            println!("{}", pcl::string::hex_encode(text.as_bytes()));
            Ok(())
        }
        Command::Hex { op: HexOp::Decode { text } } => {
            let bytes = pcl::string::hex_decode(&text)?;
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
        Command::Ls { dir } => ls(&dir),
        Command::Exec { command } => {
            let line: Vec<String> = command.iter().map(|a| quote_arg(a)).collect();
            let out = pcl::sys::exec(&line.join(" "))?;
            io::stdout().lock().write_all(out.stdout.as_bytes())?;
            io::stderr().lock().write_all(out.stderr.as_bytes())?;
            log::info!("exit status: {:?}", out.status);
            Ok(())
        }
        Command::ErrorDemo => {
            if let Err(e) = demo_outer() {
                print!("{}", e.report(0, Some("error-demo")));
                println!("{}", e.to_json(Some("error-demo")));
            }
            Ok(())
        }
    }
}

/// Escapes the characters `parse_cmd` treats specially so `arg` survives as one argument.
fn quote_arg(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    for c in arg.chars() {
        if matches!(c, '\\' | '"' | ' ' | '\t') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn json(file: &Path, query: Option<&str>, compact: bool) -> Result<(), CliError> {
    let text = fs::read(file)
        .map_err(pcl::Error::from)
        .trace_msg(format!("reading '{}'", file.display()))?;
    let (value, end) = pcl::json::parse_bytes(&text).trace_msg(format!("parsing '{}'", file.display()))?;
    if text[end..].iter().any(|b| !b.is_ascii_whitespace()) {
        return Err(err!(ErrorCode::Syntax, "unexpected trailing data at offset {end}").into());
    }

    let render = |v: &Value| pcl::json::encode(v, !compact);
    match query {
        None => println!("{}", render(&value)),
        Some(expr) => {
            let path = JsonPath::compile(expr)?;
            let found = path.matches(&value);
            log::debug!("{expr}: {} matches", found.len());
            for v in found {
                println!("{}", render(v));
            }
        }
    }
    Ok(())
}

fn ls(dir: &Path) -> Result<(), CliError> {
    for entry in pcl::sys::read_dir(dir)? {
        let st = pcl::sys::stat(dir.join(&entry.name))?;
        println!(
            "{} {:>9} {}",
            st.mode_string(),
            pcl::string::fbytes(st.size, 1),
            entry.name
        );
    }
    Ok(())
}

fn demo_inner() -> pcl::Result<()> {
    Err(err!(ErrorCode::NoEntry, "cannot find '{}'", "settings.json"))
}

fn demo_middle() -> pcl::Result<()> {
    demo_inner().map_err(|e| trc!(e, "loading settings"))
}

fn demo_outer() -> pcl::Result<()> {
    demo_middle().map_err(|e| trc!(e))
}
