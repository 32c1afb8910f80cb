//! Host information.
//!
//! The `/proc` and `/etc` readers are split from their parsers, which are plain
//! functions over file contents.

use std::collections::BTreeSet;
use std::fs;

use chrono::{Local, Offset};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SysInfo {
    pub cpu_sockets: u32,
    pub cpu_cores: u32,
    pub cpu_model: String,
    /// Seconds east of UTC.
    pub gmtoff: i32,
    pub tzabbr: String,
    pub hostname: String,
    /// Hostname up to the first dot.
    pub name: String,
    /// Total physical memory in bytes.
    pub memory: u64,
    /// Kernel name, release and build.
    pub version: String,
    /// Distribution name.
    pub vendor: String,
}

const RELEASE_FILES: &[&str] = &[
    "/etc/redhat-release",
    "/etc/SuSE-release",
    "/etc/fedora-release",
    "/etc/gentoo-release",
    "/etc/slackware-release",
    "/etc/centos-release",
    "/etc/slackware-version",
];

/// Collects information about the running host. Missing sources leave their
/// fields at defaults.
pub fn sysinfo() -> SysInfo {
    let mut info = SysInfo::default();

    let offset = Local::now().offset().fix();
    info.gmtoff = offset.local_minus_utc();
    info.tzabbr = tz_abbr(std::env::var("TZ").ok().as_deref(), info.gmtoff);

    info.hostname = hostname();
    info.name = short_name(&info.hostname).to_string();

    info.vendor = distro();
    info.memory = read("/proc/meminfo").map(|s| parse_meminfo(&s)).unwrap_or(0);

    if let Some(text) = read("/proc/cpuinfo") {
        let cpu = parse_cpuinfo(&text);
        info.cpu_sockets = cpu.sockets;
        info.cpu_cores = cpu.cores;
        info.cpu_model = cpu.model;
    }
    if info.cpu_cores == 0 {
        log::debug!("no physical id rows in /proc/cpuinfo, counting cores with num_cpus");
        info.cpu_cores = num_cpus::get() as u32;
        info.cpu_sockets = info.cpu_sockets.max(1);
    }
    info.cpu_model = clean_model(&info.cpu_model);

    info.version = ["ostype", "osrelease", "version"]
        .iter()
        .filter_map(|f| read(&format!("/proc/sys/kernel/{f}")))
        .map(|s| s.trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    if info.version.is_empty() {
        info.version = std::env::consts::OS.to_string();
    }
    info
}

fn read(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            log::debug!("sysinfo: cannot read {path}: {e}");
            None
        }
    }
}

/// `TZ` when set, `UTC` for a zero offset, otherwise the offset as `+hh:mm`.
fn tz_abbr(tz: Option<&str>, gmtoff: i32) -> String {
    match tz.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tz) => tz.trim_start_matches(':').to_string(),
        None if gmtoff == 0 => "UTC".to_string(),
        None => {
            let sign = if gmtoff < 0 { '-' } else { '+' };
            let secs = gmtoff.unsigned_abs();
            format!("{sign}{:02}:{:02}", secs / 3600, secs % 3600 / 60)
        }
    }
}

pub fn hostname() -> String {
    read("/proc/sys/kernel/hostname")
        .or_else(|| read("/etc/hostname"))
        .or_else(|| std::env::var("HOSTNAME").ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn short_name(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}

fn distro() -> String {
    if let Some(name) = read("/etc/os-release").and_then(|s| parse_os_release(&s)) {
        return name;
    }
    RELEASE_FILES
        .iter()
        .filter_map(|f| fs::read_to_string(f).ok())
        .find_map(|s| parse_release_file(&s))
        .unwrap_or_else(|| "Linux".to_string())
}

/// Distribution name from `os-release` contents: `NAME VERSION`, else `PRETTY_NAME`,
/// else `NAME`. The first occurrence of each key wins.
pub fn parse_os_release(text: &str) -> Option<String> {
    let mut name = None;
    let mut version = None;
    let mut pretty = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = pcl_string::trim_set(value.trim(), "\"", true, true);
        if value.is_empty() {
            continue;
        }
        let slot = match key.trim().to_ascii_uppercase().as_str() {
            "NAME" => &mut name,
            "VERSION" => &mut version,
            "PRETTY_NAME" => &mut pretty,
            _ => continue,
        };
        slot.get_or_insert_with(|| value.to_string());
    }

    match (name, version, pretty) {
        (Some(n), Some(v), _) => Some(format!("{n} {v}")),
        (_, _, Some(p)) => Some(p),
        (n, _, None) => n,
    }
}

/// First line of a legacy `/etc/*-release` file.
pub fn parse_release_file(text: &str) -> Option<String> {
    text.lines()
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

/// `MemTotal` from `/proc/meminfo` contents, in bytes.
pub fn parse_meminfo(text: &str) -> u64 {
    let Some(line) = text
        .lines()
        .find(|l| l.get(..9).is_some_and(|k| k.eq_ignore_ascii_case("MemTotal:")))
    else {
        return 0;
    };
    let rest = line[9..].trim_start();
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let amount: u64 = rest[..digits].parse().unwrap_or(0);
    let scale: u64 = match rest[digits..].trim_start().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('k') => 1 << 10,
        Some('m') => 1 << 20,
        Some('g') => 1 << 30,
        Some('t') => 1 << 40,
        _ => 1,
    };
    amount.saturating_mul(scale)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuInfo {
    pub sockets: u32,
    pub cores: u32,
    pub model: String,
}

/// Model name and socket/core counts from `/proc/cpuinfo` contents. Every
/// `physical id` row is a core; distinct ids are sockets.
pub fn parse_cpuinfo(text: &str) -> CpuInfo {
    let mut info = CpuInfo::default();
    let mut sockets = BTreeSet::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "model name" if info.model.is_empty() => info.model = value.trim().to_string(),
            "physical id" => {
                if let Ok((id, _)) = pcl_string::strtol(value, 10) {
                    sockets.insert(id);
                }
                info.cores += 1;
            }
            _ => {}
        }
    }
    info.sockets = sockets.len() as u32;
    info
}

/// Collapses runs of spaces and trims.
fn clean_model(model: &str) -> String {
    model.split(' ').filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ")
}
