//! Linux emulation of the attribute interface.
//!
//! Linux has no `sysctl(2)` for these MIBs, so each built-in path is mapped
//! onto the file or libc call that carries the same information. Values are
//! encoded the way the BSD kernel returns them (NUL-terminated strings,
//! native-endian integers, `struct timeval`) so decoding is platform neutral.
//!
//! # Data Sources
//! - `/proc/sys/kernel/{ostype,osrelease,version}` - kernel strings
//! - `/proc/stat` (`btime`) - boot time
//! - `/sys/devices/virtual/dmi/id/product_name` - hardware model
//! - `/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq` - CPU frequency (kHz)
//! - `uname(2)` machine field, `sysconf(3)` page and CPU counts

use super::backend::SysctlBackend;
use super::mib::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Procfs/sysfs-backed attribute source.
#[derive(Debug, Clone)]
pub struct ProcfsSysctl {
    root: PathBuf,
}

impl Default for ProcfsSysctl {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
        }
    }
}

impl ProcfsSysctl {
    /// Resolve file-backed attributes under `root` instead of `/`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Encoded value for `path`, or `ENOENT` for unmapped paths.
    fn lookup(&self, path: &[i32]) -> io::Result<Vec<u8>> {
        match path {
            [CTL_KERN, KERN_OSTYPE] => text_file(&self.file("proc/sys/kernel/ostype")),
            [CTL_KERN, KERN_OSRELEASE] => text_file(&self.file("proc/sys/kernel/osrelease")),
            [CTL_KERN, KERN_VERSION] => text_file(&self.file("proc/sys/kernel/version")),
            [CTL_KERN, KERN_BOOTTIME] => boot_time(&self.file("proc/stat")),
            [CTL_HW, HW_MODEL] => {
                text_file(&self.file("sys/devices/virtual/dmi/id/product_name"))
            }
            [CTL_HW, HW_MACHINE] => machine(),
            [CTL_HW, HW_NCPU] => {
                let cpus = sysconf(SysconfName::ProcessorsConfigured)?;
                Ok(clamp_i32(cpus).to_ne_bytes().to_vec())
            }
            [CTL_HW, HW_PHYSMEM] => Ok(clamp_i32(physical_memory()?).to_ne_bytes().to_vec()),
            [CTL_HW, HW_MEMSIZE] => Ok(physical_memory()?.to_ne_bytes().to_vec()),
            [CTL_HW, HW_CPU_FREQ] => cpu_frequency(
                &self.file("sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq"),
            ),
            _ => Err(io::Error::from_raw_os_error(libc::ENOENT)),
        }
    }
}

impl SysctlBackend for ProcfsSysctl {
    fn read(&self, path: &[i32], buf: Option<&mut [u8]>) -> io::Result<usize> {
        let data = self.lookup(path)?;
        match buf {
            None => Ok(data.len()),
            Some(buf) => {
                if buf.len() < data.len() {
                    return Err(io::Error::from_raw_os_error(libc::ENOMEM));
                }
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
        }
    }
}

/// Read a text file and encode it as a NUL-terminated string.
fn text_file(path: &Path) -> io::Result<Vec<u8>> {
    let content = fs::read_to_string(path)?;
    Ok(nul_terminated(content.trim_end_matches('\n')))
}

fn nul_terminated(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    bytes
}

/// Parse `btime` from /proc/stat into a 16-byte `struct timeval`.
fn boot_time(stat: &Path) -> io::Result<Vec<u8>> {
    let content = fs::read_to_string(stat)?;
    let seconds = parse_btime(&content)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "no btime in /proc/stat"))?;
    let mut timeval = seconds.to_ne_bytes().to_vec();
    timeval.extend_from_slice(&0i64.to_ne_bytes());
    Ok(timeval)
}

fn parse_btime(content: &str) -> Option<i64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("btime "))
        .and_then(|value| value.trim().parse().ok())
}

/// Max CPU frequency in Hz as a 4-byte integer, saturating like `hw.physmem`.
fn cpu_frequency(path: &Path) -> io::Result<Vec<u8>> {
    let khz: i64 = fs::read_to_string(path)?
        .trim()
        .parse()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "malformed cpuinfo_max_freq"))?;
    Ok(clamp_i32(khz.saturating_mul(1000)).to_ne_bytes().to_vec())
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, Copy)]
enum SysconfName {
    ProcessorsConfigured,
    PhysicalPages,
    PageSize,
}

fn sysconf(name: SysconfName) -> io::Result<i64> {
    #[cfg(unix)]
    {
        let name = match name {
            SysconfName::ProcessorsConfigured => libc::_SC_NPROCESSORS_CONF,
            SysconfName::PhysicalPages => libc::_SC_PHYS_PAGES,
            SysconfName::PageSize => libc::_SC_PAGESIZE,
        };
        // SAFETY: sysconf has no memory-safety preconditions.
        let value = unsafe { libc::sysconf(name) };
        if value <= 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(value as i64)
    }
    #[cfg(not(unix))]
    {
        let _ = name;
        Err(io::Error::new(io::ErrorKind::Unsupported, "sysconf unavailable"))
    }
}

fn physical_memory() -> io::Result<i64> {
    let pages = sysconf(SysconfName::PhysicalPages)?;
    let page_size = sysconf(SysconfName::PageSize)?;
    Ok(pages.saturating_mul(page_size))
}

/// `uname(2)` machine field.
fn machine() -> io::Result<Vec<u8>> {
    #[cfg(unix)]
    {
        let mut uname = std::mem::MaybeUninit::<libc::utsname>::uninit();
        // SAFETY: uname fills the struct on success; we only read it then.
        let result = unsafe { libc::uname(uname.as_mut_ptr()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        let uname = unsafe { uname.assume_init() };
        let machine = unsafe {
            std::ffi::CStr::from_ptr(uname.machine.as_ptr())
                .to_string_lossy()
                .to_string()
        };
        Ok(nul_terminated(&machine))
    }
    #[cfg(not(unix))]
    {
        Ok(nul_terminated(std::env::consts::ARCH))
    }
}
