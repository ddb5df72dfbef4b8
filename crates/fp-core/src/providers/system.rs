//! Host adapters for the provider capabilities.
//!
//! These cover desktop and server hosts. There is no cellular adapter here:
//! such hosts have no carrier enumeration API, so the cellular harvester is
//! simply not registered.

use super::{
    CpuInfo, DeviceIdentity, DocumentsDirectoryError, FileAttributeKey, FileSystemAttributes,
    Rect, ScreenInfo, TimeZoneInfo,
};
use crate::sysctl::AttributeQuery;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Time zone from `TZ`, then the `/etc/localtime` link target, else `UTC`.
#[derive(Debug, Clone)]
pub struct SystemTimeZone {
    tz_env: Option<String>,
    localtime: PathBuf,
}

impl Default for SystemTimeZone {
    fn default() -> Self {
        Self {
            tz_env: std::env::var("TZ").ok(),
            localtime: PathBuf::from("/etc/localtime"),
        }
    }
}

impl SystemTimeZone {
    /// Resolve from explicit sources instead of the process environment.
    pub fn from_sources(tz_env: Option<String>, localtime: impl Into<PathBuf>) -> Self {
        Self {
            tz_env,
            localtime: localtime.into(),
        }
    }
}

impl TimeZoneInfo for SystemTimeZone {
    fn identifier(&self) -> String {
        if let Some(tz) = &self.tz_env {
            let tz = tz.trim_start_matches(':').trim();
            if !tz.is_empty() {
                return tz.to_string();
            }
        }

        if let Ok(target) = fs::read_link(&self.localtime) {
            if let Some(zone) = zone_from_link(&target) {
                return zone;
            }
        }

        trace!("no time zone source found, using UTC");
        "UTC".to_string()
    }
}

/// `/usr/share/zoneinfo/Europe/Prague` -> `Europe/Prague`.
///
/// The `posix/` and `right/` subtrees hold the same zones under a prefix.
fn zone_from_link(target: &Path) -> Option<String> {
    let text = target.to_string_lossy();
    let (_, zone) = text.split_once("zoneinfo/")?;
    let zone = ["posix/", "right/"]
        .iter()
        .find_map(|prefix| zone.strip_prefix(prefix))
        .unwrap_or(zone);
    if zone.is_empty() {
        None
    } else {
        Some(zone.to_string())
    }
}

/// Screen metrics for hosts without a display service: zero-sized bounds at
/// scale 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessScreen;

impl ScreenInfo for HeadlessScreen {
    fn native_bounds(&self) -> Rect {
        Rect::default()
    }

    fn native_scale(&self) -> f64 {
        1.0
    }
}

/// Identity from the hardware model attribute and the host name.
pub struct HostDeviceIdentity<'a> {
    system: &'a dyn AttributeQuery,
}

impl<'a> HostDeviceIdentity<'a> {
    pub fn new(system: &'a dyn AttributeQuery) -> Self {
        Self { system }
    }
}

impl DeviceIdentity for HostDeviceIdentity<'_> {
    fn model(&self) -> String {
        self.system
            .hardware_model()
            .unwrap_or_else(|| std::env::consts::OS.to_string())
    }

    fn user_assigned_name(&self) -> Option<String> {
        host_name()
    }
}

fn host_name() -> Option<String> {
    #[cfg(unix)]
    {
        let mut buf = [0u8; 256];
        // SAFETY: the buffer is valid for `buf.len()` bytes.
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
        if rc != 0 {
            debug!(error = %std::io::Error::last_os_error(), "gethostname failed");
            return None;
        }
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let name = String::from_utf8_lossy(&buf[..end]).trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
    #[cfg(not(unix))]
    {
        std::env::var("COMPUTERNAME").ok().filter(|name| !name.is_empty())
    }
}

/// Volume attributes of the user's documents directory.
#[derive(Debug, Clone)]
pub struct DocumentsDirectory {
    path: Option<PathBuf>,
}

impl Default for DocumentsDirectory {
    fn default() -> Self {
        Self {
            path: dirs::document_dir().or_else(dirs::home_dir),
        }
    }
}

impl DocumentsDirectory {
    /// Use an explicit directory.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl FileSystemAttributes for DocumentsDirectory {
    fn documents_directory_attributes(
        &self,
    ) -> Result<BTreeMap<FileAttributeKey, u64>, DocumentsDirectoryError> {
        let path = self
            .path
            .as_deref()
            .filter(|path| path.is_dir())
            .ok_or(DocumentsDirectoryError::DirectoryNotFound)?;
        volume_attributes(path).map_err(|source| DocumentsDirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(unix)]
fn volume_attributes(path: &Path) -> std::io::Result<BTreeMap<FileAttributeKey, u64>> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let mut stat = std::mem::MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: `c_path` is NUL-terminated and `stat` is only read on success.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    let stat = unsafe { stat.assume_init() };

    let fragment = stat.f_frsize as u64;
    let mut attributes = BTreeMap::new();
    attributes.insert(
        FileAttributeKey::SystemFreeSize,
        (stat.f_bavail as u64).saturating_mul(fragment),
    );
    attributes.insert(
        FileAttributeKey::SystemSize,
        (stat.f_blocks as u64).saturating_mul(fragment),
    );
    attributes.insert(FileAttributeKey::SystemNodes, stat.f_files as u64);
    attributes.insert(FileAttributeKey::SystemFreeNodes, stat.f_ffree as u64);
    Ok(attributes)
}

#[cfg(not(unix))]
fn volume_attributes(_path: &Path) -> std::io::Result<BTreeMap<FileAttributeKey, u64>> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "volume attributes are not supported on this platform",
    ))
}

/// Online logical CPUs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCpuInfo;

impl CpuInfo for HostCpuInfo {
    fn processor_count(&self) -> usize {
        #[cfg(unix)]
        {
            // SAFETY: sysconf has no memory-safety preconditions.
            let cpus = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
            if cpus > 0 {
                return cpus as usize;
            }
        }

        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_zone_prefers_tz_env() {
        let tz = SystemTimeZone::from_sources(Some(":Europe/Prague".into()), "/nonexistent");
        assert_eq!(tz.identifier(), "Europe/Prague");
    }

    #[test]
    fn test_time_zone_defaults_to_utc() {
        let tz = SystemTimeZone::from_sources(None, "/nonexistent/localtime");
        assert_eq!(tz.identifier(), "UTC");
        let blank = SystemTimeZone::from_sources(Some("  ".into()), "/nonexistent/localtime");
        assert_eq!(blank.identifier(), "UTC");
    }

    #[cfg(unix)]
    #[test]
    fn test_time_zone_from_localtime_link() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("localtime");
        std::os::unix::fs::symlink("/usr/share/zoneinfo/America/New_York", &link).unwrap();
        let tz = SystemTimeZone::from_sources(None, &link);
        assert_eq!(tz.identifier(), "America/New_York");
    }

    #[test]
    fn test_zone_from_link() {
        assert_eq!(
            zone_from_link(Path::new("/var/db/timezone/zoneinfo/Asia/Tokyo")).as_deref(),
            Some("Asia/Tokyo")
        );
        assert_eq!(zone_from_link(Path::new("/etc/UTC")), None);
    }

    #[test]
    fn test_zone_from_link_strips_leap_and_posix_trees() {
        assert_eq!(
            zone_from_link(Path::new("/usr/share/zoneinfo/posix/Europe/Prague")).as_deref(),
            Some("Europe/Prague")
        );
        assert_eq!(
            zone_from_link(Path::new("/usr/share/zoneinfo/right/America/New_York")).as_deref(),
            Some("America/New_York")
        );
        assert_eq!(zone_from_link(Path::new("/usr/share/zoneinfo/posix/")), None);
    }

    #[test]
    fn test_headless_screen() {
        assert_eq!(HeadlessScreen.native_bounds(), Rect::default());
        assert_eq!(HeadlessScreen.native_scale(), 1.0);
    }

    #[test]
    fn test_missing_documents_directory() {
        let dir = DocumentsDirectory::at("/definitely/not/a/real/dir");
        assert!(matches!(
            dir.documents_directory_attributes(),
            Err(DocumentsDirectoryError::DirectoryNotFound)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_documents_directory_reports_both_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let attrs = DocumentsDirectory::at(dir.path())
            .documents_directory_attributes()
            .unwrap();
        let total = attrs[&FileAttributeKey::SystemSize];
        let free = attrs[&FileAttributeKey::SystemFreeSize];
        assert!(free <= total);
    }

    #[test]
    fn test_processor_count_is_positive() {
        assert!(HostCpuInfo.processor_count() >= 1);
    }
}
