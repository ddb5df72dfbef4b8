//! Safe system attribute queries.
//!
//! The kernel attribute interface (`sysctl(3)` on Darwin and the BSDs) returns
//! variable-length data through a two-phase protocol: probe for the required
//! buffer size, then read into a buffer of that size. The value may change
//! between the two calls, so [`SystemControl`] re-probes and retries exactly
//! once when the read reports that the buffer is too small.
//!
//! Every failure along the way (probe, allocation, read, decode) collapses to
//! [`AttributeValue::Absent`]. Nothing in this module returns an error at query
//! time; only constructing a malformed [`CustomPath`] does.
//!
//! # Backends
//! - [`NativeSysctl`]: `libc::sysctl` on macOS, iOS and FreeBSD.
//! - [`ProcfsSysctl`]: Linux emulation over `/proc`, sysfs, `uname(2)` and
//!   `sysconf(3)`, speaking the same probe/read protocol.

mod backend;
mod procfs;

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
pub use backend::NativeSysctl;
pub use backend::{default_backend, DefaultBackend, SysctlBackend, UnsupportedSysctl};
pub use procfs::ProcfsSysctl;

use chrono::{DateTime, Utc};
use fp_common::{AttributeValue, Error, Result};
use tracing::{debug, trace};

/// MIB codes for the built-in keys (BSD/Darwin numbering).
pub mod mib {
    pub const CTL_KERN: i32 = 1;
    pub const CTL_HW: i32 = 6;

    pub const KERN_OSTYPE: i32 = 1;
    pub const KERN_OSRELEASE: i32 = 2;
    pub const KERN_OSREV: i32 = 3;
    pub const KERN_VERSION: i32 = 4;
    pub const KERN_BOOTTIME: i32 = 21;
    pub const KERN_OSVERSION: i32 = 65;

    pub const HW_MACHINE: i32 = 1;
    pub const HW_MODEL: i32 = 2;
    pub const HW_NCPU: i32 = 3;
    pub const HW_PHYSMEM: i32 = 5;
    pub const HW_CPU_FREQ: i32 = 15;
    pub const HW_MEMSIZE: i32 = 24;

    /// Longest MIB path the kernel accepts.
    pub const CTL_MAXNAME: usize = 24;
}

/// How the raw bytes of an attribute are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// NUL-terminated UTF-8 string.
    Text,
    /// Native-endian 4-byte signed integer.
    Int32,
    /// Native-endian 8-byte signed integer.
    Int64,
    /// Uninterpreted bytes.
    Raw,
}

/// A caller-supplied MIB path with its decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomPath {
    path: Vec<i32>,
    kind: ValueKind,
}

impl CustomPath {
    /// Validate a raw path. Empty paths and paths longer than
    /// [`mib::CTL_MAXNAME`] are programming errors.
    pub fn new(path: Vec<i32>, kind: ValueKind) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidAttributePath {
                path,
                reason: "path must contain at least one component".to_string(),
            });
        }
        if path.len() > mib::CTL_MAXNAME {
            let reason = format!(
                "path has {} components, limit is {}",
                path.len(),
                mib::CTL_MAXNAME
            );
            return Err(Error::InvalidAttributePath { path, reason });
        }
        Ok(Self { path, kind })
    }

    pub fn path(&self) -> &[i32] {
        &self.path
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Identifier of a system attribute.
///
/// The path behind each built-in key is fixed forever: changing it would make
/// fingerprints from different releases incomparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    HardwareMachine,
    HardwareModel,
    CpuCount,
    PhysicalMemory,
    CpuFrequency,
    MemSize,
    OsType,
    OsRelease,
    OsBuild,
    KernelVersion,
    BootTime,
    OsVersion,
    Custom(CustomPath),
}

impl AttributeKey {
    /// Every built-in key.
    pub const BUILT_IN: [AttributeKey; 12] = [
        AttributeKey::HardwareMachine,
        AttributeKey::HardwareModel,
        AttributeKey::CpuCount,
        AttributeKey::PhysicalMemory,
        AttributeKey::CpuFrequency,
        AttributeKey::MemSize,
        AttributeKey::OsType,
        AttributeKey::OsRelease,
        AttributeKey::OsBuild,
        AttributeKey::KernelVersion,
        AttributeKey::BootTime,
        AttributeKey::OsVersion,
    ];

    /// Build a custom key, validating the path.
    pub fn custom(path: Vec<i32>, kind: ValueKind) -> Result<Self> {
        CustomPath::new(path, kind).map(AttributeKey::Custom)
    }

    /// MIB path queried for this key.
    pub fn path(&self) -> &[i32] {
        use mib::*;
        match self {
            AttributeKey::HardwareMachine => &[CTL_HW, HW_MACHINE],
            AttributeKey::HardwareModel => &[CTL_HW, HW_MODEL],
            AttributeKey::CpuCount => &[CTL_HW, HW_NCPU],
            AttributeKey::PhysicalMemory => &[CTL_HW, HW_PHYSMEM],
            AttributeKey::CpuFrequency => &[CTL_HW, HW_CPU_FREQ],
            AttributeKey::MemSize => &[CTL_HW, HW_MEMSIZE],
            AttributeKey::OsType => &[CTL_KERN, KERN_OSTYPE],
            AttributeKey::OsRelease => &[CTL_KERN, KERN_OSRELEASE],
            AttributeKey::OsBuild => &[CTL_KERN, KERN_OSREV],
            AttributeKey::KernelVersion => &[CTL_KERN, KERN_VERSION],
            AttributeKey::BootTime => &[CTL_KERN, KERN_BOOTTIME],
            AttributeKey::OsVersion => &[CTL_KERN, KERN_OSVERSION],
            AttributeKey::Custom(custom) => custom.path(),
        }
    }

    /// Decoding applied to the raw bytes.
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeKey::HardwareMachine
            | AttributeKey::HardwareModel
            | AttributeKey::OsType
            | AttributeKey::OsRelease
            | AttributeKey::KernelVersion
            | AttributeKey::OsVersion => ValueKind::Text,
            AttributeKey::CpuCount
            | AttributeKey::PhysicalMemory
            | AttributeKey::CpuFrequency
            | AttributeKey::OsBuild => ValueKind::Int32,
            AttributeKey::MemSize => ValueKind::Int64,
            AttributeKey::BootTime => ValueKind::Raw,
            AttributeKey::Custom(custom) => custom.kind(),
        }
    }

    /// Conventional sysctl name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKey::HardwareMachine => "hw.machine",
            AttributeKey::HardwareModel => "hw.model",
            AttributeKey::CpuCount => "hw.ncpu",
            AttributeKey::PhysicalMemory => "hw.physmem",
            AttributeKey::CpuFrequency => "hw.cpufrequency",
            AttributeKey::MemSize => "hw.memsize",
            AttributeKey::OsType => "kern.ostype",
            AttributeKey::OsRelease => "kern.osrelease",
            AttributeKey::OsBuild => "kern.osrevision",
            AttributeKey::KernelVersion => "kern.version",
            AttributeKey::BootTime => "kern.boottime",
            AttributeKey::OsVersion => "kern.osversion",
            AttributeKey::Custom(_) => "custom",
        }
    }
}

/// Source of decoded attribute values.
///
/// Harvesters depend on this trait rather than on [`SystemControl`] so they
/// can be driven by an in-memory table in tests.
pub trait AttributeQuery: Send + Sync {
    /// Query one attribute. Never fails; unavailable data is `Absent`.
    fn query(&self, key: &AttributeKey) -> AttributeValue;

    fn hardware_machine(&self) -> Option<String> {
        text(self.query(&AttributeKey::HardwareMachine))
    }

    fn hardware_model(&self) -> Option<String> {
        text(self.query(&AttributeKey::HardwareModel))
    }

    fn cpu_count(&self) -> Option<i64> {
        self.query(&AttributeKey::CpuCount).as_integer()
    }

    fn physical_memory(&self) -> Option<i64> {
        self.query(&AttributeKey::PhysicalMemory).as_integer()
    }

    fn cpu_frequency(&self) -> Option<i64> {
        self.query(&AttributeKey::CpuFrequency).as_integer()
    }

    fn mem_size(&self) -> Option<i64> {
        self.query(&AttributeKey::MemSize).as_integer()
    }

    fn os_type(&self) -> Option<String> {
        text(self.query(&AttributeKey::OsType))
    }

    fn os_release(&self) -> Option<String> {
        text(self.query(&AttributeKey::OsRelease))
    }

    fn os_build(&self) -> Option<i64> {
        self.query(&AttributeKey::OsBuild).as_integer()
    }

    fn kernel_version(&self) -> Option<String> {
        text(self.query(&AttributeKey::KernelVersion))
    }

    fn os_version(&self) -> Option<String> {
        text(self.query(&AttributeKey::OsVersion))
    }

    /// Boot time at one-second precision, decoded from a `struct timeval`.
    fn boot_time(&self) -> Option<DateTime<Utc>> {
        let value = self.query(&AttributeKey::BootTime);
        let bytes = value.as_bytes()?;
        let seconds = i64::from_ne_bytes(bytes.get(..8)?.try_into().ok()?);
        DateTime::from_timestamp(seconds, 0)
    }
}

fn text(value: AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Text(text) => Some(text),
        _ => None,
    }
}

/// Attribute query over a probing backend.
#[derive(Debug, Clone, Default)]
pub struct SystemControl<B = DefaultBackend> {
    backend: B,
}

impl SystemControl<DefaultBackend> {
    /// Query the running system through the platform backend.
    pub fn system() -> Self {
        Self::new(default_backend())
    }
}

impl<B: SysctlBackend> SystemControl<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the probe-then-read protocol for `path`.
    ///
    /// Returns `None` on any failure. A read that reports a shorter length
    /// than probed is truncated; a read that needs more room is retried once
    /// after a fresh probe.
    pub fn read_raw(&self, path: &[i32]) -> Option<Vec<u8>> {
        let mut size = self.probe(path)?;

        for attempt in 0..2 {
            let mut buf = Vec::new();
            if buf.try_reserve_exact(size).is_err() {
                debug!(?path, size, "attribute buffer allocation failed");
                return None;
            }
            buf.resize(size, 0);

            match self.backend.read(path, Some(&mut buf)) {
                Ok(written) => {
                    buf.truncate(written.min(size));
                    trace!(?path, len = buf.len(), "attribute read");
                    return Some(buf);
                }
                Err(err) if attempt == 0 && err.raw_os_error() == Some(libc::ENOMEM) => {
                    trace!(?path, size, "attribute grew between probe and read, re-probing");
                    size = self.probe(path)?;
                }
                Err(err) => {
                    debug!(?path, error = %err, "attribute read failed");
                    return None;
                }
            }
        }

        debug!(?path, "attribute size kept changing, giving up");
        None
    }

    fn probe(&self, path: &[i32]) -> Option<usize> {
        match self.backend.read(path, None) {
            Ok(0) => {
                debug!(?path, "attribute probe reported zero length");
                None
            }
            Ok(size) => Some(size),
            Err(err) => {
                debug!(?path, error = %err, "attribute probe failed");
                None
            }
        }
    }
}

impl<B: SysctlBackend + Send + Sync> AttributeQuery for SystemControl<B> {
    fn query(&self, key: &AttributeKey) -> AttributeValue {
        let value = match self.read_raw(key.path()) {
            Some(bytes) => decode(key.kind(), bytes),
            None => AttributeValue::Absent,
        };
        if value.is_absent() {
            debug!(key = key.name(), "attribute unavailable");
        }
        value
    }
}

/// Decode raw attribute bytes according to `kind`.
pub fn decode(kind: ValueKind, mut bytes: Vec<u8>) -> AttributeValue {
    match kind {
        ValueKind::Text => {
            if bytes.last() == Some(&0) {
                bytes.pop();
            }
            if bytes.is_empty() {
                return AttributeValue::Absent;
            }
            String::from_utf8(bytes)
                .map(AttributeValue::Text)
                .unwrap_or(AttributeValue::Absent)
        }
        ValueKind::Int32 => match <[u8; 4]>::try_from(bytes.as_slice()) {
            Ok(raw) => AttributeValue::Integer(i64::from(i32::from_ne_bytes(raw))),
            Err(_) => AttributeValue::Absent,
        },
        ValueKind::Int64 => match <[u8; 8]>::try_from(bytes.as_slice()) {
            Ok(raw) => AttributeValue::Integer(i64::from_ne_bytes(raw)),
            Err(_) => AttributeValue::Absent,
        },
        ValueKind::Raw => {
            if bytes.is_empty() {
                AttributeValue::Absent
            } else {
                AttributeValue::Bytes(bytes)
            }
        }
    }
}
