//! Provider capabilities consumed by the harvesters.
//!
//! Each trait exposes exactly the operations a harvester needs from one
//! platform service. Harvesters borrow these as trait objects and never see a
//! concrete platform type, so tests can substitute deterministic fakes.
//!
//! Default host adapters live in [`system`].

pub mod system;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub use system::{
    DocumentsDirectory, HeadlessScreen, HostCpuInfo, HostDeviceIdentity, SystemTimeZone,
};

/// Current time zone.
pub trait TimeZoneInfo: Send + Sync {
    /// IANA identifier, e.g. `Europe/Prague`.
    fn identifier(&self) -> String;
}

/// One cellular carrier (SIM/eSIM subscription).
pub trait CarrierInfo: Send + Sync {
    fn country_code(&self) -> Option<String>;
    fn network_code(&self) -> Option<String>;
}

/// Cellular service enumeration.
pub trait CellularServiceInfo: Send + Sync {
    /// All carriers, in whatever order the platform reports them.
    fn providers(&self) -> Vec<Arc<dyn CarrierInfo>>;
}

/// Axis-aligned rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Width and height in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Main display metrics.
pub trait ScreenInfo: Send + Sync {
    fn native_bounds(&self) -> Rect;
    fn native_scale(&self) -> f64;
}

/// Device identity as reported by the platform.
pub trait DeviceIdentity: Send + Sync {
    /// Generic model string, e.g. `iPhone`.
    fn model(&self) -> String;
    /// Name the owner gave the device, if the platform exposes one.
    fn user_assigned_name(&self) -> Option<String>;
}

/// Keys of the documents directory attribute map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAttributeKey {
    /// Free bytes on the volume.
    SystemFreeSize,
    /// Total bytes on the volume.
    SystemSize,
    /// Total file nodes on the volume.
    SystemNodes,
    /// Free file nodes on the volume.
    SystemFreeNodes,
}

/// Failure to look up documents directory attributes.
#[derive(Debug, Error)]
pub enum DocumentsDirectoryError {
    #[error("documents directory not found")]
    DirectoryNotFound,

    #[error("failed to read attributes of {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File-system attributes of the volume holding the documents directory.
pub trait FileSystemAttributes: Send + Sync {
    fn documents_directory_attributes(
        &self,
    ) -> Result<BTreeMap<FileAttributeKey, u64>, DocumentsDirectoryError>;
}

/// Processor information.
pub trait CpuInfo: Send + Sync {
    fn processor_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_display() {
        let bounds = Rect::new(0.0, 0.0, 1170.0, 2532.0);
        assert_eq!(bounds.size().to_string(), "1170x2532");
    }

    #[test]
    fn test_file_attribute_keys_are_ordered() {
        let mut keys = vec![FileAttributeKey::SystemSize, FileAttributeKey::SystemFreeSize];
        keys.sort();
        assert_eq!(
            keys,
            vec![FileAttributeKey::SystemFreeSize, FileAttributeKey::SystemSize]
        );
    }
}
