//! Hardware attributes: device identity, display, memory, CPU and storage.

use super::{Harvester, UNDEFINED};
use crate::config::{labels, Category};
use crate::providers::{
    CpuInfo, DeviceIdentity, FileAttributeKey, FileSystemAttributes, ScreenInfo, Size,
};
use crate::sysctl::{AttributeKey, AttributeQuery};
use fp_common::FingerprintItem;
use tracing::{debug, warn};

/// Free and total bytes of the documents volume.
///
/// Either both values come from the same successful lookup, or both are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskSpace {
    pub free: u64,
    pub total: u64,
}

pub struct HardwareInfoHarvester<'a> {
    device: &'a dyn DeviceIdentity,
    screen: &'a dyn ScreenInfo,
    system: &'a dyn AttributeQuery,
    file_system: &'a dyn FileSystemAttributes,
    cpu: &'a dyn CpuInfo,
}

impl<'a> HardwareInfoHarvester<'a> {
    pub fn new(
        device: &'a dyn DeviceIdentity,
        screen: &'a dyn ScreenInfo,
        system: &'a dyn AttributeQuery,
        file_system: &'a dyn FileSystemAttributes,
        cpu: &'a dyn CpuInfo,
    ) -> Self {
        Self {
            device,
            screen,
            system,
            file_system,
            cpu,
        }
    }

    /// User-assigned name; the model is consulted only when there is none.
    pub fn device_name(&self) -> String {
        self.device
            .user_assigned_name()
            .unwrap_or_else(|| self.device.model())
    }

    pub fn device_type(&self) -> String {
        self.device.model()
    }

    /// Machine identifier, e.g. `iPhone13,2` or `arm64`.
    pub fn device_model(&self) -> String {
        self.system
            .query(&AttributeKey::HardwareMachine)
            .text_or(UNDEFINED)
    }

    pub fn display_resolution(&self) -> Size {
        self.screen.native_bounds().size()
    }

    pub fn display_scale(&self) -> f64 {
        self.screen.native_scale()
    }

    /// Installed memory in bytes.
    pub fn physical_memory(&self) -> u64 {
        let bytes = self.system.query(&AttributeKey::MemSize).integer_or(0);
        u64::try_from(bytes).unwrap_or(0)
    }

    pub fn processor_count(&self) -> usize {
        self.cpu.processor_count()
    }

    pub fn free_disk_space(&self) -> u64 {
        self.disk_space().free
    }

    pub fn total_disk_space(&self) -> u64 {
        self.disk_space().total
    }

    /// Both disk metrics from one attribute lookup.
    pub fn disk_space(&self) -> DiskSpace {
        let attributes = match self.file_system.documents_directory_attributes() {
            Ok(attributes) => attributes,
            Err(err) => {
                warn!(error = %err, "documents directory attributes unavailable");
                return DiskSpace::default();
            }
        };

        match (
            attributes.get(&FileAttributeKey::SystemFreeSize),
            attributes.get(&FileAttributeKey::SystemSize),
        ) {
            (Some(&free), Some(&total)) => DiskSpace { free, total },
            _ => {
                debug!(keys = attributes.len(), "disk space attributes incomplete");
                DiskSpace::default()
            }
        }
    }
}

impl Harvester for HardwareInfoHarvester<'_> {
    fn category(&self) -> Category {
        Category::Hardware
    }

    fn items(&self) -> Vec<FingerprintItem> {
        let disk = self.disk_space();
        vec![
            FingerprintItem::new(labels::DEVICE_NAME, self.device_name()),
            FingerprintItem::new(labels::DEVICE_TYPE, self.device_type()),
            FingerprintItem::new(labels::DEVICE_MODEL, self.device_model()),
            FingerprintItem::new(
                labels::DISPLAY_RESOLUTION,
                self.display_resolution().to_string(),
            ),
            FingerprintItem::new(labels::DISPLAY_SCALE, self.display_scale()),
            FingerprintItem::new(labels::PHYSICAL_MEMORY, self.physical_memory()),
            FingerprintItem::new(labels::PROCESSOR_COUNT, self.processor_count()),
            FingerprintItem::new(labels::FREE_DISK_SPACE, disk.free),
            FingerprintItem::new(labels::TOTAL_DISK_SPACE, disk.total),
        ]
    }
}
