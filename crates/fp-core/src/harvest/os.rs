//! Operating system attributes.

use super::{Harvester, UNDEFINED};
use crate::config::{labels, Category};
use crate::providers::TimeZoneInfo;
use crate::sysctl::{AttributeKey, AttributeQuery};
use fp_common::FingerprintItem;

/// Time zone plus kernel/OS identification strings.
pub struct OsInfoHarvester<'a> {
    system: &'a dyn AttributeQuery,
    time_zone: &'a dyn TimeZoneInfo,
}

impl<'a> OsInfoHarvester<'a> {
    pub fn new(system: &'a dyn AttributeQuery, time_zone: &'a dyn TimeZoneInfo) -> Self {
        Self { system, time_zone }
    }

    pub fn time_zone_identifier(&self) -> String {
        self.time_zone.identifier()
    }

    /// Numeric OS revision, rendered as text.
    pub fn os_build(&self) -> String {
        self.system
            .os_build()
            .map(|build| build.to_string())
            .unwrap_or_else(|| UNDEFINED.to_string())
    }

    pub fn os_type(&self) -> String {
        self.text(AttributeKey::OsType)
    }

    pub fn os_version(&self) -> String {
        self.text(AttributeKey::OsVersion)
    }

    pub fn os_release(&self) -> String {
        self.text(AttributeKey::OsRelease)
    }

    pub fn kernel_version(&self) -> String {
        self.text(AttributeKey::KernelVersion)
    }

    fn text(&self, key: AttributeKey) -> String {
        self.system.query(&key).text_or(UNDEFINED)
    }
}

impl Harvester for OsInfoHarvester<'_> {
    fn category(&self) -> Category {
        Category::OperatingSystem
    }

    fn items(&self) -> Vec<FingerprintItem> {
        vec![
            FingerprintItem::new(labels::TIME_ZONE, self.time_zone_identifier()),
            FingerprintItem::new(labels::OS_BUILD, self.os_build()),
            FingerprintItem::new(labels::OS_RELEASE, self.os_release()),
            FingerprintItem::new(labels::OS_TYPE, self.os_type()),
            FingerprintItem::new(labels::OS_VERSION, self.os_version()),
            FingerprintItem::new(labels::KERNEL_VERSION, self.kernel_version()),
        ]
    }
}
