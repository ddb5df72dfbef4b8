//! Fingerprint tree assembly.

use crate::config::Configuration;
use crate::harvest::{Harvester, HardwareInfoHarvester, OsInfoHarvester};
use crate::providers::{
    DocumentsDirectory, HeadlessScreen, HostCpuInfo, HostDeviceIdentity, SystemTimeZone,
};
use crate::sysctl::SystemControl;
use fp_common::{FingerprintNode, TreeEntry};
use tracing::{debug, warn};

/// Label of the fingerprint root node.
pub const ROOT_LABEL: &str = "Device fingerprint";

/// Combines the category nodes of registered harvesters under one root.
///
/// Categories always appear in their declared order, whatever order the
/// harvesters were registered in. A category the configured version does not
/// include is left out entirely.
pub struct TreeBuilder<'a> {
    config: &'a Configuration,
    harvesters: Vec<&'a dyn Harvester>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            harvesters: Vec::new(),
        }
    }

    /// Register a harvester.
    pub fn with(mut self, harvester: &'a dyn Harvester) -> Self {
        self.harvesters.push(harvester);
        self
    }

    /// Register a harvester the platform may not provide.
    pub fn with_optional(self, harvester: Option<&'a dyn Harvester>) -> Self {
        match harvester {
            Some(harvester) => self.with(harvester),
            None => self,
        }
    }

    pub fn build(&self) -> FingerprintNode {
        let mut harvesters = self.harvesters.clone();
        harvesters.sort_by_key(|harvester| harvester.category());

        let mut children: Vec<TreeEntry> = Vec::with_capacity(harvesters.len());
        let mut previous = None;
        for harvester in harvesters {
            let category = harvester.category();
            if previous == Some(category) {
                warn!(%category, "duplicate harvester ignored");
                continue;
            }
            previous = Some(category);

            if self.config.labels(category).is_empty() {
                debug!(%category, version = %self.config.version, "category not in version");
                continue;
            }
            children.push(harvester.build_tree(self.config).into());
        }

        FingerprintNode::new(ROOT_LABEL, children)
    }
}

/// Build the fingerprint of the running host.
///
/// Uses the platform attribute backend and the default host adapters. Hosts
/// without carrier enumeration contribute no cellular category.
pub fn collect_fingerprint(config: &Configuration) -> FingerprintNode {
    let system = SystemControl::system();
    let time_zone = SystemTimeZone::default();
    let screen = HeadlessScreen;
    let device = HostDeviceIdentity::new(&system);
    let documents = DocumentsDirectory::default();
    let cpu = HostCpuInfo;

    let hardware = HardwareInfoHarvester::new(&device, &screen, &system, &documents, &cpu);
    let os = OsInfoHarvester::new(&system, &time_zone);

    TreeBuilder::new(config).with(&hardware).with(&os).build()
}
