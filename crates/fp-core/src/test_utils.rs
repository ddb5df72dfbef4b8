//! Deterministic provider fakes for harvester and tree tests.
//!
//! Spies record how often each capability method was called so tests can
//! assert that reading one attribute never touches another.

use crate::harvest::HardwareInfoHarvester;
use crate::providers::{
    CarrierInfo, CellularServiceInfo, CpuInfo, DeviceIdentity, DocumentsDirectoryError,
    FileAttributeKey, FileSystemAttributes, Rect, ScreenInfo, TimeZoneInfo,
};
use crate::sysctl::{AttributeKey, AttributeQuery};
use fp_common::AttributeValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// In-memory attribute table; unknown keys are absent.
#[derive(Debug, Default)]
pub struct FakeSystemControl {
    values: HashMap<AttributeKey, AttributeValue>,
    queries: AtomicUsize,
}

impl FakeSystemControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn query_count(&self) -> usize {
        count(&self.queries)
    }
}

impl AttributeQuery for FakeSystemControl {
    fn query(&self, key: &AttributeKey) -> AttributeValue {
        bump(&self.queries);
        self.values.get(key).cloned().unwrap_or_default()
    }
}

/// Fixed time zone.
#[derive(Debug, Clone)]
pub struct TimeZoneStub {
    identifier: String,
}

impl TimeZoneStub {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
        }
    }
}

impl TimeZoneInfo for TimeZoneStub {
    fn identifier(&self) -> String {
        self.identifier.clone()
    }
}

/// Carrier with optional codes and per-code call counters.
#[derive(Debug, Default)]
pub struct CarrierInfoSpy {
    country_code: Option<String>,
    network_code: Option<String>,
    country_code_calls: AtomicUsize,
    network_code_calls: AtomicUsize,
}

impl CarrierInfoSpy {
    pub fn new(country_code: Option<&str>, network_code: Option<&str>) -> Self {
        Self {
            country_code: country_code.map(str::to_string),
            network_code: network_code.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_country_code(code: &str) -> Self {
        Self::new(Some(code), None)
    }

    pub fn with_network_code(code: &str) -> Self {
        Self::new(None, Some(code))
    }

    /// Carrier reporting neither code.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn country_code_call_count(&self) -> usize {
        count(&self.country_code_calls)
    }

    pub fn network_code_call_count(&self) -> usize {
        count(&self.network_code_calls)
    }
}

impl CarrierInfo for CarrierInfoSpy {
    fn country_code(&self) -> Option<String> {
        bump(&self.country_code_calls);
        self.country_code.clone()
    }

    fn network_code(&self) -> Option<String> {
        bump(&self.network_code_calls);
        self.network_code.clone()
    }
}

/// Cellular service returning a fixed carrier list.
#[derive(Debug, Default)]
pub struct CellularServiceInfoSpy {
    carriers: Vec<Arc<CarrierInfoSpy>>,
    providers_calls: AtomicUsize,
}

impl CellularServiceInfoSpy {
    pub fn new(carriers: Vec<Arc<CarrierInfoSpy>>) -> Self {
        Self {
            carriers,
            providers_calls: AtomicUsize::new(0),
        }
    }

    pub fn providers_call_count(&self) -> usize {
        count(&self.providers_calls)
    }
}

impl CellularServiceInfo for CellularServiceInfoSpy {
    fn providers(&self) -> Vec<Arc<dyn CarrierInfo>> {
        bump(&self.providers_calls);
        self.carriers
            .iter()
            .map(|carrier| carrier.clone() as Arc<dyn CarrierInfo>)
            .collect()
    }
}

/// Screen with fixed metrics.
#[derive(Debug, Default)]
pub struct ScreenInfoSpy {
    bounds: Rect,
    scale: f64,
    bounds_calls: AtomicUsize,
    scale_calls: AtomicUsize,
}

impl ScreenInfoSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn native_bounds_call_count(&self) -> usize {
        count(&self.bounds_calls)
    }

    pub fn native_scale_call_count(&self) -> usize {
        count(&self.scale_calls)
    }
}

impl ScreenInfo for ScreenInfoSpy {
    fn native_bounds(&self) -> Rect {
        bump(&self.bounds_calls);
        self.bounds
    }

    fn native_scale(&self) -> f64 {
        bump(&self.scale_calls);
        self.scale
    }
}

/// Device identity with fixed model and optional name.
#[derive(Debug, Default)]
pub struct DeviceIdentitySpy {
    model: String,
    user_assigned_name: Option<String>,
    model_calls: AtomicUsize,
    user_assigned_name_calls: AtomicUsize,
}

impl DeviceIdentitySpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_user_assigned_name(mut self, name: &str) -> Self {
        self.user_assigned_name = Some(name.to_string());
        self
    }

    pub fn model_call_count(&self) -> usize {
        count(&self.model_calls)
    }

    pub fn user_assigned_name_call_count(&self) -> usize {
        count(&self.user_assigned_name_calls)
    }
}

impl DeviceIdentity for DeviceIdentitySpy {
    fn model(&self) -> String {
        bump(&self.model_calls);
        self.model.clone()
    }

    fn user_assigned_name(&self) -> Option<String> {
        bump(&self.user_assigned_name_calls);
        self.user_assigned_name.clone()
    }
}

/// Documents directory attributes; empty by default, optionally failing.
#[derive(Debug, Default)]
pub struct FileSystemAttributesMock {
    attributes: BTreeMap<FileAttributeKey, u64>,
    fail: bool,
    calls: AtomicUsize,
}

impl FileSystemAttributesMock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, key: FileAttributeKey, value: u64) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Report `DirectoryNotFound` regardless of configured attributes.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        count(&self.calls)
    }
}

impl FileSystemAttributes for FileSystemAttributesMock {
    fn documents_directory_attributes(
        &self,
    ) -> Result<BTreeMap<FileAttributeKey, u64>, DocumentsDirectoryError> {
        bump(&self.calls);
        if self.fail {
            return Err(DocumentsDirectoryError::DirectoryNotFound);
        }
        Ok(self.attributes.clone())
    }
}

/// Fixed processor count.
#[derive(Debug, Clone, Copy)]
pub struct CpuInfoStub {
    count: usize,
}

impl CpuInfoStub {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl CpuInfo for CpuInfoStub {
    fn processor_count(&self) -> usize {
        self.count
    }
}

/// Every provider a hardware harvester needs, all empty by default.
#[derive(Debug)]
pub struct HardwareFixture {
    pub device: DeviceIdentitySpy,
    pub screen: ScreenInfoSpy,
    pub system: FakeSystemControl,
    pub file_system: FileSystemAttributesMock,
    pub cpu: CpuInfoStub,
}

impl HardwareFixture {
    pub fn new() -> Self {
        Self {
            device: DeviceIdentitySpy::new(),
            screen: ScreenInfoSpy::new(),
            system: FakeSystemControl::new(),
            file_system: FileSystemAttributesMock::new(),
            cpu: CpuInfoStub::new(1),
        }
    }

    pub fn harvester(&self) -> HardwareInfoHarvester<'_> {
        HardwareInfoHarvester::new(
            &self.device,
            &self.screen,
            &self.system,
            &self.file_system,
            &self.cpu,
        )
    }
}

impl Default for HardwareFixture {
    fn default() -> Self {
        Self::new()
    }
}
