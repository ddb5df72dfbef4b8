//! Device fingerprint core library.
//!
//! - Raw system attribute queries ([`sysctl`])
//! - Provider capabilities and host adapters ([`providers`])
//! - Per-category harvesters ([`harvest`])
//! - The versioned label table and configuration loading ([`config`])
//! - Tree assembly ([`tree`])
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod harvest;
pub mod logging;
pub mod providers;
pub mod sysctl;
pub mod tree;

// Spy providers for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Category, Configuration};
pub use harvest::{
    CellularNetworkInfoHarvester, HardwareInfoHarvester, Harvester, OsInfoHarvester,
};
pub use sysctl::{AttributeKey, AttributeQuery, SystemControl};
pub use tree::{collect_fingerprint, TreeBuilder, ROOT_LABEL};
