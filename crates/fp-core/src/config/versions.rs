//! Version table: which items each category emits, and in what order.
//!
//! The table is plain data. For any category, the label list of a later
//! version must contain the earlier list as a subsequence: items can be added
//! (anywhere) but never removed or reordered. [`validate_version_table`]
//! checks this for every pair of versions.

use fp_common::{Error, Result, Version};
use serde::Serialize;

/// Item labels. Stable once introduced.
pub mod labels {
    // Hardware information
    pub const DEVICE_NAME: &str = "Device name";
    pub const DEVICE_TYPE: &str = "Device type";
    pub const DEVICE_MODEL: &str = "Device model";
    pub const DISPLAY_RESOLUTION: &str = "Display resolution";
    pub const DISPLAY_SCALE: &str = "Display scale";
    pub const PHYSICAL_MEMORY: &str = "Physical memory";
    pub const PROCESSOR_COUNT: &str = "Processor count";
    pub const FREE_DISK_SPACE: &str = "Free disk space (B)";
    pub const TOTAL_DISK_SPACE: &str = "Total disk space (B)";

    // Operating system information
    pub const TIME_ZONE: &str = "Time zone";
    pub const OS_BUILD: &str = "OS build";
    pub const OS_RELEASE: &str = "OS release";
    pub const OS_TYPE: &str = "OS type";
    pub const OS_VERSION: &str = "OS version";
    pub const KERNEL_VERSION: &str = "Kernel version";

    // Cellular network information
    pub const MOBILE_COUNTRY_CODES: &str = "Mobile country codes";
    pub const MOBILE_NETWORK_CODES: &str = "Mobile network codes";
}

use labels::*;

/// Fingerprint categories, in the order they appear under the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Hardware,
    OperatingSystem,
    CellularNetwork,
}

impl Category {
    /// Declared order.
    pub const ALL: [Category; 3] = [
        Category::Hardware,
        Category::OperatingSystem,
        Category::CellularNetwork,
    ];

    /// Node label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Hardware => "Hardware information",
            Category::OperatingSystem => "Operating system information",
            Category::CellularNetwork => "Cellular network information",
        }
    }

    /// The category's full version table.
    pub fn table(self) -> &'static [VersionEntry] {
        match self {
            Category::Hardware => HARDWARE_ITEMS,
            Category::OperatingSystem => OS_ITEMS,
            Category::CellularNetwork => CELLULAR_ITEMS,
        }
    }

    /// Labels to emit for `version`, in order. Empty when the category is
    /// not part of that version.
    pub fn labels(self, version: Version) -> &'static [&'static str] {
        self.table()
            .iter()
            .find(|entry| entry.version == version)
            .map(|entry| entry.labels)
            .unwrap_or(&[])
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered labels one category emits at one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionEntry {
    pub version: Version,
    pub labels: &'static [&'static str],
}

const HARDWARE_V1: &[&str] = &[
    DEVICE_TYPE,
    DEVICE_MODEL,
    DISPLAY_RESOLUTION,
    PHYSICAL_MEMORY,
    PROCESSOR_COUNT,
];

const HARDWARE_V2: &[&str] = &[
    DEVICE_TYPE,
    DEVICE_MODEL,
    DISPLAY_RESOLUTION,
    PHYSICAL_MEMORY,
    PROCESSOR_COUNT,
    FREE_DISK_SPACE,
    TOTAL_DISK_SPACE,
];

const HARDWARE_V3: &[&str] = &[
    DEVICE_NAME,
    DEVICE_TYPE,
    DEVICE_MODEL,
    DISPLAY_RESOLUTION,
    DISPLAY_SCALE,
    PHYSICAL_MEMORY,
    PROCESSOR_COUNT,
    FREE_DISK_SPACE,
    TOTAL_DISK_SPACE,
];

const OS_V1: &[&str] = &[OS_RELEASE, OS_TYPE, OS_VERSION, KERNEL_VERSION];

const OS_V3: &[&str] = &[
    TIME_ZONE,
    OS_BUILD,
    OS_RELEASE,
    OS_TYPE,
    OS_VERSION,
    KERNEL_VERSION,
];

const CELLULAR_V3: &[&str] = &[MOBILE_COUNTRY_CODES, MOBILE_NETWORK_CODES];

pub const HARDWARE_ITEMS: &[VersionEntry] = &[
    VersionEntry {
        version: Version::V1,
        labels: HARDWARE_V1,
    },
    VersionEntry {
        version: Version::V2,
        labels: HARDWARE_V2,
    },
    VersionEntry {
        version: Version::V3,
        labels: HARDWARE_V3,
    },
];

pub const OS_ITEMS: &[VersionEntry] = &[
    VersionEntry {
        version: Version::V1,
        labels: OS_V1,
    },
    VersionEntry {
        version: Version::V2,
        labels: OS_V1,
    },
    VersionEntry {
        version: Version::V3,
        labels: OS_V3,
    },
];

pub const CELLULAR_ITEMS: &[VersionEntry] = &[
    VersionEntry {
        version: Version::V1,
        labels: &[],
    },
    VersionEntry {
        version: Version::V2,
        labels: &[],
    },
    VersionEntry {
        version: Version::V3,
        labels: CELLULAR_V3,
    },
];

/// Whether `earlier` is a subsequence of `later` (every label kept, relative
/// order preserved).
pub fn is_append_only<S: AsRef<str>>(earlier: &[S], later: &[S]) -> bool {
    let mut remaining = later.iter();
    earlier
        .iter()
        .all(|label| remaining.any(|candidate| candidate.as_ref() == label.as_ref()))
}

/// Check the append-only rule for every category and version pair.
pub fn validate_version_table() -> Result<()> {
    for category in Category::ALL {
        for (i, earlier) in Version::ALL.iter().enumerate() {
            for later in &Version::ALL[i + 1..] {
                if !is_append_only(category.labels(*earlier), category.labels(*later)) {
                    return Err(Error::VersionTable {
                        category: category.label().to_string(),
                        earlier: earlier.to_string(),
                        later: later.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_built_in_table_is_valid() {
        validate_version_table().unwrap();
    }

    #[test]
    fn test_every_category_covers_every_version() {
        for category in Category::ALL {
            let versions: Vec<Version> = category.table().iter().map(|e| e.version).collect();
            assert_eq!(versions, Version::ALL.to_vec(), "{category}");
        }
    }

    #[test]
    fn test_labels_are_unique_within_a_version() {
        for category in Category::ALL {
            for version in Version::ALL {
                let labels = category.labels(version);
                let unique: HashSet<_> = labels.iter().collect();
                assert_eq!(unique.len(), labels.len(), "{category} {version}");
            }
        }
    }

    #[test]
    fn test_hardware_v1_labels() {
        assert_eq!(
            Category::Hardware.labels(Version::V1),
            &[
                "Device type",
                "Device model",
                "Display resolution",
                "Physical memory",
                "Processor count"
            ]
        );
    }

    #[test]
    fn test_cellular_introduced_in_v3() {
        assert!(Category::CellularNetwork.labels(Version::V1).is_empty());
        assert!(Category::CellularNetwork.labels(Version::V2).is_empty());
        assert_eq!(
            Category::CellularNetwork.labels(Version::V3),
            &["Mobile country codes", "Mobile network codes"]
        );
    }

    #[test]
    fn test_append_only_check() {
        assert!(is_append_only(&["a", "b"], &["a", "x", "b", "y"]));
        assert!(is_append_only::<&str>(&[], &["a"]));
        assert!(!is_append_only(&["a", "b"], &["b", "a"]));
        assert!(!is_append_only(&["a", "b"], &["a"]));
    }

    #[test]
    fn test_category_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }
}
