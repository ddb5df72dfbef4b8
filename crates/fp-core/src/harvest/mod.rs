//! Attribute harvesters.
//!
//! A harvester turns attribute queries and provider capabilities into the
//! labeled items of one fingerprint category. Harvesters borrow their
//! providers, hold no mutable state, and apply the fallback policy so every
//! item always carries a value:
//!
//! | value kind | fallback |
//! |---|---|
//! | string | `"Undefined"` |
//! | integer | `0` |
//! | derived pair (disk space) | `0` for both members if either is missing |
//! | collection | empty list |

mod cellular;
mod hardware;
mod os;

pub use cellular::CellularNetworkInfoHarvester;
pub use hardware::{DiskSpace, HardwareInfoHarvester};
pub use os::OsInfoHarvester;

use crate::config::{Category, Configuration};
use fp_common::{FingerprintItem, FingerprintNode, TreeEntry};
use tracing::warn;

/// Fallback for string attributes that could not be read.
pub const UNDEFINED: &str = "Undefined";

/// Producer of one fingerprint category.
pub trait Harvester {
    /// Category this harvester fills.
    fn category(&self) -> Category;

    /// Every item the harvester can produce, with fallbacks applied.
    fn items(&self) -> Vec<FingerprintItem>;

    /// Category node holding the items the configured version asks for, in
    /// the version's order.
    fn build_tree(&self, config: &Configuration) -> FingerprintNode {
        let category = self.category();
        let mut available = self.items();
        let mut children = Vec::new();

        for label in config.labels(category) {
            match available.iter().position(|item| item.label == *label) {
                Some(index) => children.push(TreeEntry::Item(available.swap_remove(index))),
                None => warn!(%category, label, "version table names an item the harvester lacks"),
            }
        }

        FingerprintNode::new(category.label(), children)
    }
}
