//! Cellular carrier codes.
//!
//! Only registered on platforms that expose carrier enumeration.

use super::Harvester;
use crate::config::{labels, Category};
use crate::providers::{CarrierInfo, CellularServiceInfo};
use fp_common::FingerprintItem;

pub struct CellularNetworkInfoHarvester<'a> {
    cellular: &'a dyn CellularServiceInfo,
}

impl<'a> CellularNetworkInfoHarvester<'a> {
    pub fn new(cellular: &'a dyn CellularServiceInfo) -> Self {
        Self { cellular }
    }

    /// MCCs of all carriers, sorted ascending.
    pub fn mobile_country_codes(&self) -> Vec<String> {
        self.collect_codes(|carrier| carrier.country_code())
    }

    /// MNCs of all carriers, sorted ascending.
    pub fn mobile_network_codes(&self) -> Vec<String> {
        self.collect_codes(|carrier| carrier.network_code())
    }

    fn collect_codes(&self, code: impl Fn(&dyn CarrierInfo) -> Option<String>) -> Vec<String> {
        let mut codes: Vec<String> = self
            .cellular
            .providers()
            .iter()
            .filter_map(|carrier| code(carrier.as_ref()))
            .collect();
        codes.sort();
        codes
    }
}

impl Harvester for CellularNetworkInfoHarvester<'_> {
    fn category(&self) -> Category {
        Category::CellularNetwork
    }

    fn items(&self) -> Vec<FingerprintItem> {
        vec![
            FingerprintItem::new(labels::MOBILE_COUNTRY_CODES, self.mobile_country_codes()),
            FingerprintItem::new(labels::MOBILE_NETWORK_CODES, self.mobile_network_codes()),
        ]
    }
}
