//! Versioned tree assembly with fake providers.

use fp_common::{FingerprintNode, TreeEntry, Version};
use fp_core::config::{Category, Configuration};
use fp_core::harvest::{CellularNetworkInfoHarvester, Harvester, OsInfoHarvester};
use fp_core::test_utils::{
    CarrierInfoSpy, CellularServiceInfoSpy, FakeSystemControl, HardwareFixture, TimeZoneStub,
};
use fp_core::{TreeBuilder, ROOT_LABEL};
use std::sync::Arc;

fn hardware_labels(version: Version) -> Vec<String> {
    let fixture = HardwareFixture::new();
    fixture
        .harvester()
        .build_tree(&Configuration::new(version))
        .child_labels()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn is_subsequence(earlier: &[String], later: &[String]) -> bool {
    let mut later = later.iter();
    earlier.iter().all(|label| later.any(|candidate| candidate == label))
}

#[test]
fn hardware_v1_items() {
    assert_eq!(
        hardware_labels(Version::V1),
        vec![
            "Device type",
            "Device model",
            "Display resolution",
            "Physical memory",
            "Processor count"
        ]
    );
}

#[test]
fn hardware_v2_appends_disk_space() {
    let v1 = hardware_labels(Version::V1);
    let v2 = hardware_labels(Version::V2);

    assert_eq!(&v2[..v1.len()], v1.as_slice());
    assert_eq!(
        &v2[v1.len()..],
        ["Free disk space (B)", "Total disk space (B)"]
    );
}

#[test]
fn hardware_v3_inserts_name_and_scale() {
    let v2 = hardware_labels(Version::V2);
    let v3 = hardware_labels(Version::V3);

    assert!(is_subsequence(&v2, &v3));
    assert_eq!(
        v3,
        vec![
            "Device name",
            "Device type",
            "Device model",
            "Display resolution",
            "Display scale",
            "Physical memory",
            "Processor count",
            "Free disk space (B)",
            "Total disk space (B)"
        ]
    );
}

#[test]
fn every_category_keeps_earlier_versions_in_order() {
    let fixture = HardwareFixture::new();
    let hardware = fixture.harvester();
    let system = FakeSystemControl::new();
    let tz = TimeZoneStub::new("UTC");
    let os = OsInfoHarvester::new(&system, &tz);
    let service = CellularServiceInfoSpy::new(vec![]);
    let cellular = CellularNetworkInfoHarvester::new(&service);
    let harvesters: [&dyn Harvester; 3] = [&hardware, &os, &cellular];

    for harvester in harvesters {
        let trees: Vec<Vec<String>> = Version::ALL
            .iter()
            .map(|version| {
                harvester
                    .build_tree(&Configuration::new(*version))
                    .child_labels()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        for pair in trees.windows(2) {
            assert!(is_subsequence(&pair[0], &pair[1]), "{:?}", harvester.category());
        }
    }
}

fn build_all(version: Version, service: &CellularServiceInfoSpy) -> FingerprintNode {
    let config = Configuration::new(version);
    let fixture = HardwareFixture::new();
    let hardware = fixture.harvester();
    let system = FakeSystemControl::new();
    let tz = TimeZoneStub::new("UTC");
    let os = OsInfoHarvester::new(&system, &tz);
    let cellular = CellularNetworkInfoHarvester::new(service);

    TreeBuilder::new(&config)
        .with_optional(Some(&cellular as &dyn Harvester))
        .with(&os)
        .with(&hardware)
        .build()
}

#[test]
fn empty_providers_still_yield_complete_tree() {
    for version in Version::ALL {
        let service = CellularServiceInfoSpy::new(vec![Arc::new(CarrierInfoSpy::unknown())]);
        let tree = build_all(version, &service);
        assert_eq!(tree.label, ROOT_LABEL);

        for category in Category::ALL {
            let expected = Configuration::new(version).labels(category);
            match tree.node(category.label()) {
                Some(node) => {
                    assert_eq!(node.child_labels(), expected.to_vec());
                    assert!(node
                        .children
                        .iter()
                        .all(|entry| matches!(entry, TreeEntry::Item(_))));
                }
                None => assert!(expected.is_empty(), "{category} missing at {version}"),
            }
        }
    }
}

#[test]
fn categories_in_declared_order() {
    let service = CellularServiceInfoSpy::new(vec![]);
    let tree = build_all(Version::V3, &service);
    assert_eq!(
        tree.child_labels(),
        vec![
            "Hardware information",
            "Operating system information",
            "Cellular network information"
        ]
    );

    let tree = build_all(Version::V1, &service);
    assert_eq!(
        tree.child_labels(),
        vec!["Hardware information", "Operating system information"]
    );
}

#[test]
fn json_shape() {
    let service = CellularServiceInfoSpy::new(vec![Arc::new(CarrierInfoSpy::new(
        Some("230"),
        Some("03"),
    ))]);
    let tree = build_all(Version::V3, &service);
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["label"], "Device fingerprint");
    let cellular = &json["children"][2];
    assert_eq!(cellular["label"], "Cellular network information");
    assert_eq!(cellular["children"][0]["label"], "Mobile country codes");
    assert_eq!(cellular["children"][0]["value"], serde_json::json!(["230"]));
}
