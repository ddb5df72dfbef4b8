//! Fingerprint tree types.
//!
//! A fingerprint is a root [`FingerprintNode`] whose children are category
//! nodes ("Hardware information", ...), each holding labeled
//! [`FingerprintItem`] leaves. Trees are built once and never mutated.

use serde::Serialize;

/// Presentation value of a fingerprint leaf.
///
/// Fallbacks are applied before an item is built, so there is no absent
/// variant here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemValue {
    Text(String),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

impl ItemValue {
    /// Render for the text output format.
    pub fn display(&self) -> String {
        match self {
            ItemValue::Text(text) => text.clone(),
            ItemValue::Integer(value) => value.to_string(),
            ItemValue::Float(value) => value.to_string(),
            ItemValue::List(values) => format!("[{}]", values.join(", ")),
        }
    }
}

impl From<String> for ItemValue {
    fn from(value: String) -> Self {
        ItemValue::Text(value)
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        ItemValue::Text(value.to_string())
    }
}

impl From<i64> for ItemValue {
    fn from(value: i64) -> Self {
        ItemValue::Integer(value)
    }
}

impl From<u64> for ItemValue {
    fn from(value: u64) -> Self {
        ItemValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for ItemValue {
    fn from(value: usize) -> Self {
        ItemValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ItemValue {
    fn from(value: f64) -> Self {
        ItemValue::Float(value)
    }
}

impl From<Vec<String>> for ItemValue {
    fn from(values: Vec<String>) -> Self {
        ItemValue::List(values)
    }
}

/// A labeled leaf of the fingerprint tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerprintItem {
    pub label: String,
    pub value: ItemValue,
}

impl FingerprintItem {
    pub fn new(label: impl Into<String>, value: impl Into<ItemValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Child of a node: either a leaf item or a nested node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeEntry {
    Item(FingerprintItem),
    Node(FingerprintNode),
}

impl TreeEntry {
    pub fn label(&self) -> &str {
        match self {
            TreeEntry::Item(item) => &item.label,
            TreeEntry::Node(node) => &node.label,
        }
    }
}

impl From<FingerprintItem> for TreeEntry {
    fn from(item: FingerprintItem) -> Self {
        TreeEntry::Item(item)
    }
}

impl From<FingerprintNode> for TreeEntry {
    fn from(node: FingerprintNode) -> Self {
        TreeEntry::Node(node)
    }
}

/// A labeled grouping of items or nested nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerprintNode {
    pub label: String,
    pub children: Vec<TreeEntry>,
}

impl FingerprintNode {
    pub fn new(label: impl Into<String>, children: Vec<TreeEntry>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Labels of the direct children, in order.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(TreeEntry::label).collect()
    }

    /// Direct child node with the given label.
    pub fn node(&self, label: &str) -> Option<&FingerprintNode> {
        self.children.iter().find_map(|entry| match entry {
            TreeEntry::Node(node) if node.label == label => Some(node),
            _ => None,
        })
    }

    /// Direct child item with the given label.
    pub fn item(&self, label: &str) -> Option<&FingerprintItem> {
        self.children.iter().find_map(|entry| match entry {
            TreeEntry::Item(item) if item.label == label => Some(item),
            _ => None,
        })
    }

    /// Render as an indented, human-readable outline.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!("{}{}\n", indent, self.label));
        for child in &self.children {
            match child {
                TreeEntry::Item(item) => {
                    out.push_str(&format!(
                        "{}  {}: {}\n",
                        indent,
                        item.label,
                        item.value.display()
                    ));
                }
                TreeEntry::Node(node) => node.render_into(out, depth + 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FingerprintNode {
        let hardware = FingerprintNode::new(
            "Hardware information",
            vec![
                FingerprintItem::new("Device type", "iPhone").into(),
                FingerprintItem::new("Processor count", 6usize).into(),
            ],
        );
        FingerprintNode::new("Device fingerprint", vec![hardware.into()])
    }

    #[test]
    fn test_lookup_by_label() {
        let tree = sample_tree();
        let hardware = tree.node("Hardware information").unwrap();
        assert_eq!(hardware.child_labels(), vec!["Device type", "Processor count"]);
        assert_eq!(
            hardware.item("Processor count").unwrap().value,
            ItemValue::Integer(6)
        );
        assert!(tree.node("Cellular network information").is_none());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample_tree()).unwrap();
        assert_eq!(json["label"], "Device fingerprint");
        assert_eq!(json["children"][0]["label"], "Hardware information");
        assert_eq!(json["children"][0]["children"][0]["value"], "iPhone");
        assert_eq!(json["children"][0]["children"][1]["value"], 6);
    }

    #[test]
    fn test_render_text_indents_categories() {
        let text = sample_tree().render_text();
        assert_eq!(
            text,
            "Device fingerprint\n  Hardware information\n    Device type: iPhone\n    Processor count: 6\n"
        );
    }

    #[test]
    fn test_list_display() {
        let value = ItemValue::List(vec!["001".into(), "048".into()]);
        assert_eq!(value.display(), "[001, 048]");
        assert_eq!(ItemValue::List(vec![]).display(), "[]");
    }

    #[test]
    fn test_u64_conversion_saturates() {
        assert_eq!(ItemValue::from(u64::MAX), ItemValue::Integer(i64::MAX));
    }
}
