//! Device fingerprint common types, versions, and errors.
//!
//! This crate provides foundational types shared across fp-core modules:
//! - Attribute values returned by the system query layer
//! - The fingerprint tree (nodes and labeled items)
//! - Output versions and their ordering
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod output;
pub mod tree;
pub mod value;
pub mod version;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use tree::{FingerprintItem, FingerprintNode, ItemValue, TreeEntry};
pub use value::AttributeValue;
pub use version::Version;
