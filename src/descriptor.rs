//! Shared types for drive operations
//!
//! Resource descriptors are computed per-request from store listings and never
//! persisted; a descriptor is created, returned and discarded within one call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric id of the user owning a drive namespace.
///
/// Passed explicitly on every operation; the namespace prefix is derived from
/// it and no key outside that prefix is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File or directory classification, derived from the trailing `/` convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    File,
    Directory,
}

/// A single file or folder as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Parent folder path relative to the namespace root, ending with `/`
    pub parent_path: String,
    /// Leaf name; directory names keep their trailing `/`
    pub name: String,
    /// Byte size; absent for directories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

impl ResourceDescriptor {
    pub fn file(parent_path: String, name: String, size: u64) -> Self {
        Self {
            parent_path,
            name,
            size: Some(size),
            kind: ResourceKind::File,
        }
    }

    pub fn directory(parent_path: String, name: String) -> Self {
        Self {
            parent_path,
            name,
            size: None,
            kind: ResourceKind::Directory,
        }
    }
}

/// One file of an upload batch
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Client-supplied name, possibly with a folder path prepended
    pub name: String,
    /// Declared MIME type forwarded to the store
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Result of a download: the attachment file name plus the raw bytes
/// (a zip archive when the requested path was a folder)
#[derive(Debug, Clone)]
pub struct DownloadPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serializes_camel_case_with_kind_tag() {
        let descriptor = ResourceDescriptor::file("docs/".to_string(), "a.txt".to_string(), 42);
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["parentPath"], "docs/");
        assert_eq!(json["name"], "a.txt");
        assert_eq!(json["size"], 42);
        assert_eq!(json["type"], "FILE");
    }

    #[test]
    fn directory_descriptor_omits_size() {
        let descriptor = ResourceDescriptor::directory("/".to_string(), "docs/".to_string());
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(!json.contains("size"));
        assert!(json.contains("DIRECTORY"));
    }
}
