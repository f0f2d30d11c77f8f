//! Drive connection configuration
//!
//! Loaded from a JSON file or from `AERODRIVE_*` environment variables.
//! Path-style addressing defaults to on whenever a custom endpoint is set,
//! which is what MinIO and most self-hosted gateways expect.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::store::s3::S3Config;
use crate::store::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// S3-compatible endpoint URL (absent for AWS S3)
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Path-style addressing; defaults to the endpoint's presence
    #[serde(default)]
    pub path_style: Option<bool>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl DriveConfig {
    /// Load the configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Read the configuration from `AERODRIVE_*` environment variables.
    /// `AERODRIVE_BUCKET`, `AERODRIVE_ACCESS_KEY_ID` and
    /// `AERODRIVE_SECRET_ACCESS_KEY` are required.
    pub fn from_env() -> Result<Self, StoreError> {
        let required = |name: &str| {
            std::env::var(name)
                .map_err(|_| StoreError::InvalidConfig(format!("{} is required", name)))
        };

        Ok(Self {
            endpoint: std::env::var("AERODRIVE_ENDPOINT").ok().filter(|v| !v.is_empty()),
            region: std::env::var("AERODRIVE_REGION").unwrap_or_else(|_| default_region()),
            bucket: required("AERODRIVE_BUCKET")?,
            access_key_id: required("AERODRIVE_ACCESS_KEY_ID")?,
            secret_access_key: required("AERODRIVE_SECRET_ACCESS_KEY")?,
            path_style: std::env::var("AERODRIVE_PATH_STYLE")
                .ok()
                .map(|v| v == "true" || v == "1"),
        })
    }

    pub fn into_s3_config(self) -> S3Config {
        let path_style = self.path_style.unwrap_or(self.endpoint.is_some());
        S3Config {
            endpoint: self.endpoint,
            region: self.region,
            access_key_id: self.access_key_id,
            secret_access_key: secrecy::SecretString::from(self.secret_access_key),
            bucket: self.bucket,
            path_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_parses_json_and_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"endpoint": "http://localhost:9000", "bucket": "user-files",
                "access_key_id": "minioadmin", "secret_access_key": "minioadmin"}}"#
        )
        .unwrap();

        let config = DriveConfig::load(file.path()).unwrap();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.bucket, "user-files");

        let s3 = config.into_s3_config();
        assert!(s3.path_style, "custom endpoints default to path style");
    }

    #[test]
    fn load_surfaces_missing_file_as_io_error() {
        let result = DriveConfig::load(Path::new("/nonexistent/aerodrive.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn explicit_path_style_wins_over_the_endpoint_default() {
        let config = DriveConfig {
            endpoint: Some("http://localhost:9000".to_string()),
            region: default_region(),
            bucket: "user-files".to_string(),
            access_key_id: "k".to_string(),
            secret_access_key: "s".to_string(),
            path_style: Some(false),
        };
        assert!(!config.into_s3_config().path_style);
    }
}
