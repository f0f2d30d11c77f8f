//! Object store gateway
//!
//! Thin call surface over an S3-compatible backend exposing a single fixed
//! bucket. The drive core only ever talks to this trait; the hierarchy
//! illusion is built entirely on top of these six primitives.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use s3::{S3Config, S3ObjectStore};

/// Key and byte size of one stored object, as reported by stat or listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
}

/// Gateway error type
///
/// `NoSuchKey` is the distinguishable missing-key condition; everything else
/// is an opaque backend failure surfaced to the caller without retry.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no such key: {0}")]
    NoSuchKey(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Primitive operations of the flat object store.
///
/// `list` with `recursive = false` returns single-level entries only: direct
/// child objects plus one collapsed entry (key ending `/`, size 0) per deeper
/// common prefix. The object whose key equals the queried prefix is included
/// when present; callers decide whether to skip it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn stat(&self, key: &str) -> Result<ObjectInfo, StoreError>;

    async fn list(&self, prefix: &str, recursive: bool) -> Result<Vec<ObjectInfo>, StoreError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn copy(&self, source_key: &str, dest_key: &str) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
