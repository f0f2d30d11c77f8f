//! AeroDrive — personal cloud drive core
//!
//! Emulates hierarchical filesystem semantics (stat, listing, move/rename,
//! recursive delete, zip folder download, search) on top of a flat
//! S3-compatible key space. The store has no directories, no rename and no
//! transactions; all hierarchy is an application-level illusion built from
//! prefix listings and zero-byte directory-marker objects.
//!
//! Every user owns an isolated namespace of keys (`user-<id>-files/...`) and
//! every operation takes the owning [`UserId`] explicitly — there is no
//! ambient identity.

mod archive;
mod catalog;
mod remove;
mod rename;
mod search;
mod upload;

pub mod config;
pub mod descriptor;
pub mod drive;
pub mod error;
pub mod naming;
pub mod paths;
pub mod store;

pub use config::DriveConfig;
pub use descriptor::{DownloadPayload, ResourceDescriptor, ResourceKind, UploadFile, UserId};
pub use drive::Drive;
pub use error::DriveError;
pub use store::{ObjectInfo, ObjectStore, StoreError};
