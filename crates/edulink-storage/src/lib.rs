//! # Edulink Storage
//!
//! Local durable storage for the Edulink client.
//!
//! - [`kv`]: string key → string value storage trait with file and in-memory backends
//! - [`keys`]: the keys this client writes
//! - [`profile_store`]: the user profile, registered student IDs and other local records
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edulink_storage::{FileStorage, ProfileStore};
//!
//! let store = ProfileStore::new(Arc::new(FileStorage::new(".edulink")));
//! store.init()?;
//! if let Some(profile) = store.load()? {
//!     println!("{}", profile.name);
//! }
//! ```

pub mod keys;
pub mod kv;
pub mod profile_store;

pub use kv::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use profile_store::ProfileStore;
