//! # Edulink Config
//!
//! Configuration types for the Edulink client.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`gateway`]: Auth/persistence backend connection settings
//! - [`storage`]: Location of the local durable storage
//!
//! # Example
//!
//! ```ignore
//! use edulink_config::{GatewayConfig, StorageConfig};
//!
//! let gateway_config = GatewayConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! ```

pub mod gateway;
pub mod storage;

// Re-export commonly used types at crate root
pub use gateway::GatewayConfig;
pub use storage::StorageConfig;
