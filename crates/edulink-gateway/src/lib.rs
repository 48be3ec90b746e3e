//! # Edulink Gateway
//!
//! Client for the backend-as-a-service that owns accounts and school records.
//!
//! Business logic only sees the [`AuthGateway`] trait, so the backend can be swapped without
//! touching the form flows:
//!
//! - [`supabase::SupabaseGateway`]: talks to a Supabase project over HTTP
//! - `memory::MemoryGateway`: in-process fake with a call log and failure injection
//!   (available in tests and with the `test-utils` feature)
//!
//! # Example
//!
//! ```ignore
//! use edulink_config::GatewayConfig;
//! use edulink_gateway::{AuthGateway, supabase::SupabaseGateway};
//!
//! let gateway = SupabaseGateway::new(GatewayConfig::from_env())?;
//! let session = gateway.sign_in_with_password("ada@example.com", "Abc12345").await?;
//! ```

use std::future::Future;
use std::pin::Pin;

use edulink_models::{GatewayUser, Session, SignUpMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod supabase;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{GatewayCall, MemoryGateway};
pub use supabase::SupabaseGateway;

/// Message the auth service returns for a wrong email/password pair.
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// One table row as JSON.
pub type Row = Value;

pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service answered with an error status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    #[error("Failed to create user account")]
    MissingUser,

    #[error("Insert into {0} returned no record")]
    EmptyInsert(String),
}

impl GatewayError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::Api { message, .. } if message.contains(INVALID_CREDENTIALS))
    }
}

/// A row as stored by the backend after an insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertedRecord {
    pub id: String,
    pub record: Value,
}

/// Abstract trait for the auth/persistence backend.
///
/// Every method resolves to a `Result`; callers never see data without handling the error.
pub trait AuthGateway: Send + Sync {
    /// Create an account.
    ///
    /// # Arguments
    /// * `email` - Login email of the new account
    /// * `password` - Plain password, sent over TLS to the service
    /// * `metadata` - Role and role-specific attributes stored with the account
    ///
    /// # Returns
    /// The created user, or a `GatewayError`.
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        metadata: &'a SignUpMetadata,
    ) -> GatewayFuture<'a, GatewayUser>;

    /// Exchange credentials for a session. The session is kept for later calls.
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> GatewayFuture<'a, Session>;

    /// The current session, if any.
    fn get_session(&self) -> GatewayFuture<'_, Option<Session>>;

    /// Insert one row into `table` and return it as stored.
    fn insert<'a>(
        &'a self,
        table: &'a str,
        record: &'a Value,
    ) -> GatewayFuture<'a, InsertedRecord>;

    /// Rows of `table` whose columns equal the given values. No filters returns every row.
    fn select<'a>(
        &'a self,
        table: &'a str,
        filters: &'a [(&'a str, &'a str)],
    ) -> GatewayFuture<'a, Vec<Row>>;
}
