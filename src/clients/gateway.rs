//! The seam between the console and the remote sync service.
//!
//! Every operation presents the credential it should authenticate with
//! and returns either a typed value or a classified failure. No
//! operation retries internally; retry policy belongs to the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, ConfigRecord, NewAccount};

/// Classified failure of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("the presented credential was rejected")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl GatewayError {
    /// Malformed or schema-invalid response payloads are classified as
    /// server errors rather than bubbling up as parse panics.
    #[must_use]
    pub fn invalid_payload(status: u16, detail: impl std::fmt::Display) -> Self {
        Self::Server {
            status,
            message: format!("invalid response payload: {detail}"),
        }
    }
}

/// Typed access to the account resource and its configs collection.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Reads the account the credential belongs to.
    async fn get_account(&self, credential: &str) -> Result<Account, GatewayError>;

    /// Creates an account. The only unauthenticated operation; the
    /// response carries the one-time plaintext credential.
    async fn create_account(&self, username: &str) -> Result<NewAccount, GatewayError>;

    /// Deletes the account the credential belongs to, and every config
    /// record with it.
    async fn delete_account(&self, credential: &str) -> Result<(), GatewayError>;

    /// Issues a fresh credential for the account.
    ///
    /// The presented credential is invalidated server-side the moment
    /// this returns success; there is no way back. The returned account
    /// carries the new credential.
    async fn reissue_credential(&self, credential: &str) -> Result<Account, GatewayError>;

    /// Lists every config record owned by the account.
    async fn list_configs(&self, credential: &str) -> Result<Vec<ConfigRecord>, GatewayError>;

    /// Reads a single config record.
    async fn get_config(&self, credential: &str, id: i64) -> Result<ConfigRecord, GatewayError>;

    /// Creates an empty config record with the given name.
    async fn create_config(&self, credential: &str, name: &str)
    -> Result<ConfigRecord, GatewayError>;

    /// Replaces a record's content and version tag.
    async fn patch_config(
        &self,
        credential: &str,
        id: i64,
        content: &str,
        version_tag: &str,
    ) -> Result<ConfigRecord, GatewayError>;

    /// Deletes a single config record.
    async fn delete_config(&self, credential: &str, id: i64) -> Result<(), GatewayError>;
}
