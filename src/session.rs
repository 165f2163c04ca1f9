//! Explicit session state.
//!
//! The account and the credential that authenticated it travel together
//! in a [`SessionContext`] passed to whichever workflow needs them.
//! Nothing in the crate holds a logged-in account globally.

use crate::clients::{Gateway, GatewayError};
use crate::models::Account;

/// The authenticated account for the duration of one operation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    account: Account,
    credential: String,
}

impl SessionContext {
    /// Authenticates `credential` against the remote and captures the
    /// account it belongs to.
    pub async fn establish(
        gateway: &dyn Gateway,
        credential: String,
    ) -> Result<Self, GatewayError> {
        let account = gateway.get_account(&credential).await?;
        Ok(Self {
            account,
            credential,
        })
    }

    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    #[must_use]
    pub fn credential(&self) -> &str {
        &self.credential
    }
}
