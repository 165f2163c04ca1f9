use serde::{Deserialize, Serialize};

/// The account resource as returned by the remote API.
///
/// `config_sync_token` is the live bearer credential. The server keeps
/// exactly one live value per account; reissuing replaces it atomically
/// with no grace period for the old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,

    pub username: String,

    pub active_config_id: Option<i64>,

    pub custom_connection_gateway: Option<String>,

    pub custom_connection_gateway_token: Option<String>,

    pub config_sync_token: String,

    #[serde(default)]
    pub is_pro: bool,

    #[serde(default)]
    pub is_sponsor: bool,

    #[serde(default)]
    pub github_username: String,
}

/// Response of account creation.
///
/// Carries the plaintext initial credential in `token`. The server only
/// stores a hash, so this is the single chance to capture it.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub id: i64,

    pub username: String,

    pub token: String,
}
