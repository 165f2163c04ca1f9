use serde::{Deserialize, Serialize};

/// One named configuration payload owned by an account.
///
/// The field set and names are the wire shape used by the remote API and
/// by exported snapshot files; interop depends on them staying as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub id: i64,

    pub name: String,

    pub content: String,

    pub last_used_with_version: Option<String>,

    pub created_at: String,

    pub modified_at: String,

    pub user_id: i64,
}

impl ConfigRecord {
    /// Version tag as sent on patch requests. A record that has never
    /// been used by a client carries no tag; the API expects "" then.
    #[must_use]
    pub fn version_tag(&self) -> &str {
        self.last_used_with_version.as_deref().unwrap_or("")
    }
}
