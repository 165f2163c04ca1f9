use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::gateway::{Gateway, GatewayError};
use crate::models::{Account, ConfigRecord, NewAccount};

const USER_AGENT: &str = concat!("synctl/", env!("CARGO_PKG_VERSION"));

/// Error body the remote sends on rejected requests.
#[derive(Debug, Deserialize)]
struct DetailResponse {
    detail: String,
}

#[derive(Serialize)]
struct CreateAccountReq<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct CreateConfigReq<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct PatchConfigReq<'a> {
    content: &'a str,
    last_used_with_version: &'a str,
}

/// Gateway backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout_seconds: u64) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid server base URL: {base_url}"))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    fn authorized(&self, builder: RequestBuilder, credential: &str) -> RequestBuilder {
        builder
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {credential}"))
    }

    /// Executes a request and hands back status + raw body, classifying
    /// transport failures. Timeouts are not special-cased; they surface
    /// as any other network failure.
    async fn execute(&self, builder: RequestBuilder) -> Result<(StatusCode, String), GatewayError> {
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        debug!(status = status.as_u16(), "remote call completed");
        Ok((status, body))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let (status, body) = self.execute(builder).await?;

        if !status.is_success() {
            return Err(classify(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::invalid_payload(status.as_u16(), e))
    }

    async fn fetch_unit(&self, builder: RequestBuilder) -> Result<(), GatewayError> {
        let (status, body) = self.execute(builder).await?;

        if !status.is_success() {
            return Err(classify(status, &body));
        }
        Ok(())
    }
}

/// Maps a non-success status to the failure taxonomy. The remote uses
/// 403 for bad credentials on every guarded route.
fn classify(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
        StatusCode::NOT_FOUND => GatewayError::NotFound(extract_detail(body)),
        StatusCode::CONFLICT => GatewayError::Conflict(extract_detail(body)),
        s => GatewayError::Server {
            status: s.as_u16(),
            message: extract_detail(body),
        },
    }
}

/// Pulls the `detail` field out of an error body when present, falling
/// back to the (truncated) raw body.
fn extract_detail(body: &str) -> String {
    if let Ok(detail) = serde_json::from_str::<DetailResponse>(body) {
        return detail.detail;
    }

    let trimmed = body.trim();
    if trimmed.len() > 200 {
        format!("{}...", &trimmed[..200])
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn get_account(&self, credential: &str) -> Result<Account, GatewayError> {
        let builder = self.client.get(self.endpoint("/api/1/user"));
        self.fetch_json(self.authorized(builder, credential)).await
    }

    async fn create_account(&self, username: &str) -> Result<NewAccount, GatewayError> {
        let builder = self
            .client
            .post(self.endpoint("/api/1/user"))
            .header("Accept", "application/json")
            .json(&CreateAccountReq { username });
        self.fetch_json(builder).await
    }

    async fn delete_account(&self, credential: &str) -> Result<(), GatewayError> {
        let builder = self.client.delete(self.endpoint("/api/1/user"));
        self.fetch_unit(self.authorized(builder, credential)).await
    }

    async fn reissue_credential(&self, credential: &str) -> Result<Account, GatewayError> {
        let builder = self.client.patch(self.endpoint("/api/1/user"));
        let account: Account = self.fetch_json(self.authorized(builder, credential)).await?;

        // A reissue response without a usable credential would leave the
        // account unreachable; treat it as a malformed payload.
        if account.config_sync_token.is_empty() {
            return Err(GatewayError::invalid_payload(
                200,
                "reissue response carried an empty credential",
            ));
        }
        Ok(account)
    }

    async fn list_configs(&self, credential: &str) -> Result<Vec<ConfigRecord>, GatewayError> {
        let builder = self.client.get(self.endpoint("/api/1/configs"));
        self.fetch_json(self.authorized(builder, credential)).await
    }

    async fn get_config(&self, credential: &str, id: i64) -> Result<ConfigRecord, GatewayError> {
        let builder = self.client.get(self.endpoint(&format!("/api/1/configs/{id}")));
        self.fetch_json(self.authorized(builder, credential)).await
    }

    async fn create_config(
        &self,
        credential: &str,
        name: &str,
    ) -> Result<ConfigRecord, GatewayError> {
        let builder = self
            .client
            .post(self.endpoint("/api/1/configs"))
            .json(&CreateConfigReq { name });
        self.fetch_json(self.authorized(builder, credential)).await
    }

    async fn patch_config(
        &self,
        credential: &str,
        id: i64,
        content: &str,
        version_tag: &str,
    ) -> Result<ConfigRecord, GatewayError> {
        let builder = self
            .client
            .patch(self.endpoint(&format!("/api/1/configs/{id}")))
            .json(&PatchConfigReq {
                content,
                last_used_with_version: version_tag,
            });
        self.fetch_json(self.authorized(builder, credential)).await
    }

    async fn delete_config(&self, credential: &str, id: i64) -> Result<(), GatewayError> {
        let builder = self
            .client
            .delete(self.endpoint(&format!("/api/1/configs/{id}")));
        self.fetch_unit(self.authorized(builder, credential)).await
    }
}
