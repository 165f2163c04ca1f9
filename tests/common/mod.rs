//! In-memory gateway double for workflow tests.
//!
//! Models the server's credential indexing: every guarded operation
//! checks the presented credential against the single live one, and a
//! successful reissue swaps the live credential atomically, so stale
//! credentials start failing exactly like they do against the real
//! service. Calls are logged for call-count assertions and individual
//! operations can be scripted to fail.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use synctl::clients::{Gateway, GatewayError};
use synctl::domain::{NotificationEvent, NotificationSink};
use synctl::models::{Account, ConfigRecord, NewAccount};

/// Parks `list_configs` until released, to hold a workflow mid-flight.
#[derive(Clone)]
pub struct ListGate {
    pub entered: Arc<Semaphore>,
    pub release: Arc<Semaphore>,
}

struct RemoteState {
    credential: String,
    account: Account,
    records: Vec<ConfigRecord>,
    next_id: i64,
    reissue_count: u64,
    calls: Vec<String>,
    fail_list: Option<GatewayError>,
    fail_reissue: Option<GatewayError>,
    fail_patch: HashMap<i64, GatewayError>,
    gate: Option<ListGate>,
}

pub struct MockGateway {
    state: Mutex<RemoteState>,
}

impl MockGateway {
    pub fn new(credential: &str, records: Vec<ConfigRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let account = Account {
            id: 1,
            username: "ops".to_string(),
            active_config_id: None,
            custom_connection_gateway: None,
            custom_connection_gateway_token: None,
            config_sync_token: credential.to_string(),
            is_pro: false,
            is_sponsor: false,
            github_username: "ops".to_string(),
        };

        Self {
            state: Mutex::new(RemoteState {
                credential: credential.to_string(),
                account,
                records,
                next_id,
                reissue_count: 0,
                calls: Vec::new(),
                fail_list: None,
                fail_reissue: None,
                fail_patch: HashMap::new(),
                gate: None,
            }),
        }
    }

    pub fn fail_list(&self, error: GatewayError) {
        self.state.lock().unwrap().fail_list = Some(error);
    }

    pub fn fail_reissue(&self, error: GatewayError) {
        self.state.lock().unwrap().fail_reissue = Some(error);
    }

    pub fn fail_patch(&self, id: i64, error: GatewayError) {
        self.state.lock().unwrap().fail_patch.insert(id, error);
    }

    pub fn install_list_gate(&self) -> ListGate {
        let gate = ListGate {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        };
        self.state.lock().unwrap().gate = Some(gate.clone());
        gate
    }

    pub fn clear_list_gate(&self) {
        self.state.lock().unwrap().gate = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn current_credential(&self) -> String {
        self.state.lock().unwrap().credential.clone()
    }

    pub fn records(&self) -> Vec<ConfigRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn record_content(&self, id: i64) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.content.clone())
    }

    fn log(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    fn check_auth(&self, credential: &str) -> Result<(), GatewayError> {
        if self.state.lock().unwrap().credential == credential {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn get_account(&self, credential: &str) -> Result<Account, GatewayError> {
        self.log("get_account");
        self.check_auth(credential)?;
        Ok(self.state.lock().unwrap().account.clone())
    }

    async fn create_account(&self, username: &str) -> Result<NewAccount, GatewayError> {
        self.log("create_account");
        Ok(NewAccount {
            id: 99,
            username: username.to_string(),
            token: "fresh-account-token".to_string(),
        })
    }

    async fn delete_account(&self, credential: &str) -> Result<(), GatewayError> {
        self.log("delete_account");
        self.check_auth(credential)?;
        let mut state = self.state.lock().unwrap();
        state.records.clear();
        Ok(())
    }

    async fn reissue_credential(&self, credential: &str) -> Result<Account, GatewayError> {
        self.log("reissue_credential");
        self.check_auth(credential)?;

        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_reissue.clone() {
            return Err(error);
        }

        state.reissue_count += 1;
        let fresh = format!("rotated-token-{}", state.reissue_count);
        state.credential = fresh.clone();
        state.account.config_sync_token = fresh;
        Ok(state.account.clone())
    }

    async fn list_configs(&self, credential: &str) -> Result<Vec<ConfigRecord>, GatewayError> {
        self.log("list_configs");
        self.check_auth(credential)?;

        let gate = self.state.lock().unwrap().gate.clone();
        if let Some(gate) = gate {
            gate.entered.add_permits(1);
            gate.release.acquire().await.unwrap().forget();
        }

        let state = self.state.lock().unwrap();
        if let Some(error) = state.fail_list.clone() {
            return Err(error);
        }
        Ok(state.records.clone())
    }

    async fn get_config(&self, credential: &str, id: i64) -> Result<ConfigRecord, GatewayError> {
        self.log(format!("get_config:{id}"));
        self.check_auth(credential)?;

        self.state
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("config {id}")))
    }

    async fn create_config(
        &self,
        credential: &str,
        name: &str,
    ) -> Result<ConfigRecord, GatewayError> {
        self.log(format!("create_config:{name}"));
        self.check_auth(credential)?;

        let mut state = self.state.lock().unwrap();
        let name = if name.is_empty() {
            "Unnamed config (2024-01-01)".to_string()
        } else {
            name.to_string()
        };

        let record = ConfigRecord {
            id: state.next_id,
            name,
            content: "{}".to_string(),
            last_used_with_version: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            user_id: state.account.id,
        };
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    async fn patch_config(
        &self,
        credential: &str,
        id: i64,
        content: &str,
        version_tag: &str,
    ) -> Result<ConfigRecord, GatewayError> {
        self.log(format!("patch_config:{id}"));
        self.check_auth(credential)?;

        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_patch.get(&id).cloned() {
            return Err(error);
        }

        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("config {id}")))?;

        record.content = content.to_string();
        record.last_used_with_version = if version_tag.is_empty() {
            None
        } else {
            Some(version_tag.to_string())
        };
        record.modified_at = "2024-01-02T00:00:00Z".to_string();
        Ok(record.clone())
    }

    async fn delete_config(&self, credential: &str, id: i64) -> Result<(), GatewayError> {
        self.log(format!("delete_config:{id}"));
        self.check_auth(credential)?;

        let mut state = self.state.lock().unwrap();
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(GatewayError::NotFound(format!("config {id}")));
        }
        Ok(())
    }
}

/// Sink that records every event for ordering assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: NotificationEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn record(id: i64, name: &str, content: &str, version: Option<&str>) -> ConfigRecord {
    ConfigRecord {
        id,
        name: name.to_string(),
        content: content.to_string(),
        last_used_with_version: version.map(String::from),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        modified_at: "2024-01-01T00:00:00Z".to_string(),
        user_id: 1,
    }
}
