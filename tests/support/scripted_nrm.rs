// ABOUTME: Transport that answers NRM actions from a script and records every request.
// ABOUTME: Lets tests assert on the exact calls the adapter made and in what order.

use super::{CONTROL_URL, WORKGROUP, action_of};
use async_trait::async_trait;
use bytes::Bytes;
use oess_cm::nrm::{NrmClient, NrmError, Session, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Canned answer for one action.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(String),
    Unauthorized,
    Status(u16, String),
    /// Sleep this long before answering with the JSON body.
    Slow(Duration, String),
}

#[derive(Debug)]
struct Rule {
    action: String,
    contains: Option<String>,
    reply: Reply,
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<Rule>,
    requests: Vec<String>,
}

/// Cloneable handle to a shared script. Later rules take precedence over
/// earlier ones for the same action.
#[derive(Debug, Clone)]
pub struct ScriptedNrm {
    script: Arc<Mutex<Script>>,
}

impl Default for ScriptedNrm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedNrm {
    /// A script that accepts the handshake and lists the default workgroup.
    pub fn new() -> Self {
        let nrm = Self {
            script: Arc::new(Mutex::new(Script::default())),
        };
        nrm.on("handshake", "{}").on(
            "get_workgroups",
            &format!(r#"{{"results":[{{"name":"{}","workgroup_id":7}}]}}"#, WORKGROUP),
        )
    }

    pub fn on(self, action: &str, json: &str) -> Self {
        self.reply(action, None, Reply::Json(json.to_string()))
    }

    /// Answer `action` only when the query string contains `needle`.
    pub fn on_query(self, action: &str, needle: &str, json: &str) -> Self {
        self.reply(action, Some(needle), Reply::Json(json.to_string()))
    }

    pub fn reply(self, action: &str, needle: Option<&str>, reply: Reply) -> Self {
        self.script.lock().rules.push(Rule {
            action: action.to_string(),
            contains: needle.map(str::to_string),
            reply,
        });
        self
    }

    /// Script a switch with the given interfaces, all VLANs free.
    pub fn with_switch(self, switch: &str, interfaces: &[&str]) -> Self {
        let entries: Vec<String> = interfaces
            .iter()
            .map(|i| format!(r#"{{"name":"{}","description":"test"}}"#, i))
            .collect();
        let listing = format!(r#"{{"results":[{}]}}"#, entries.join(","));
        let needle = format!("node={}", urlencoding::encode(switch));
        self.on_query("get_node_interfaces", &needle, &listing)
            .on_query(
                "is_vlan_tag_available",
                &needle,
                r#"{"results":[{"available":1}]}"#,
            )
    }

    pub fn requests(&self) -> Vec<String> {
        self.script.lock().requests.clone()
    }

    /// Actions in call order.
    pub fn actions(&self) -> Vec<String> {
        self.requests().iter().map(|r| action_of(r)).collect()
    }

    pub fn requests_for(&self, action: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| action_of(r) == action)
            .collect()
    }

    pub fn count(&self, action: &str) -> usize {
        self.requests_for(action).len()
    }

    /// Forget the requests made so far (e.g. the session bootstrap).
    pub fn clear_requests(&self) {
        self.script.lock().requests.clear();
    }

    fn lookup(&self, path_and_query: &str) -> Option<Reply> {
        let action = action_of(path_and_query);
        let mut script = self.script.lock();
        script.requests.push(path_and_query.to_string());
        script
            .rules
            .iter()
            .rev()
            .find(|rule| {
                rule.action == action
                    && rule
                        .contains
                        .as_deref()
                        .is_none_or(|needle| path_and_query.contains(needle))
            })
            .map(|rule| rule.reply.clone())
    }

    /// Session bound to this script and the default workgroup.
    pub async fn session(&self) -> Session<ScriptedNrm> {
        self.session_with_timeout(Duration::from_secs(5)).await
    }

    pub async fn session_with_timeout(&self, timeout: Duration) -> Session<ScriptedNrm> {
        let client = NrmClient::new(self.clone()).with_timeout(timeout);
        let session = Session::establish_with(CONTROL_URL, client, WORKGROUP)
            .await
            .unwrap();
        self.clear_requests();
        session
    }
}

#[async_trait]
impl Transport for ScriptedNrm {
    async fn get(&self, path_and_query: &str) -> oess_cm::nrm::Result<Bytes> {
        match self.lookup(path_and_query) {
            Some(Reply::Json(body)) => Ok(Bytes::from(body)),
            Some(Reply::Slow(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(Bytes::from(body))
            }
            Some(Reply::Unauthorized) => Err(NrmError::Unauthorized(401)),
            Some(Reply::Status(status, body)) => Err(NrmError::Status { status, body }),
            None => Err(NrmError::Status {
                status: 404,
                body: format!("no scripted reply for {}", path_and_query),
            }),
        }
    }
}
