//! Test doubles for the CCP client contract tests
//!
//! `MockTransport` answers each request from a script keyed by action
//! (and optionally by `domainname`) and records every envelope it
//! receives.

#![allow(dead_code)]

use dnscentral_core::{Error, NetcupCredentials, Result};
use dnscentral_netcup::{NetcupClient, RpcTransport};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Scripted reply for one action
#[derive(Debug, Clone)]
pub enum Reply {
    /// Decoded response body
    Body(Value),
    /// Non-2xx status
    Status(u16),
    /// Network failure
    Unreachable,
}

#[derive(Default)]
struct Script {
    by_action: HashMap<String, Reply>,
    by_domain: HashMap<(String, String), Reply>,
    requests: Vec<Value>,
}

/// A scripted transport; clones share the same script and request log
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `action` request with `reply`
    pub fn on(self, action: &str, reply: Reply) -> Self {
        self.inner
            .lock()
            .unwrap()
            .by_action
            .insert(action.to_string(), reply);
        self
    }

    /// Answer `action` requests for one domain with `reply`
    pub fn on_domain(self, action: &str, domain: &str, reply: Reply) -> Self {
        self.inner
            .lock()
            .unwrap()
            .by_domain
            .insert((action.to_string(), domain.to_string()), reply);
        self
    }

    /// Replace the reply for `action` after construction
    pub fn set(&self, action: &str, reply: Reply) {
        self.inner
            .lock()
            .unwrap()
            .by_action
            .insert(action.to_string(), reply);
    }

    /// All request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Actions of all requests received so far, in order
    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["action"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Number of requests for `action`
    pub fn count(&self, action: &str) -> usize {
        self.actions().iter().filter(|a| *a == action).count()
    }

    /// The `param` object of the last request for `action`
    pub fn last_param(&self, action: &str) -> Value {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r["action"] == action)
            .map(|r| r["param"].clone())
            .unwrap_or(Value::Null)
    }
}

#[async_trait::async_trait]
impl RpcTransport for MockTransport {
    async fn post(&self, body: &Value) -> Result<Value> {
        let mut script = self.inner.lock().unwrap();
        script.requests.push(body.clone());

        let action = body["action"].as_str().unwrap_or_default().to_string();
        let domain = body["param"]["domainname"].as_str().map(str::to_string);

        let reply = domain
            .and_then(|d| script.by_domain.get(&(action.clone(), d)).cloned())
            .or_else(|| script.by_action.get(&action).cloned());

        match reply {
            Some(Reply::Body(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(Error::http(status, "scripted status")),
            Some(Reply::Unreachable) => Err(Error::transport("scripted network failure")),
            None => Err(Error::transport(format!("no scripted reply for {}", action))),
        }
    }
}

/// Successful response carrying `data`
pub fn success(data: Value) -> Reply {
    Reply::Body(json!({
        "serverrequestid": "srv-1",
        "clientrequestid": "",
        "action": "",
        "status": "success",
        "statuscode": 2000,
        "shortmessage": "ok",
        "longmessage": "",
        "responsedata": data
    }))
}

/// Failed response the way the provider reports it
pub fn failure(message: &str) -> Reply {
    Reply::Body(json!({
        "serverrequestid": "srv-1",
        "clientrequestid": "",
        "action": "",
        "status": "error",
        "statuscode": 4013,
        "shortmessage": message,
        "longmessage": message,
        "responsedata": ""
    }))
}

/// Successful login issuing `session_id`
pub fn login_ok(session_id: &str) -> Reply {
    success(json!({"apisessionid": session_id}))
}

/// Transport with working login and logout
pub fn session_transport() -> MockTransport {
    MockTransport::new()
        .on("login", login_ok("sess-1"))
        .on("logout", success(Value::Null))
}

pub fn credentials() -> NetcupCredentials {
    NetcupCredentials::new("12345", "api-key", "api-password")
}

/// A client over a clone of `transport`
pub fn client(transport: &MockTransport) -> NetcupClient<MockTransport> {
    NetcupClient::new(credentials(), transport.clone())
}
