//! JSON-RPC wire types of the CCP API

use dnscentral_core::types::DnsRecord;
use dnscentral_core::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action names
pub mod action {
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const LIST_ALL_DOMAINS: &str = "listallDomains";
    pub const INFO_DNS_RECORDS: &str = "infoDnsRecords";
    pub const INFO_DNS_ZONE: &str = "infoDnsZone";
}

/// Status value of a successful response
pub const STATUS_SUCCESS: &str = "success";

/// Outgoing request body
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<'a> {
    pub action: &'a str,
    pub param: Map<String, Value>,
}

/// Decoded response body
///
/// Every field is optional on the wire; a body missing `status` counts
/// as a failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub statuscode: Option<Value>,

    #[serde(default)]
    pub shortmessage: Option<String>,

    #[serde(default)]
    pub longmessage: Option<String>,

    #[serde(default)]
    pub responsedata: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Human-readable reason for logs
    pub fn message(&self) -> String {
        let code = self
            .statuscode
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let text = self
            .longmessage
            .as_deref()
            .or(self.shortmessage.as_deref())
            .unwrap_or("no message");
        format!("status={} code={} {}", self.status, code, text)
    }

    /// Decode the payload, or `T::default()` when there is none
    ///
    /// Failure responses and empty payloads (`null`, `""`) are absence,
    /// not errors. A payload of the wrong shape is a JSON fault.
    pub fn into_payload<T>(self) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if !self.is_success() {
            return Ok(T::default());
        }

        match self.responsedata {
            Value::Null => Ok(T::default()),
            Value::String(ref s) if s.is_empty() => Ok(T::default()),
            data => Ok(serde_json::from_value(data)?),
        }
    }
}

/// Payload of `login`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginData {
    #[serde(default)]
    pub apisessionid: Option<String>,
}

/// Payload of `infoDnsRecords`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DnsRecordSet {
    #[serde(default)]
    pub dnsrecords: Option<Vec<DnsRecord>>,
}
