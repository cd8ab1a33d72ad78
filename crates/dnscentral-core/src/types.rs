//! Data model for provider responses
//!
//! Records and zones live only for one request/response cycle. Provider
//! fields the dashboard does not interpret are kept verbatim so the JSON
//! API can echo them back.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Hostname marking the zone apex
pub const APEX: &str = "@";

/// DNS record type as reported by the provider
///
/// Matching is case-sensitive: the provider always sends upper-case
/// names, anything else ends up in [`RecordType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Srv,
    Caa,
    Other(String),
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Other(name) => name,
        }
    }

    /// A or AAAA
    pub fn is_address(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa)
    }
}

impl Default for RecordType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for RecordType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "NS" => Self::Ns,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            _ => Self::Other(name),
        }
    }
}

impl From<RecordType> for String {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single DNS record of a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type (A, AAAA, CNAME, ...)
    #[serde(rename = "type", default, deserialize_with = "type_or_blank")]
    pub record_type: RecordType,

    /// Hostname relative to the zone, "@" for the apex
    #[serde(default = "apex", deserialize_with = "string_or_apex")]
    pub hostname: String,

    /// Record target (address, name or text)
    #[serde(default, deserialize_with = "string_or_empty")]
    pub destination: String,

    /// Provider fields not interpreted by the dashboard (id, priority, state, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DnsRecord {
    /// Create a record with no extra provider fields
    pub fn new(
        record_type: RecordType,
        hostname: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            hostname: hostname.into(),
            destination: destination.into(),
            extra: Map::new(),
        }
    }

    /// Whether the record applies to the zone apex
    pub fn is_apex(&self) -> bool {
        self.hostname == APEX
    }

    /// Fully-qualified name of this record within `domain`
    pub fn fqdn(&self, domain: &str) -> String {
        if self.is_apex() {
            domain.to_string()
        } else {
            format!("{}.{}", self.hostname, domain)
        }
    }
}

fn apex() -> String {
    APEX.to_string()
}

fn string_or_apex<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(apex))
}

fn type_or_blank<'de, D>(deserializer: D) -> Result<RecordType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(RecordType::from)
        .unwrap_or_default())
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Zone information for one domain
///
/// Kept as the provider's mapping; the empty mapping means "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DnsZone(pub Map<String, Value>);

impl DnsZone {
    /// Zone name, if reported
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Look up a raw zone field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One entry of a domain listing
///
/// The provider sends either bare names or objects carrying a
/// `domainname` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DomainEntry {
    /// Plain domain name
    Name(String),
    /// Object form
    Object {
        #[serde(default)]
        domainname: Option<String>,
    },
}

impl DomainEntry {
    /// The domain name, if the entry carries one
    pub fn into_name(self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name),
            Self::Object { domainname } => domainname,
        }
    }
}

/// Domain listing as received from the provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DomainListing(pub Vec<DomainEntry>);

impl DomainListing {
    /// Flatten to domain names, dropping entries without a name
    pub fn into_names(self) -> Vec<String> {
        self.0.into_iter().filter_map(DomainEntry::into_name).collect()
    }
}

/// Zone and records of one domain
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DomainRecords {
    pub zone: DnsZone,
    pub records: Vec<DnsRecord>,
}

/// A type-A record of some domain pointing at a looked-up IP
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpMatch {
    pub domain: String,
    pub hostname: String,
    pub record: DnsRecord,
}
