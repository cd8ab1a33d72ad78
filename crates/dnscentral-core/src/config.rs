//! Configuration types for DNS Central
//!
//! Loading (environment variables) is done by the binary; this module
//! only defines the shapes and their validation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default JSON-RPC endpoint of the provider
pub const DEFAULT_ENDPOINT: &str = "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default listen address of the dashboard
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Account credentials for the provider API
///
/// The Debug implementation does NOT expose the API key or password.
#[derive(Clone, PartialEq, Eq)]
pub struct NetcupCredentials {
    /// Customer number (account identifier)
    pub customer_number: String,
    /// API key
    pub api_key: String,
    /// API password, only sent on login
    pub api_password: String,
}

impl NetcupCredentials {
    pub fn new(
        customer_number: impl Into<String>,
        api_key: impl Into<String>,
        api_password: impl Into<String>,
    ) -> Self {
        Self {
            customer_number: customer_number.into(),
            api_key: api_key.into(),
            api_password: api_password.into(),
        }
    }

    /// Validate that no field is empty
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.customer_number.is_empty() {
            return Err(crate::Error::config("Customer number cannot be empty"));
        }
        if self.api_key.is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }
        if self.api_password.is_empty() {
            return Err(crate::Error::config("API password cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for NetcupCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcupCredentials")
            .field("customer_number", &self.customer_number)
            .field("api_key", &"<REDACTED>")
            .field("api_password", &"<REDACTED>")
            .finish()
    }
}

/// Server metadata as written in configuration
///
/// Older configurations map an IP straight to a server name; newer ones
/// use an object with name and id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServerEntry {
    /// Plain server name
    Legacy(String),
    /// Name and id
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default)]
        id: String,
    },
}

/// Static metadata about one server, keyed by IP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerMetadata {
    pub ip: String,
    pub name: String,
    pub id: String,
}

impl ServerMetadata {
    fn from_entry(ip: String, entry: ServerEntry) -> Self {
        match entry {
            ServerEntry::Legacy(name) => Self {
                ip,
                name,
                id: String::new(),
            },
            ServerEntry::Detailed { name, id } => Self { ip, name, id },
        }
    }
}

/// Server metadata for all known IPs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerDirectory {
    servers: HashMap<String, ServerMetadata>,
}

impl ServerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `ip -> name` or `ip -> {name, id}`
    ///
    /// An empty (or whitespace-only) string yields an empty directory.
    pub fn from_json(raw: &str) -> Result<Self, crate::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }

        let entries: HashMap<String, ServerEntry> = serde_json::from_str(raw)
            .map_err(|e| crate::Error::config(format!("Invalid server metadata: {}", e)))?;

        Ok(entries
            .into_iter()
            .map(|(ip, entry)| ServerMetadata::from_entry(ip, entry))
            .collect())
    }

    /// Add or replace the metadata for one IP
    pub fn insert(&mut self, metadata: ServerMetadata) {
        self.servers.insert(metadata.ip.clone(), metadata);
    }

    pub fn get(&self, ip: &str) -> Option<&ServerMetadata> {
        self.servers.get(ip)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl FromIterator<ServerMetadata> for ServerDirectory {
    fn from_iter<I: IntoIterator<Item = ServerMetadata>>(iter: I) -> Self {
        let mut directory = Self::new();
        for metadata in iter {
            directory.insert(metadata);
        }
        directory
    }
}

/// Optional allowlist restricting which domains are shown
///
/// An empty filter admits every domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilter {
    allowed: Vec<String>,
}

impl DomainFilter {
    /// Filter admitting every domain
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of domain names
    pub fn parse(raw: &str) -> Self {
        Self {
            allowed: raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn allows(&self, domain: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Provider account credentials
    pub credentials: NetcupCredentials,

    /// Static server metadata
    pub servers: ServerDirectory,

    /// Domains to show
    pub domain_filter: DomainFilter,

    /// JSON-RPC endpoint URL
    pub endpoint: String,

    /// Listen address of the dashboard
    pub bind_addr: String,

    /// Timeout for each remote call
    pub request_timeout: Duration,
}

impl DashboardConfig {
    /// Create a configuration with defaults for everything but the credentials
    pub fn new(credentials: NetcupCredentials) -> Self {
        Self {
            credentials,
            servers: ServerDirectory::new(),
            domain_filter: DomainFilter::allow_all(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            request_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.credentials.validate()?;

        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Endpoint must use HTTP or HTTPS scheme. Got: {}",
                self.endpoint
            )));
        }

        if self.bind_addr.is_empty() {
            return Err(crate::Error::config("Bind address cannot be empty"));
        }

        if self.request_timeout.is_zero() {
            return Err(crate::Error::config("Request timeout must be > 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> NetcupCredentials {
        NetcupCredentials::new("12345", "key", "password")
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let creds = NetcupCredentials::new("12345", "secret_key_abc", "secret_pw_xyz");
        let debug_str = format!("{:?}", creds);

        assert!(debug_str.contains("12345"));
        assert!(!debug_str.contains("secret_key_abc"));
        assert!(!debug_str.contains("secret_pw_xyz"));
    }

    #[test]
    fn test_credentials_validation() {
        assert!(credentials().validate().is_ok());
        assert!(NetcupCredentials::new("", "key", "pw").validate().is_err());
        assert!(NetcupCredentials::new("1", "", "pw").validate().is_err());
        assert!(NetcupCredentials::new("1", "key", "").validate().is_err());
    }

    #[test]
    fn test_server_directory_both_shapes() {
        let directory = ServerDirectory::from_json(
            r#"{"1.2.3.4": {"name": "srv1", "id": "s1"}, "5.6.7.8": "legacy"}"#,
        )
        .unwrap();

        assert_eq!(directory.len(), 2);

        let detailed = directory.get("1.2.3.4").unwrap();
        assert_eq!(detailed.name, "srv1");
        assert_eq!(detailed.id, "s1");

        let legacy = directory.get("5.6.7.8").unwrap();
        assert_eq!(legacy.name, "legacy");
        assert_eq!(legacy.id, "");
    }

    #[test]
    fn test_server_directory_partial_object() {
        let directory = ServerDirectory::from_json(r#"{"1.2.3.4": {"name": "srv1"}}"#).unwrap();
        assert_eq!(directory.get("1.2.3.4").unwrap().id, "");
    }

    #[test]
    fn test_server_directory_empty_and_invalid() {
        assert!(ServerDirectory::from_json("").unwrap().is_empty());
        assert!(ServerDirectory::from_json("{}").unwrap().is_empty());
        assert!(matches!(
            ServerDirectory::from_json("[1, 2]"),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_domain_filter() {
        let all = DomainFilter::parse("");
        assert!(all.allows("anything.com"));

        let filter = DomainFilter::parse(" a.com, ,B.com ");
        assert!(filter.allows("a.com"));
        assert!(filter.allows("b.com"));
        assert!(!filter.allows("c.com"));
    }

    #[test]
    fn test_dashboard_config_validation() {
        let config = DashboardConfig::new(credentials());
        assert!(config.validate().is_ok());

        let mut bad_endpoint = config.clone();
        bad_endpoint.endpoint = "ftp://example.com".to_string();
        assert!(bad_endpoint.validate().is_err());

        let mut zero_timeout = config;
        zero_timeout.request_timeout = Duration::ZERO;
        assert!(zero_timeout.validate().is_err());
    }
}
