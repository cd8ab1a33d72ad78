//! Session client and query layer for the CCP API

use async_trait::async_trait;
use dnscentral_core::config::NetcupCredentials;
use dnscentral_core::types::{DnsRecord, DnsZone, DomainListing};
use dnscentral_core::{DomainDirectory, Error, Result};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, warn};

use crate::protocol::{action, ApiResponse, DnsRecordSet, LoginData, RequestEnvelope};
use crate::transport::{HttpTransport, RpcTransport};

/// Future returned by a [`NetcupClient::with_session`] body
pub type SessionFuture<'c, R> = Pin<Box<dyn Future<Output = Result<R>> + Send + 'c>>;

/// Opaque session credential issued by `login`
///
/// The Debug implementation does NOT expose the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionId(<REDACTED>)")
    }
}

/// Client for one provider account
///
/// Holds at most one session. Every call carries the customer number,
/// the API key and the current session id (empty when there is none).
/// A client is meant to serve one logical request and is not shared.
pub struct NetcupClient<T: RpcTransport = HttpTransport> {
    credentials: NetcupCredentials,
    transport: T,
    session: Option<SessionId>,
}

impl<T: RpcTransport> std::fmt::Debug for NetcupClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcupClient")
            .field("credentials", &self.credentials)
            .field("session", &self.session)
            .finish()
    }
}

impl<T: RpcTransport> NetcupClient<T> {
    /// Create a client without a session
    pub fn new(credentials: NetcupCredentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
            session: None,
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Execute one remote procedure call
    ///
    /// Transport fields (customer number, API key, session id) are always
    /// present in `param`; a caller param with the same key replaces the
    /// value.
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: the decoded body, whatever its `status`
    /// - `Err(Error)`: transport fault or a body that is not a response object
    pub async fn call(&self, action: &str, params: Map<String, Value>) -> Result<ApiResponse> {
        let mut param = Map::new();
        param.insert(
            "customernumber".to_string(),
            Value::String(self.credentials.customer_number.clone()),
        );
        param.insert(
            "apikey".to_string(),
            Value::String(self.credentials.api_key.clone()),
        );
        param.insert(
            "apisessionid".to_string(),
            Value::String(
                self.session
                    .as_ref()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            ),
        );
        param.extend(params);

        let body = serde_json::to_value(RequestEnvelope { action, param })?;

        debug!("Calling CCP action: {}", action);
        let raw = self.transport.post(&body).await?;
        let response: ApiResponse = serde_json::from_value(raw)?;

        if !response.is_success() {
            warn!("CCP action {} did not succeed: {}", action, response.message());
        }

        Ok(response)
    }

    /// Log in, propagating transport faults
    ///
    /// `Ok(false)` means the provider rejected the credentials or sent no
    /// session id.
    async fn try_login(&mut self) -> Result<bool> {
        let mut params = Map::new();
        params.insert(
            "apipassword".to_string(),
            Value::String(self.credentials.api_password.clone()),
        );

        let response = self.call(action::LOGIN, params).await?;
        if !response.is_success() {
            return Ok(false);
        }

        match response.into_payload::<LoginData>()?.apisessionid {
            Some(id) if !id.is_empty() => {
                self.session = Some(SessionId(id));
                info!("CCP session established");
                Ok(true)
            }
            _ => {
                warn!("CCP login succeeded without a session id");
                Ok(false)
            }
        }
    }

    /// Authenticate and store the session id
    ///
    /// Calling again re-authenticates. On any failure (rejection or
    /// transport fault) returns false and leaves the session as it was.
    pub async fn login(&mut self) -> bool {
        match self.try_login().await {
            Ok(ok) => ok,
            Err(e) => {
                warn!("CCP login failed: {}", e);
                false
            }
        }
    }

    /// End the session
    ///
    /// Without a session this succeeds without any remote call. On
    /// failure the session is kept.
    pub async fn logout(&mut self) -> bool {
        if self.session.is_none() {
            return true;
        }

        match self.call(action::LOGOUT, Map::new()).await {
            Ok(response) if response.is_success() => {
                self.session = None;
                info!("CCP session ended");
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("CCP logout failed: {}", e);
                false
            }
        }
    }

    /// Make sure a session is held, logging in if needed
    ///
    /// # Returns
    ///
    /// - `Err(Error::Authentication)`: the provider rejected the login
    /// - `Err(Error)`: transport fault during login
    pub async fn ensure_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        if self.try_login().await? {
            Ok(())
        } else {
            Err(Error::auth("CCP login rejected"))
        }
    }

    /// Run `body` inside a session
    ///
    /// Establishes a session on entry and attempts exactly one logout on
    /// exit, whether `body` succeeded or failed. A failed logout is logged
    /// and does not replace the body's result.
    pub async fn with_session<R, F>(&mut self, body: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c mut Self) -> SessionFuture<'c, R>,
    {
        let result = match self.ensure_session().await {
            Ok(()) => body(self).await,
            Err(e) => Err(e),
        };

        if !self.logout().await {
            warn!("CCP session could not be closed");
        }

        result
    }

    fn domain_param(domain: &str) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("domainname".to_string(), Value::String(domain.to_string()));
        params
    }
}

#[async_trait]
impl<T: RpcTransport> DomainDirectory for NetcupClient<T> {
    async fn list_domains(&mut self) -> Result<Vec<String>> {
        self.ensure_session().await?;

        let response = self.call(action::LIST_ALL_DOMAINS, Map::new()).await?;
        let domains = response.into_payload::<DomainListing>()?.into_names();

        debug!("Account has {} domain(s)", domains.len());
        Ok(domains)
    }

    async fn get_dns_records(&mut self, domain: &str) -> Result<Vec<DnsRecord>> {
        self.ensure_session().await?;

        let response = self
            .call(action::INFO_DNS_RECORDS, Self::domain_param(domain))
            .await?;
        let records = response
            .into_payload::<DnsRecordSet>()?
            .dnsrecords
            .unwrap_or_default();

        debug!("{} has {} record(s)", domain, records.len());
        Ok(records)
    }

    async fn get_dns_zone(&mut self, domain: &str) -> Result<DnsZone> {
        self.ensure_session().await?;

        let response = self
            .call(action::INFO_DNS_ZONE, Self::domain_param(domain))
            .await?;
        response.into_payload::<DnsZone>()
    }

    fn provider_name(&self) -> &'static str {
        crate::PROVIDER_NAME
    }
}
