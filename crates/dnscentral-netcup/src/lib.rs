// # Netcup CCP API Client
//
// This crate talks to the netcup customer control panel (CCP) JSON-RPC
// API on behalf of the DNS Central dashboard.
//
// ## Components
//
// - `RpcTransport` / `HttpTransport`: POSTs one JSON envelope, returns the decoded body
// - `NetcupClient`: session handling (login, logout, lazy re-login) and
//   the `DomainDirectory` query layer
//
// ## Session Lifetime
//
// A session belongs to exactly one `NetcupClient`. The intended use is a
// scoped block per incoming request:
//
// ```rust,ignore
// let mut client = NetcupClient::new(credentials, transport);
// let domains = client
//     .with_session(|c| Box::pin(async move { c.list_domains().await }))
//     .await?;
// ```
//
// `with_session` logs in on entry and attempts a logout on every exit
// path.
//
// ## Security Requirements
//
// - API key, API password and session id NEVER appear in logs
//
// ## API Reference
//
// - Endpoint: POST `https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON`
// - Body: `{"action": ..., "param": {"customernumber", "apikey", "apisessionid", ...}}`
// - Actions used: `login`, `logout`, `listallDomains`, `infoDnsRecords`, `infoDnsZone`

pub mod client;
pub mod protocol;
pub mod transport;

pub use client::{NetcupClient, SessionFuture, SessionId};
pub use protocol::{ApiResponse, RequestEnvelope};
pub use transport::{HttpTransport, RpcTransport};

/// Provider name reported in dashboard views
pub const PROVIDER_NAME: &str = "netcup";
