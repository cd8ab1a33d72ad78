// # dnscentral-core
//
// Core library for the DNS Central dashboard.
//
// ## Architecture Overview
//
// The dashboard reads domains and DNS records from a single provider
// account and presents them grouped by domain or by destination server:
// - **DomainDirectory**: Trait for the query layer (list domains, records, zones)
// - **Aggregator**: Cross-domain views built purely from directory queries
// - **ServerDirectory**: Static server metadata keyed by IP
// - **DomainFilter**: Optional allowlist of domains to show
//
// ## Data Flow
//
// Aggregator → DomainDirectory → (provider crate) → remote API.
// Results are recomputed on every call; nothing is cached or persisted.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use aggregate::{Aggregator, DomainSummary, ServerDomain, ServerGroup};
pub use config::{DashboardConfig, DomainFilter, NetcupCredentials, ServerDirectory, ServerMetadata};
pub use error::{Error, Result};
pub use traits::DomainDirectory;
pub use types::{DnsRecord, DnsZone, DomainListing, DomainRecords, IpMatch, RecordType};
