//! Aggregation engine
//!
//! Builds the dashboard's cross-domain views on top of a
//! [`DomainDirectory`]:
//! - **Domain summaries**: records per domain, A-records and their IPs
//! - **Servers**: A/AAAA records grouped by destination IP, merged with
//!   static [`ServerDirectory`] metadata
//! - **Reverse lookup**: domains whose A-records point at one IP
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │ Aggregator  │────▶│ DomainDirectory  │────▶│ provider API │
//! └─────────────┘     └──────────────────┘     └──────────────┘
//!        │
//!        ├── ServerDirectory (read only)
//!        └── DomainFilter    (read only)
//! ```
//!
//! Every view is recomputed from scratch on each call. The aggregator
//! issues no remote calls of its own beyond those of the directory.

use serde::Serialize;
use indexmap::IndexMap;
use tracing::debug;

use crate::config::{DomainFilter, ServerDirectory};
use crate::error::{Error, Result};
use crate::traits::DomainDirectory;
use crate::traits::domain_directory::select_a_records;
use crate::types::{DnsRecord, DomainRecords, IpMatch, RecordType};

/// Per-domain summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainSummary {
    pub domain: String,
    pub provider: String,
    pub records: Vec<DnsRecord>,
    pub a_records: Vec<DnsRecord>,
    /// Distinct A-record destinations, in first-seen order
    pub ips: Vec<String>,
}

/// One record name served by a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDomain {
    pub domain: String,
    pub hostname: String,
    pub fqdn: String,
}

/// All record names pointing at one IP
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerGroup {
    /// Server name from metadata, empty if unknown
    pub name: String,
    /// Server id from metadata, empty if unknown
    pub id: String,
    /// Record type of the first record seen for this IP
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub domains: Vec<ServerDomain>,
}

/// Builds the dashboard views from a directory and static metadata
pub struct Aggregator<'a, D: DomainDirectory> {
    directory: &'a mut D,
    servers: &'a ServerDirectory,
    filter: &'a DomainFilter,
}

impl<'a, D: DomainDirectory> Aggregator<'a, D> {
    /// Create an aggregator over `directory`
    pub fn new(directory: &'a mut D, servers: &'a ServerDirectory, filter: &'a DomainFilter) -> Self {
        Self {
            directory,
            servers,
            filter,
        }
    }

    /// Domains of the account admitted by the filter, in listing order
    async fn listed_domains(&mut self) -> Result<Vec<String>> {
        let mut domains = self.directory.list_domains().await?;

        if !self.filter.is_empty() {
            let before = domains.len();
            domains.retain(|d| self.filter.allows(d));
            debug!("Domain filter kept {} of {} domain(s)", domains.len(), before);
        }

        Ok(domains)
    }

    /// Records, A-records and distinct A-record IPs for every domain
    pub async fn domain_summaries(&mut self) -> Result<Vec<DomainSummary>> {
        let provider = self.directory.provider_name().to_string();
        let domains = self.listed_domains().await?;
        let mut summaries = Vec::with_capacity(domains.len());

        for domain in domains {
            let records = self.directory.get_dns_records(&domain).await?;
            let a_records: Vec<DnsRecord> = records
                .iter()
                .filter(|r| r.record_type == RecordType::A)
                .cloned()
                .collect();

            let mut ips: Vec<String> = Vec::new();
            for record in &a_records {
                if !ips.contains(&record.destination) {
                    ips.push(record.destination.clone());
                }
            }

            summaries.push(DomainSummary {
                domain,
                provider: provider.clone(),
                records,
                a_records,
                ips,
            });
        }

        debug!("Built {} domain summary(ies)", summaries.len());
        Ok(summaries)
    }

    /// A and AAAA records grouped by destination IP, in first-seen order
    ///
    /// A group is created on the first record seen for its IP and takes
    /// that record's type; name and id come from the server metadata when
    /// the IP is known, and are blank otherwise.
    pub async fn servers(&mut self) -> Result<IndexMap<String, ServerGroup>> {
        let domains = self.listed_domains().await?;
        let mut groups: IndexMap<String, ServerGroup> = IndexMap::new();

        for domain in domains {
            let records = self.directory.get_dns_records(&domain).await?;

            for record in records.iter().filter(|r| r.record_type.is_address()) {
                let group = groups.entry(record.destination.clone()).or_insert_with(|| {
                    let metadata = self.servers.get(&record.destination);
                    ServerGroup {
                        name: metadata.map(|m| m.name.clone()).unwrap_or_default(),
                        id: metadata.map(|m| m.id.clone()).unwrap_or_default(),
                        record_type: record.record_type.clone(),
                        domains: Vec::new(),
                    }
                });

                group.domains.push(ServerDomain {
                    domain: domain.clone(),
                    hostname: record.hostname.clone(),
                    fqdn: record.fqdn(&domain),
                });
            }
        }

        debug!("Grouped records onto {} server IP(s)", groups.len());
        Ok(groups)
    }

    /// Domains with a type-A record pointing exactly at `ip`
    ///
    /// Issues the same calls as [`DomainDirectory::find_domains_by_ip`],
    /// limited to domains admitted by the filter. Matches keep listing order.
    pub async fn domains_by_ip(&mut self, ip: &str) -> Result<Vec<IpMatch>> {
        if ip.trim().is_empty() {
            return Err(Error::invalid_input("IP address cannot be empty"));
        }

        let domains = self.listed_domains().await?;
        let mut all_data = IndexMap::with_capacity(domains.len());

        for domain in domains {
            let zone = self.directory.get_dns_zone(&domain).await?;
            let records = self.directory.get_dns_records(&domain).await?;
            all_data.insert(domain, DomainRecords { zone, records });
        }

        let matches = select_a_records(&all_data, ip);

        debug!("Found {} record(s) pointing at {}", matches.len(), ip);
        Ok(matches)
    }
}
