// # Domain Directory Trait
//
// Query layer over the provider account: domains, zones and records.
//
// ## Implementations
//
// - Netcup CCP API: `dnscentral-netcup` crate
//
// ## Usage
//
// ```rust,ignore
// use dnscentral_core::DomainDirectory;
//
// async fn dump(directory: &mut impl DomainDirectory) -> dnscentral_core::Result<()> {
//     for (domain, data) in directory.get_all_domains_with_records().await? {
//         println!("{}: {} record(s)", domain, data.records.len());
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::Result;
use crate::types::{DnsRecord, DnsZone, DomainRecords, IpMatch, RecordType};

/// Trait for the domain/DNS query layer
///
/// Methods take `&mut self` because an implementation may have to
/// establish a provider session before it can answer.
///
/// # Error Policy
///
/// "No data" is never an error: a provider that reports failure or an
/// empty payload for a query yields an empty collection. Only transport
/// faults (network, non-2xx HTTP, malformed JSON) and authentication
/// failures are returned as `Err`.
#[async_trait]
pub trait DomainDirectory: Send {
    /// List all domains of the account
    async fn list_domains(&mut self) -> Result<Vec<String>>;

    /// Get all DNS records of one domain
    async fn get_dns_records(&mut self, domain: &str) -> Result<Vec<DnsRecord>>;

    /// Get zone information of one domain
    async fn get_dns_zone(&mut self, domain: &str) -> Result<DnsZone>;

    /// Provider name used in views (e.g. "netcup")
    fn provider_name(&self) -> &'static str;

    /// Zone and records for every domain of the account
    ///
    /// Issues one listing call plus two calls per domain, sequentially.
    /// The provider has no bulk call for this. Entries keep listing order.
    async fn get_all_domains_with_records(&mut self) -> Result<IndexMap<String, DomainRecords>> {
        let domains = self.list_domains().await?;
        let mut result = IndexMap::with_capacity(domains.len());

        for domain in domains {
            let zone = self.get_dns_zone(&domain).await?;
            let records = self.get_dns_records(&domain).await?;
            result.insert(domain, DomainRecords { zone, records });
        }

        Ok(result)
    }

    /// Find every type-A record whose destination is exactly `target_ip`
    ///
    /// Plain string comparison: no CIDR matching, no address normalization.
    async fn find_domains_by_ip(&mut self, target_ip: &str) -> Result<Vec<IpMatch>> {
        let all_data = self.get_all_domains_with_records().await?;
        Ok(select_a_records(&all_data, target_ip))
    }
}

/// Type-A records pointing at `target_ip`, in the order of `all_data`
pub fn select_a_records(all_data: &IndexMap<String, DomainRecords>, target_ip: &str) -> Vec<IpMatch> {
    all_data
        .iter()
        .flat_map(|(domain, data)| {
            data.records
                .iter()
                .filter(|r| r.record_type == RecordType::A && r.destination == target_ip)
                .map(move |r| IpMatch {
                    domain: domain.clone(),
                    hostname: r.hostname.clone(),
                    record: r.clone(),
                })
        })
        .collect()
}
