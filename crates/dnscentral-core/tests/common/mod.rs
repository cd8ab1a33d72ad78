//! Test doubles and common utilities for the aggregation contract tests

#![allow(dead_code)]

use dnscentral_core::error::Result;
use dnscentral_core::types::{DnsRecord, DnsZone, RecordType};
use dnscentral_core::DomainDirectory;
use std::collections::HashMap;

/// An in-memory DomainDirectory that counts calls
#[derive(Default)]
pub struct FakeDirectory {
    domains: Vec<String>,
    records: HashMap<String, Vec<DnsRecord>>,
    zones: HashMap<String, DnsZone>,
    /// Call counter for list_domains()
    list_calls: usize,
    /// Call counter for get_dns_records()
    record_calls: usize,
    /// Call counter for get_dns_zone()
    zone_calls: usize,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a domain with its records
    pub fn with_domain(mut self, domain: &str, records: Vec<DnsRecord>) -> Self {
        self.domains.push(domain.to_string());
        self.records.insert(domain.to_string(), records);
        self
    }

    /// Set the zone of an already added domain
    pub fn with_zone(mut self, domain: &str, zone: serde_json::Value) -> Self {
        let zone: DnsZone = serde_json::from_value(zone).expect("zone is an object");
        self.zones.insert(domain.to_string(), zone);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls
    }

    pub fn record_calls(&self) -> usize {
        self.record_calls
    }

    pub fn zone_calls(&self) -> usize {
        self.zone_calls
    }
}

#[async_trait::async_trait]
impl DomainDirectory for FakeDirectory {
    async fn list_domains(&mut self) -> Result<Vec<String>> {
        self.list_calls += 1;
        Ok(self.domains.clone())
    }

    async fn get_dns_records(&mut self, domain: &str) -> Result<Vec<DnsRecord>> {
        self.record_calls += 1;
        Ok(self.records.get(domain).cloned().unwrap_or_default())
    }

    async fn get_dns_zone(&mut self, domain: &str) -> Result<DnsZone> {
        self.zone_calls += 1;
        Ok(self.zones.get(domain).cloned().unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "netcup"
    }
}

/// Shorthand for a record without provider extras
pub fn record(record_type: &str, hostname: &str, destination: &str) -> DnsRecord {
    DnsRecord::new(RecordType::from(record_type.to_string()), hostname, destination)
}
