//! Core traits for DNS Central
//!
//! - [`DomainDirectory`]: Query domains, zones and records from the provider

pub mod domain_directory;

pub use domain_directory::DomainDirectory;
