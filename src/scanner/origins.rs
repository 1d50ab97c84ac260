//! Origin index: backend hostname -> CDN distributions in front of it

use std::collections::HashMap;

use log::{debug, info};

use crate::client::models::{DistributionRecord, ProtectionPolicy};

/// Hostname fragments of object-storage origins, which never match a tracked
/// resource type.
const STORAGE_ORIGIN_FRAGMENTS: [&str; 2] = [".s3.", ".s3-"];

/// One distribution fronting a hostname.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontingEntry {
    /// Distribution identifier (ARN)
    pub resource_id: String,
    /// Distribution ID
    pub display_id: String,
    /// Distribution domain name
    pub display_name: String,
    /// Policy attached to the distribution, if any
    pub policy: Option<ProtectionPolicy>,
}

/// Reverse index from origin hostname to fronting distributions.
///
/// Entries per hostname keep distribution listing order. Each distribution's
/// own policy is also kept by distribution identifier.
#[derive(Debug, Default, Clone)]
pub struct OriginIndex {
    origins: HashMap<String, Vec<FrontingEntry>>,
    distribution_policies: HashMap<String, ProtectionPolicy>,
}

impl OriginIndex {
    pub fn entries(&self, hostname: &str) -> &[FrontingEntry] {
        self.origins
            .get(hostname)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn contains(&self, hostname: &str) -> bool {
        self.origins.contains_key(hostname)
    }

    /// Policy a distribution carries, by distribution identifier.
    pub fn distribution_policy(&self, distribution_id: &str) -> Option<&ProtectionPolicy> {
        self.distribution_policies.get(distribution_id)
    }

    pub fn hostname_count(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// Whether a hostname belongs to an object-storage origin.
pub fn is_storage_origin(hostname: &str) -> bool {
    STORAGE_ORIGIN_FRAGMENTS
        .iter()
        .any(|fragment| hostname.contains(fragment))
}

/// Parse a distribution's raw policy identifier. Malformed identifiers yield
/// `None`.
fn parse_distribution_policy(distribution: &DistributionRecord) -> Option<ProtectionPolicy> {
    let raw = distribution.web_acl_id.as_deref()?;
    if raw.is_empty() {
        return None;
    }
    match ProtectionPolicy::from_identifier(raw) {
        Ok(policy) => Some(policy),
        Err(e) => {
            debug!(
                "Ignoring policy on distribution {}: {}",
                distribution.id, e
            );
            None
        }
    }
}

/// Build the origin index from a distribution listing.
pub fn build_origin_index(distributions: &[DistributionRecord]) -> OriginIndex {
    let mut index = OriginIndex::default();

    for distribution in distributions {
        let policy = parse_distribution_policy(distribution);
        if let Some(policy) = &policy {
            index
                .distribution_policies
                .insert(distribution.arn.clone(), policy.clone());
        }

        for hostname in &distribution.origins {
            if is_storage_origin(hostname) {
                continue;
            }
            index
                .origins
                .entry(hostname.clone())
                .or_default()
                .push(FrontingEntry {
                    resource_id: distribution.arn.clone(),
                    display_id: distribution.id.clone(),
                    display_name: distribution.domain_name.clone(),
                    policy: policy.clone(),
                });
        }
    }

    info!(
        "Built origin index with {} unique origins from {} distributions",
        index.hostname_count(),
        distributions.len()
    );
    index
}

/// First entry carrying a policy, in builder order.
pub fn first_protected(entries: &[FrontingEntry]) -> Option<&FrontingEntry> {
    entries.iter().find(|entry| entry.policy.is_some())
}
