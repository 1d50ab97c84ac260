//! Scanned resource model

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ProtectionPolicy, ResourceType};
use crate::scanner::compliance::{self, ComplianceStatus};

/// Transitive protection through a CDN distribution in front of the resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontedBy {
    /// Identifier of the fronting distribution
    pub resource_id: String,
    /// Policy attached to the fronting distribution
    pub policy: ProtectionPolicy,
    /// Human-readable explanation
    pub note: String,
}

/// A cloud resource that can carry a protection policy.
///
/// Built by an inventory collaborator without policy information; the scanner
/// fills in `policy` during association and `fronted_by` during propagation.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub arn: String,
    pub resource_type: ResourceType,
    pub region: String,
    pub account_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Policy attached directly to this resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<ProtectionPolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fronted_by: Option<FrontedBy>,

    pub is_public: bool,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(
        arn: impl Into<String>,
        resource_type: ResourceType,
        region: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            arn: arn.into(),
            resource_type,
            region: region.into(),
            account_id: account_id.into(),
            name: None,
            policy: None,
            fronted_by: None,
            is_public: false,
            tags: BTreeMap::new(),
            scanned_at: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    pub fn policy_arn(&self) -> Option<&str> {
        self.policy.as_ref().map(|p| p.arn())
    }

    pub fn policy_name(&self) -> Option<&str> {
        self.policy.as_ref().map(|p| p.name())
    }

    /// Policy of the fronting distribution, if the resource is fronted.
    pub fn fronting_policy(&self) -> Option<&ProtectionPolicy> {
        self.fronted_by.as_ref().map(|f| &f.policy)
    }

    pub fn compliance_status(&self) -> ComplianceStatus {
        compliance::evaluate(self)
    }

    pub fn is_compliant(&self) -> bool {
        self.compliance_status().is_compliant()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let waf = if self.has_policy() { "WAF" } else { "no WAF" };
        write!(
            f,
            "{} {} ({})",
            self.resource_type,
            self.name.as_deref().unwrap_or("unnamed"),
            waf
        )
    }
}
