//! Protection policy models

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Region from which globally scoped policies are managed and evaluated.
pub const GLOBAL_REGION: &str = "us-east-1";

/// Prefix of the resource segment that marks a globally scoped policy identifier.
const GLOBAL_SCOPE_KEYWORD: &str = "global";

/// Where a protection policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyScope {
    /// Attached to CDN distributions, managed from [`GLOBAL_REGION`]
    Global,
    /// Attached to regional resources
    Regional,
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyScope::Global => write!(f, "GLOBAL"),
            PolicyScope::Regional => write!(f, "REGIONAL"),
        }
    }
}

/// A web application firewall policy (web ACL).
///
/// Fields are private so the scope/region invariant holds for every value:
/// a `Global` policy always reports [`GLOBAL_REGION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionPolicy {
    arn: String,
    name: String,
    id: String,
    scope: PolicyScope,
    region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ProtectionPolicy {
    pub fn new(
        arn: impl Into<String>,
        name: impl Into<String>,
        id: impl Into<String>,
        scope: PolicyScope,
        region: impl Into<String>,
    ) -> Self {
        let region = match scope {
            PolicyScope::Global => GLOBAL_REGION.to_string(),
            PolicyScope::Regional => region.into(),
        };
        Self {
            arn: arn.into(),
            name: name.into(),
            id: id.into(),
            scope,
            region,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    /// Parse a policy from its identifier.
    ///
    /// Expected shape: `scheme:service:region:account:scope/.../name/id`. The
    /// scope is `Global` when the resource segment starts with `global`.
    pub fn from_identifier(arn: &str) -> Result<Self, IdentifierError> {
        let fields: Vec<&str> = arn.splitn(6, ':').collect();
        if fields.len() < 6 {
            return Err(IdentifierError::MissingFields(arn.to_string()));
        }

        let resource = fields[5];
        let segments: Vec<&str> = resource.split('/').collect();
        if segments.len() < 3 {
            return Err(IdentifierError::MissingSegments(arn.to_string()));
        }

        let name = segments[segments.len() - 2];
        let id = segments[segments.len() - 1];
        if name.is_empty() || id.is_empty() {
            return Err(IdentifierError::EmptyComponent(arn.to_string()));
        }

        let scope = if resource.starts_with(GLOBAL_SCOPE_KEYWORD) {
            PolicyScope::Global
        } else {
            PolicyScope::Regional
        };

        Ok(Self::new(arn, name, id, scope, fields[3]))
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> PolicyScope {
        self.scope
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    #[cfg(test)]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for ProtectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.scope)
    }
}

/// A policy together with the identifiers of every resource it protects.
#[derive(Debug, Clone)]
pub struct PolicyAssociations {
    pub policy: ProtectionPolicy,
    pub resource_ids: Vec<String>,
}
