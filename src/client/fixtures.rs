//! Test fixtures and builders for scan model types
//!
//! Provides builder patterns for creating test data with sensible defaults.
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)] // Builder methods are available for future tests

use super::models::{DistributionRecord, PolicyScope, ProtectionPolicy, Resource, ResourceType};

pub const ACCOUNT_ID: &str = "123456789012";
pub const REGION: &str = "us-east-1";

// ============================================================================
// ResourceBuilder
// ============================================================================

/// Builder for creating test Resource instances.
///
/// The identifier is derived from the type, region and name the same way the
/// live inventory builds it, so hostname derivation works on built values.
///
/// # Example
/// ```ignore
/// let lb = ResourceBuilder::load_balancer("web")
///     .region("eu-west-1")
///     .public(true)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    resource_type: ResourceType,
    name: String,
    region: String,
    is_public: bool,
    policy: Option<ProtectionPolicy>,
    arn: Option<String>,
}

impl ResourceBuilder {
    /// Create a builder for any resource type.
    pub fn new(resource_type: ResourceType, name: impl Into<String>) -> Self {
        Self {
            resource_type,
            name: name.into(),
            region: REGION.to_string(),
            is_public: false,
            policy: None,
            arn: None,
        }
    }

    pub fn load_balancer(name: &str) -> Self {
        Self::new(ResourceType::LoadBalancer, name)
    }

    pub fn http_api(name: &str) -> Self {
        Self::new(ResourceType::HttpApi, name)
    }

    pub fn rest_api(name: &str) -> Self {
        Self::new(ResourceType::RestApi, name)
    }

    /// CDN distributions are public by default.
    pub fn cdn(name: &str) -> Self {
        Self::new(ResourceType::CdnDistribution, name).public(true)
    }

    pub fn user_pool(name: &str) -> Self {
        Self::new(ResourceType::UserPool, name)
    }

    /// Set the region.
    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Set the public exposure flag.
    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Attach a policy directly.
    pub fn policy(mut self, policy: ProtectionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Override the generated identifier.
    pub fn arn(mut self, arn: impl Into<String>) -> Self {
        self.arn = Some(arn.into());
        self
    }

    /// Identifier this builder will produce.
    pub fn resource_arn(&self) -> String {
        if let Some(arn) = &self.arn {
            return arn.clone();
        }
        let (name, region) = (&self.name, &self.region);
        match self.resource_type {
            ResourceType::LoadBalancer => format!(
                "arn:aws:elasticloadbalancing:{region}:{ACCOUNT_ID}:loadbalancer/app/{name}/50dc6c495c0c9188"
            ),
            ResourceType::CdnDistribution => {
                format!("arn:aws:cloudfront::{ACCOUNT_ID}:distribution/{name}")
            }
            ResourceType::RestApi => format!("arn:aws:apigateway:{region}::/restapis/{name}"),
            ResourceType::HttpApi => format!("arn:aws:apigateway:{region}::/apis/{name}"),
            ResourceType::GraphqlApi => {
                format!("arn:aws:appsync:{region}:{ACCOUNT_ID}:apis/{name}")
            }
            ResourceType::UserPool => {
                format!("arn:aws:cognito-idp:{region}:{ACCOUNT_ID}:userpool/{name}")
            }
            ResourceType::AppRunnerService => {
                format!("arn:aws:apprunner:{region}:{ACCOUNT_ID}:service/{name}/0123abcd")
            }
            ResourceType::VerifiedAccessInstance => {
                format!("arn:aws:ec2:{region}:{ACCOUNT_ID}:verified-access-instance/{name}")
            }
        }
    }

    /// Build the Resource.
    pub fn build(self) -> Resource {
        let arn = self.resource_arn();
        let mut resource = Resource::new(arn, self.resource_type, self.region, ACCOUNT_ID)
            .with_name(Some(self.name))
            .public(self.is_public);
        resource.policy = self.policy;
        resource
    }
}

// ============================================================================
// PolicyBuilder
// ============================================================================

/// Builder for creating test ProtectionPolicy instances.
///
/// # Example
/// ```ignore
/// let acl = PolicyBuilder::regional("api-acl").region("eu-west-1").build();
/// ```
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    name: String,
    scope: PolicyScope,
    region: String,
    id: Option<String>,
}

impl PolicyBuilder {
    pub fn regional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scope: PolicyScope::Regional,
            region: REGION.to_string(),
            id: None,
        }
    }

    pub fn global(name: &str) -> Self {
        Self {
            scope: PolicyScope::Global,
            ..Self::regional(name)
        }
    }

    /// Set the region (ignored for global policies).
    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Set the policy id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identifier this builder will produce.
    pub fn policy_arn(&self) -> String {
        let id = self.id.clone().unwrap_or_else(|| format!("{}-id", self.name));
        match self.scope {
            PolicyScope::Global => format!(
                "arn:aws:wafv2:us-east-1:{ACCOUNT_ID}:global/webacl/{}/{id}",
                self.name
            ),
            PolicyScope::Regional => format!(
                "arn:aws:wafv2:{}:{ACCOUNT_ID}:regional/webacl/{}/{id}",
                self.region, self.name
            ),
        }
    }

    /// Build the ProtectionPolicy.
    pub fn build(self) -> ProtectionPolicy {
        let arn = self.policy_arn();
        let id = self.id.unwrap_or_else(|| format!("{}-id", self.name));
        ProtectionPolicy::new(arn, self.name, id, self.scope, self.region)
    }
}

// ============================================================================
// DistributionBuilder
// ============================================================================

/// Builder for creating test DistributionRecord instances.
///
/// # Example
/// ```ignore
/// let dist = DistributionBuilder::new("E1")
///     .web_acl(&PolicyBuilder::global("edge").build())
///     .origin("abc123.execute-api.us-east-1.amazonaws.com")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DistributionBuilder {
    id: String,
    web_acl_id: Option<String>,
    origins: Vec<String>,
}

impl DistributionBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            web_acl_id: None,
            origins: Vec::new(),
        }
    }

    /// Attach a policy by identifier.
    pub fn web_acl(mut self, policy: &ProtectionPolicy) -> Self {
        self.web_acl_id = Some(policy.arn().to_string());
        self
    }

    /// Attach a raw policy identifier, which may be malformed.
    pub fn raw_web_acl(mut self, web_acl_id: &str) -> Self {
        self.web_acl_id = Some(web_acl_id.to_string());
        self
    }

    /// Add an origin hostname.
    pub fn origin(mut self, hostname: &str) -> Self {
        self.origins.push(hostname.to_string());
        self
    }

    pub fn build(self) -> DistributionRecord {
        DistributionRecord {
            arn: format!("arn:aws:cloudfront::{ACCOUNT_ID}:distribution/{}", self.id),
            domain_name: format!("{}.cloudfront.net", self.id.to_lowercase()),
            id: self.id,
            web_acl_id: self.web_acl_id,
            origins: self.origins,
        }
    }
}
