//! Resource type catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Edge resource types that can carry a web application firewall policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "APPLICATION_LOAD_BALANCER")]
    LoadBalancer,
    #[serde(rename = "CLOUDFRONT_DISTRIBUTION")]
    CdnDistribution,
    #[serde(rename = "API_GATEWAY_REST_API")]
    RestApi,
    #[serde(rename = "API_GATEWAY_HTTP_API")]
    HttpApi,
    #[serde(rename = "APPSYNC_GRAPHQL_API")]
    GraphqlApi,
    #[serde(rename = "COGNITO_USER_POOL")]
    UserPool,
    #[serde(rename = "APP_RUNNER_SERVICE")]
    AppRunnerService,
    #[serde(rename = "VERIFIED_ACCESS_INSTANCE")]
    VerifiedAccessInstance,
}

/// Static metadata for a resource type.
#[derive(Debug)]
pub struct ResourceTypeInfo {
    /// Canonical identifier, also the firewall API's resource type string
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Owning cloud service
    pub service: &'static str,
    /// Protected by globally scoped policies instead of regional ones
    pub global_scope: bool,
}

// Indexed by `ResourceType as usize`; keep in declaration order.
static RESOURCE_TYPES: [ResourceTypeInfo; 8] = [
    ResourceTypeInfo {
        id: "APPLICATION_LOAD_BALANCER",
        display_name: "Application Load Balancer",
        service: "elasticloadbalancing",
        global_scope: false,
    },
    ResourceTypeInfo {
        id: "CLOUDFRONT_DISTRIBUTION",
        display_name: "CloudFront Distribution",
        service: "cloudfront",
        global_scope: true,
    },
    ResourceTypeInfo {
        id: "API_GATEWAY_REST_API",
        display_name: "API Gateway REST API",
        service: "apigateway",
        global_scope: false,
    },
    ResourceTypeInfo {
        id: "API_GATEWAY_HTTP_API",
        display_name: "API Gateway HTTP API",
        service: "apigateway",
        global_scope: false,
    },
    ResourceTypeInfo {
        id: "APPSYNC_GRAPHQL_API",
        display_name: "AppSync GraphQL API",
        service: "appsync",
        global_scope: false,
    },
    ResourceTypeInfo {
        id: "COGNITO_USER_POOL",
        display_name: "Cognito User Pool",
        service: "cognito-idp",
        global_scope: false,
    },
    ResourceTypeInfo {
        id: "APP_RUNNER_SERVICE",
        display_name: "App Runner Service",
        service: "apprunner",
        global_scope: false,
    },
    ResourceTypeInfo {
        id: "VERIFIED_ACCESS_INSTANCE",
        display_name: "Verified Access Instance",
        service: "ec2",
        global_scope: false,
    },
];

impl ResourceType {
    /// All resource types, in catalog order.
    pub const ALL: [ResourceType; 8] = [
        ResourceType::LoadBalancer,
        ResourceType::CdnDistribution,
        ResourceType::RestApi,
        ResourceType::HttpApi,
        ResourceType::GraphqlApi,
        ResourceType::UserPool,
        ResourceType::AppRunnerService,
        ResourceType::VerifiedAccessInstance,
    ];

    /// Resource types that can sit behind a CDN distribution as its origin.
    pub const FRONTABLE: [ResourceType; 3] = [
        ResourceType::HttpApi,
        ResourceType::RestApi,
        ResourceType::LoadBalancer,
    ];

    pub fn info(self) -> &'static ResourceTypeInfo {
        &RESOURCE_TYPES[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.info().id
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub fn service(self) -> &'static str {
        self.info().service
    }

    pub fn uses_global_scope(self) -> bool {
        self.info().global_scope
    }

    pub fn is_frontable(self) -> bool {
        Self::FRONTABLE.contains(&self)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|rt| rt.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<&str> = ResourceType::ALL.iter().map(|rt| rt.id()).collect();
                format!(
                    "unknown resource type '{}' (expected one of: {})",
                    s,
                    valid.join(", ")
                )
            })
    }
}
