//! Compliance evaluation
//!
//! A resource passes when it carries a policy directly or through a fronting
//! distribution. Otherwise the type decides: unprotected CDN distributions
//! always fail, public load balancers and REST APIs fail, and everything else
//! is treated as not requiring a firewall.

use std::fmt;

use serde::Serialize;

use crate::client::models::{Resource, ResourceType};

/// Outcome of evaluating one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    CompliantFrontedByWaf,
    NonCompliant,
    CompliantNoWafRequired,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "COMPLIANT",
            ComplianceStatus::CompliantFrontedByWaf => "COMPLIANT_FRONTED_BY_WAF",
            ComplianceStatus::NonCompliant => "NON_COMPLIANT",
            ComplianceStatus::CompliantNoWafRequired => "COMPLIANT_NO_WAF_REQUIRED",
        }
    }

    pub fn is_compliant(&self) -> bool {
        !matches!(self, ComplianceStatus::NonCompliant)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate a single resource. Rules are checked in order; the first match wins.
pub fn evaluate(resource: &Resource) -> ComplianceStatus {
    if resource.has_policy() {
        return ComplianceStatus::Compliant;
    }
    if resource.fronting_policy().is_some() {
        return ComplianceStatus::CompliantFrontedByWaf;
    }

    match resource.resource_type {
        ResourceType::CdnDistribution => ComplianceStatus::NonCompliant,
        ResourceType::LoadBalancer | ResourceType::RestApi if resource.is_public => {
            ComplianceStatus::NonCompliant
        }
        _ => ComplianceStatus::CompliantNoWafRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{PolicyBuilder, ResourceBuilder};
    use crate::client::models::FrontedBy;

    #[test]
    fn test_direct_policy_is_compliant() {
        let resource = ResourceBuilder::cdn("d1")
            .policy(PolicyBuilder::global("edge").build())
            .build();
        assert_eq!(evaluate(&resource), ComplianceStatus::Compliant);
    }

    #[test]
    fn test_fronted_resource_is_compliant() {
        let mut resource = ResourceBuilder::load_balancer("web").public(true).build();
        resource.fronted_by = Some(FrontedBy {
            resource_id: "arn:aws:cloudfront::123456789012:distribution/E1".to_string(),
            policy: PolicyBuilder::global("edge").build(),
            note: "fronted".to_string(),
        });
        assert_eq!(evaluate(&resource), ComplianceStatus::CompliantFrontedByWaf);
        assert!(evaluate(&resource).is_compliant());
    }

    #[test]
    fn test_unprotected_cdn_fails_even_when_private() {
        let resource = ResourceBuilder::cdn("d1").public(false).build();
        assert_eq!(evaluate(&resource), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_public_load_balancer_and_rest_api_fail() {
        let lb = ResourceBuilder::load_balancer("web").public(true).build();
        let rest = ResourceBuilder::rest_api("orders").public(true).build();
        assert_eq!(evaluate(&lb), ComplianceStatus::NonCompliant);
        assert_eq!(evaluate(&rest), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_internal_and_other_types_need_no_waf() {
        let lb = ResourceBuilder::load_balancer("internal").build();
        let rest = ResourceBuilder::rest_api("internal").build();
        let http = ResourceBuilder::http_api("public-http").public(true).build();
        let pool = ResourceBuilder::user_pool("users").public(true).build();
        for resource in [lb, rest, http, pool] {
            assert_eq!(evaluate(&resource), ComplianceStatus::CompliantNoWafRequired);
        }
    }

    #[test]
    fn test_evaluation_is_stable() {
        let direct = ResourceBuilder::load_balancer("direct")
            .public(true)
            .policy(PolicyBuilder::regional("app").build())
            .build();
        let mut fronted = ResourceBuilder::rest_api("fronted").public(true).build();
        fronted.fronted_by = Some(FrontedBy {
            resource_id: "arn:aws:cloudfront::123456789012:distribution/E1".to_string(),
            policy: PolicyBuilder::global("edge").build(),
            note: "fronted".to_string(),
        });
        let unprotected = ResourceBuilder::load_balancer("exposed").public(true).build();

        for resource in [direct, fronted, unprotected] {
            let first = evaluate(&resource);
            assert_eq!(evaluate(&resource), first, "{}", resource.arn);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(ComplianceStatus::Compliant.as_str(), "COMPLIANT");
        assert_eq!(
            ComplianceStatus::CompliantFrontedByWaf.to_string(),
            "COMPLIANT_FRONTED_BY_WAF"
        );
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::CompliantNoWafRequired).unwrap(),
            "\"COMPLIANT_NO_WAF_REQUIRED\""
        );
        assert!(!ComplianceStatus::NonCompliant.is_compliant());
    }
}
