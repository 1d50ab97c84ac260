//! Resource display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{or_dash, truncate_string};
use crate::client::models::{Resource, ScanError};
use crate::output::formatters::yes_no;

const NAME_WIDTH: usize = 40;

/// Resource row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ResourceDisplay {
    #[tabled(rename = "TYPE")]
    pub resource_type: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "REGION")]
    pub region: String,

    /// Directly attached policy name
    #[tabled(rename = "WAF")]
    pub waf: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "PUBLIC")]
    pub public: String,

    /// Fronting distribution id, when protection comes from a CDN
    #[tabled(rename = "FRONTED BY")]
    pub fronted_by: String,
}

impl From<&Resource> for ResourceDisplay {
    fn from(resource: &Resource) -> Self {
        let name = resource.name.as_deref().unwrap_or(&resource.arn);
        let fronted_by = resource.fronted_by.as_ref().map(|f| {
            let distribution = f.resource_id.rsplit('/').next().unwrap_or(&f.resource_id);
            format!("{} ({})", distribution, f.policy.name())
        });

        Self {
            resource_type: resource.resource_type.display_name().to_string(),
            name: truncate_string(name, NAME_WIDTH),
            region: resource.region.clone(),
            waf: or_dash(resource.policy_name()),
            status: resource.compliance_status().to_string(),
            public: yes_no(resource.is_public).to_string(),
            fronted_by: or_dash(fronted_by.as_deref()),
        }
    }
}

/// Scan error row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ErrorDisplay {
    #[tabled(rename = "REGION")]
    pub region: String,

    #[tabled(rename = "TYPE")]
    pub resource_type: String,

    #[tabled(rename = "MESSAGE")]
    pub message: String,
}

impl From<&ScanError> for ErrorDisplay {
    fn from(error: &ScanError) -> Self {
        Self {
            region: error.region.clone(),
            resource_type: or_dash(error.resource_type.map(|rt| rt.id())),
            message: error.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{PolicyBuilder, ResourceBuilder};
    use crate::client::models::{FrontedBy, ResourceType};

    #[test]
    fn test_protected_resource_row() {
        let resource = ResourceBuilder::load_balancer("web")
            .public(true)
            .policy(PolicyBuilder::regional("web-acl").build())
            .build();
        let row = ResourceDisplay::from(&resource);

        assert_eq!(row.resource_type, "Application Load Balancer");
        assert_eq!(row.name, "web");
        assert_eq!(row.waf, "web-acl");
        assert_eq!(row.status, "COMPLIANT");
        assert_eq!(row.public, "Yes");
        assert_eq!(row.fronted_by, "--");
    }

    #[test]
    fn test_fronted_resource_row() {
        let mut resource = ResourceBuilder::rest_api("1jnx7rksc5").build();
        resource.name = None;
        resource.fronted_by = Some(FrontedBy {
            resource_id: "arn:aws:cloudfront::123456789012:distribution/E2QWRUHAPOMQZL"
                .to_string(),
            policy: PolicyBuilder::global("edge").build(),
            note: String::new(),
        });
        let row = ResourceDisplay::from(&resource);

        // Falls back to the identifier when unnamed
        assert!(row.name.starts_with("arn:aws:apigateway"));
        assert_eq!(row.waf, "--");
        assert_eq!(row.status, "COMPLIANT_FRONTED_BY_WAF");
        assert_eq!(row.fronted_by, "E2QWRUHAPOMQZL (edge)");
    }

    #[test]
    fn test_error_row() {
        let error = ScanError {
            region: "eu-west-1".to_string(),
            resource_type: Some(ResourceType::AppRunnerService),
            message: "AccessDeniedException".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let row = ErrorDisplay::from(&error);
        assert_eq!(row.resource_type, "APP_RUNNER_SERVICE");

        let untyped = ScanError {
            resource_type: None,
            ..error
        };
        assert_eq!(ErrorDisplay::from(&untyped).resource_type, "--");
    }
}
