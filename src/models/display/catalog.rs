//! Catalog display models for `types` and `regions`

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{PolicyScope, ResourceType};
use crate::output::formatters::yes_no;

/// Commercial regions offered by `edgeguard regions`.
pub const KNOWN_REGIONS: [&str; 17] = [
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "sa-east-1",
];

/// Resource type row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ResourceTypeDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "SERVICE")]
    pub service: String,

    /// Policy scope that protects this type
    #[tabled(rename = "SCOPE")]
    pub scope: String,
}

impl From<ResourceType> for ResourceTypeDisplay {
    fn from(resource_type: ResourceType) -> Self {
        let scope = if resource_type.uses_global_scope() {
            PolicyScope::Global
        } else {
            PolicyScope::Regional
        };

        Self {
            id: resource_type.id().to_string(),
            name: resource_type.display_name().to_string(),
            service: resource_type.service().to_string(),
            scope: scope.to_string(),
        }
    }
}

/// Region row for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RegionDisplay {
    #[tabled(rename = "REGION")]
    pub region: String,

    /// Scanned when `scan` runs without `--region`
    #[tabled(rename = "DEFAULT")]
    pub default: String,
}

impl RegionDisplay {
    /// Known regions plus any configured region outside that list.
    pub fn list(defaults: &[String]) -> Vec<Self> {
        let mut regions: Vec<&str> = KNOWN_REGIONS.to_vec();
        for region in defaults {
            if !regions.contains(&region.as_str()) {
                regions.push(region.as_str());
            }
        }

        regions
            .into_iter()
            .map(|region| Self {
                region: region.to_string(),
                default: yes_no(defaults.iter().any(|d| d == region)).to_string(),
            })
            .collect()
    }
}
