//! CDN distribution models

use serde::{Deserialize, Serialize};

/// Raw CDN distribution data as reported by the distribution listing.
///
/// The policy identifier is kept unparsed; the origin index builder decides
/// whether it names a usable policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionRecord {
    /// Distribution ID (e.g. `E3T3BYVBS5ILLA`)
    pub id: String,

    /// Distribution identifier (ARN)
    pub arn: String,

    /// Domain name assigned to the distribution
    pub domain_name: String,

    /// Identifier of the attached policy, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_acl_id: Option<String>,

    /// Backend hostnames the distribution forwards to
    #[serde(default)]
    pub origins: Vec<String>,
}
