//! Caller identity model

use serde::{Deserialize, Serialize};

/// Identity of the credentials used for the scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Account ID
    pub account: String,

    /// Principal identifier (ARN)
    pub arn: String,

    /// Unique principal ID
    pub user_id: String,
}
