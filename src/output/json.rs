//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    /// The actual data
    pub data: T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Scan the data belongs to, for scan reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_id: Option<String>,
}

impl<T> JsonOutput<T> {
    /// Create a new JSON output with metadata
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                scan_id: None,
            },
        }
    }

    /// Tag the output with the scan that produced it
    pub fn with_scan_id(mut self, scan_id: impl Into<String>) -> Self {
        self.meta.scan_id = Some(scan_id.into());
        self
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(data);
    serde_json::to_string_pretty(&output)
}

/// Format a scan report, recording its scan id in the metadata
pub fn format_scan_json<T: Serialize + ?Sized>(
    data: &T,
    scan_id: &str,
) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(data).with_scan_id(scan_id);
    serde_json::to_string_pretty(&output)
}
