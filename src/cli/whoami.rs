//! Whoami command implementation

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::client::models::CallerIdentity;
use crate::error::Result;
use crate::output::Formattable;

/// Identity row for table/JSON output
#[derive(Debug, Tabled, Serialize)]
struct IdentityDisplay {
    #[tabled(rename = "ACCOUNT")]
    account: String,
    #[tabled(rename = "ARN")]
    arn: String,
    #[tabled(rename = "USER ID")]
    user_id: String,
}

impl From<CallerIdentity> for IdentityDisplay {
    fn from(identity: CallerIdentity) -> Self {
        Self {
            account: identity.account,
            arn: identity.arn,
            user_id: identity.user_id,
        }
    }
}

/// Show the identity scans run as.
///
/// Useful for verifying credentials or a snapshot before scanning.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let identity = IdentityDisplay::from(ctx.client.caller_identity().await?);

    match ctx.format {
        OutputFormat::Pretty => {
            println!("Account: {}", identity.account.bold());
            println!("ARN: {}", identity.arn);
            println!("User ID: {}", identity.user_id);
        }
        format => vec![identity].print(format)?,
    }

    Ok(())
}
