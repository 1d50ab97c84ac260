//! Scan command implementation

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::cli::context::{account_client, resolve_format};
use crate::cli::{CommandContext, GlobalOptions, OutputFormat, ScanArgs};
use crate::client::models::ScanResult;
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::models::{MultiAccountReport, ScanReport};
use crate::output::Formattable;
use crate::output::csv::{accounts_filename, default_filename, write_csv_file, write_csv_report};
use crate::output::formatters::plural;
use crate::scanner::Scanner;
use crate::scanner::accounts::{MultiAccountResult, role_arn_for, scan_accounts};

/// Run the scan command
pub async fn run(opts: &GlobalOptions, args: &ScanArgs) -> Result<()> {
    if !args.accounts.is_empty() {
        return run_accounts(opts, args).await;
    }

    let ctx = CommandContext::new(opts).await?;
    let options = args.to_options(&ctx.config);
    let format = if args.stdout {
        OutputFormat::Csv
    } else {
        ctx.format
    };

    info!(
        "Scanning {} across {}",
        plural(options.resource_types.len(), "resource type"),
        plural(options.regions.len(), "region")
    );

    let spinner = ScanSpinner::new(format, std::io::stderr().is_terminal());
    spinner.set_message(format!(
        "Scanning {} for WAF coverage...",
        options.regions.join(", ")
    ));

    let scanner = Scanner::new(Arc::clone(&ctx.client), options);
    let result = scanner.scan().await;
    spinner.finish();
    let result = result?;

    let written = match report_path(args, &ctx.config, &default_filename(&result)) {
        Some(path) => Some(write_csv_file(&result, &path)?),
        None => None,
    };

    // A CSV report that went to a file is not repeated on stdout
    if !(format == OutputFormat::Csv && written.is_some()) {
        ScanReport::new(&result).print(format)?;
    }

    if let Some(path) = written {
        eprintln!("{} Results written to {}", "✓".green(), path.display());
    }

    if args.fail_on_non_compliant {
        check_compliance(&result)?;
    }

    Ok(())
}

/// Scan every `--account` through `--role-name`, one scanner per account.
///
/// The combined report is printed even when some accounts fail; the command
/// then exits non-zero.
async fn run_accounts(opts: &GlobalOptions, args: &ScanArgs) -> Result<()> {
    if opts.inventory_ref().is_some() {
        return Err(ConfigError::Invalid(
            "--account scans live accounts and cannot be combined with --inventory".to_string(),
        )
        .into());
    }
    let role_name = args.role_name.as_deref().ok_or_else(|| {
        ConfigError::Invalid("--account needs --role-name".to_string())
    })?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = Config::load_or_default(&config_path)?;
    let options = args.to_options(&config);
    let format = if args.stdout {
        OutputFormat::Csv
    } else {
        resolve_format(opts, &config)?
    };
    let external_id = opts
        .external_id_ref()
        .or(config.external_id.as_deref())
        .map(String::from);

    info!(
        "Scanning {} through role {}",
        plural(args.accounts.len(), "account"),
        role_name
    );

    let spinner = ScanSpinner::new(format, std::io::stderr().is_terminal());
    spinner.set_message(format!(
        "Scanning {} for WAF coverage...",
        plural(args.accounts.len(), "account")
    ));

    let result = scan_accounts(&args.accounts, &options, |account_id| {
        account_client(role_arn_for(&account_id, role_name), external_id.clone())
    })
    .await;
    spinner.finish();

    let report = MultiAccountReport::new(&result);
    let written = match report_path(args, &config, &accounts_filename()) {
        Some(path) => Some(write_csv_report(
            &path,
            &report.format(OutputFormat::Csv)?,
            result.total_resources(),
        )?),
        None => None,
    };

    if !(format == OutputFormat::Csv && written.is_some()) {
        report.print(format)?;
    }

    if let Some(path) = written {
        eprintln!("{} Results written to {}", "✓".green(), path.display());
    }

    check_accounts(&result, args.fail_on_non_compliant)
}

/// Fail when an account could not be scanned, then apply the compliance gate
/// to the combined totals when asked.
fn check_accounts(result: &MultiAccountResult, fail_on_non_compliant: bool) -> Result<()> {
    if result.is_partial() {
        return Err(Error::AccountsFailed {
            failed: result.failures.len(),
            requested: result.accounts_requested(),
        });
    }
    if fail_on_non_compliant {
        return compliance_gate(result.non_compliant_resources(), result.scan_errors());
    }
    Ok(())
}

/// Where the CSV report goes, if anywhere.
///
/// `--output` wins; a directory gets `default_name`. Without it the report
/// lands in `preferences.output_dir` when configured.
fn report_path(args: &ScanArgs, config: &Config, default_name: &str) -> Option<PathBuf> {
    if args.stdout {
        return None;
    }

    match (&args.output, &config.preferences.output_dir) {
        (Some(path), _) if path.is_dir() => Some(path.join(default_name)),
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(dir.join(default_name)),
        (None, None) => None,
    }
}

/// Fail when the scan found non-compliant resources or recorded errors.
fn check_compliance(result: &ScanResult) -> Result<()> {
    compliance_gate(result.non_compliant_resources(), result.errors.len())
}

fn compliance_gate(non_compliant: usize, errors: usize) -> Result<()> {
    if non_compliant > 0 || errors > 0 {
        debug!(
            "Compliance gate failed: {} non-compliant, {} errors",
            non_compliant, errors
        );
        return Err(Error::PolicyViolation {
            non_compliant,
            errors,
        });
    }
    Ok(())
}

/// Spinner on stderr while a pretty scan runs.
struct ScanSpinner {
    bar: Option<ProgressBar>,
}

impl ScanSpinner {
    fn new(format: OutputFormat, is_tty: bool) -> Self {
        let bar = should_show_spinner(format, is_tty).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(ProgressStyle::default_spinner());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        Self { bar }
    }

    fn set_message(&self, message: String) {
        if let Some(bar) = &self.bar {
            bar.set_message(message);
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

fn should_show_spinner(format: OutputFormat, is_tty: bool) -> bool {
    format == OutputFormat::Pretty && is_tty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::ResourceBuilder;
    use tempfile::TempDir;

    fn result() -> ScanResult {
        ScanResult::new("123456789012", vec!["us-east-1".to_string()])
    }

    #[test]
    fn test_spinner_only_for_pretty_tty() {
        assert!(should_show_spinner(OutputFormat::Pretty, true));
        assert!(!should_show_spinner(OutputFormat::Pretty, false));
        assert!(!should_show_spinner(OutputFormat::Json, true));
        assert!(!should_show_spinner(OutputFormat::Csv, true));
    }

    #[test]
    fn test_report_path_explicit_file() {
        let args = ScanArgs {
            output: Some(PathBuf::from("out/report.csv")),
            ..ScanArgs::default()
        };
        assert_eq!(
            report_path(&args, &Config::default(), &default_filename(&result())),
            Some(PathBuf::from("out/report.csv"))
        );
    }

    #[test]
    fn test_report_path_directory_gets_default_name() {
        let dir = TempDir::new().unwrap();
        let args = ScanArgs {
            output: Some(dir.path().to_path_buf()),
            ..ScanArgs::default()
        };

        let path = report_path(&args, &Config::default(), &default_filename(&result())).unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("waf-scan-123456789012-")
        );
    }

    #[test]
    fn test_report_path_from_config() {
        let mut config = Config::default();
        assert_eq!(report_path(&ScanArgs::default(), &config, &default_filename(&result())), None);

        config.preferences.output_dir = Some(PathBuf::from("/var/reports"));
        let path = report_path(&ScanArgs::default(), &config, &default_filename(&result())).unwrap();
        assert!(path.starts_with("/var/reports"));

        // --stdout never writes a file
        let args = ScanArgs {
            stdout: true,
            ..ScanArgs::default()
        };
        assert_eq!(report_path(&args, &config, &default_filename(&result())), None);
    }

    #[test]
    fn test_compliance_gate() {
        let mut scan = result();
        scan.add_resource(ResourceBuilder::user_pool("users").build());
        assert!(check_compliance(&scan).is_ok());

        scan.add_resource(ResourceBuilder::load_balancer("web").public(true).build());
        let err = check_compliance(&scan).unwrap_err();
        assert!(matches!(
            err,
            Error::PolicyViolation {
                non_compliant: 1,
                errors: 0
            }
        ));
    }

    #[test]
    fn test_compliance_gate_counts_scan_errors() {
        let mut scan = result();
        scan.add_error("eu-west-1", None, "Failed to list REGIONAL WAF associations");
        assert!(matches!(
            check_compliance(&scan),
            Err(Error::PolicyViolation { errors: 1, .. })
        ));
    }

    #[test]
    fn test_failed_account_fails_the_command() {
        let outcome = MultiAccountResult {
            scans: vec![result()],
            failures: vec![crate::scanner::accounts::AccountFailure {
                account_id: "222222222222".to_string(),
                error: "Access denied: sts:AssumeRole".to_string(),
            }],
        };
        assert!(matches!(
            check_accounts(&outcome, false),
            Err(Error::AccountsFailed {
                failed: 1,
                requested: 2
            })
        ));
    }

    #[test]
    fn test_accounts_gate_uses_combined_totals() {
        let mut exposed = result();
        exposed.add_resource(ResourceBuilder::load_balancer("web").public(true).build());
        let outcome = MultiAccountResult {
            scans: vec![result(), exposed],
            failures: Vec::new(),
        };

        assert!(check_accounts(&outcome, false).is_ok());
        assert!(matches!(
            check_accounts(&outcome, true),
            Err(Error::PolicyViolation {
                non_compliant: 1,
                errors: 0
            })
        ));
    }
}
