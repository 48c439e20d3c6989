//! Command-line interface definitions for the job tracker.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Scan behaviour lives in the YAML config; the CLI only says where that file
//! is, where to put outputs and whether to send mail.

use clap::Parser;

/// Command-line arguments for the job tracker.
///
/// # Examples
///
/// ```sh
/// # Scan and mail the digest
/// job_tracker --config ./config.yaml
///
/// # Scan, keep a JSON report, never send mail
/// job_tracker -c ./config.yaml -j ./reports --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Directory to write the run report as JSON
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Scan and render the digest but do not send it
    #[arg(long)]
    pub dry_run: bool,

    /// SMTP password, overriding `smtp.password` from the config file
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["job_tracker"]);
        assert_eq!(cli.config, "config.yaml");
        assert_eq!(cli.json_output_dir, None);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["job_tracker", "-c", "/etc/jobs.yaml", "-j", "/tmp/reports", "--dry-run"]);
        assert_eq!(cli.config, "/etc/jobs.yaml");
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/reports"));
        assert!(cli.dry_run);
    }
}
