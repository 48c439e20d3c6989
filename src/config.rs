//! YAML configuration for a scan run.
//!
//! ```yaml
//! scan:
//!   keywords: ["backend", "rust"]
//!   recency_days: 14
//!   allow_undated_jobs: true
//!   request_delay_ms: 1200
//!   concurrency: 1
//!   orgs:
//!     - name: Acme
//!       url: https://acme.example/careers
//! fetch:
//!   timeout_secs: 20
//!   max_attempts: 3
//! smtp:
//!   host: smtp.example.com
//!   port: 587
//!   username: tracker@example.com
//!   password: hunter2
//! email:
//!   from: tracker@example.com
//!   to: ["me@example.com"]
//!   subject_prefix: "[Job Alert]"
//! ```
//!
//! Everything except `scan.orgs` has a default. `smtp` and `email` are only
//! needed when a digest should be mailed.

use serde::Deserialize;
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{info, instrument};
use url::Url;

use crate::fetch::RetryPolicy;
use crate::models::Organization;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scan: ScanConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub smtp: Option<SmtpConfig>,
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_recency_days")]
    pub recency_days: u32,
    #[serde(default = "default_true")]
    pub allow_undated_jobs: bool,
    pub orgs: Vec<Organization>,
    /// Pause between organizations, per worker.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Organizations scanned at once. 1 scans strictly one after another.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_ms: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
            jitter_ms: 250,
            user_agent: concat!("JobTrackerBot/", env!("CARGO_PKG_VERSION"), " reqwest").to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: StdDuration::from_millis(self.base_delay_ms),
            max_delay: StdDuration::from_millis(self.max_delay_ms),
            jitter: StdDuration::from_millis(self.jitter_ms),
        }
    }

    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub from: String,
    pub to: Vec<String>,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_recency_days() -> u32 {
    14
}

fn default_true() -> bool {
    true
}

fn default_request_delay_ms() -> u64 {
    1200
}

fn default_concurrency() -> usize {
    1
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject_prefix() -> String {
    "[Job Alert]".to_string()
}

impl Config {
    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let mut config: Config = serde_yaml::from_str(yaml)?;
        config.scan.keywords = config
            .scan
            .keywords
            .into_iter()
            .map(|kw| kw.trim().to_string())
            .filter(|kw| !kw.is_empty())
            .collect();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.fetch.max_attempts == 0 {
            return Err("fetch.max_attempts must be at least 1".into());
        }
        if self.scan.concurrency == 0 {
            return Err("scan.concurrency must be at least 1".into());
        }
        for org in &self.scan.orgs {
            let url = Url::parse(&org.url)
                .map_err(|e| format!("organization {:?} has invalid url {:?}: {e}", org.name, org.url))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "organization {:?} url must be http(s), got {:?}",
                    org.name, org.url
                )
                .into());
            }
        }
        Ok(())
    }
}

/// Read and validate the YAML configuration file at `path`.
#[instrument(level = "info")]
pub async fn load_config(path: &str) -> Result<Config, Box<dyn Error>> {
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("cannot read config file {path}: {e}"))?;
    let config = Config::from_yaml(&yaml)?;
    info!(
        orgs = config.scan.orgs.len(),
        keywords = config.scan.keywords.len(),
        recency_days = config.scan.recency_days,
        allow_undated = config.scan.allow_undated_jobs,
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
scan:
  keywords: ["Backend", "  ", "rust "]
  orgs:
    - name: Acme
      url: https://acme.example/careers
"#;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.scan.recency_days, 14);
        assert!(config.scan.allow_undated_jobs);
        assert_eq!(config.scan.request_delay_ms, 1200);
        assert_eq!(config.scan.concurrency, 1);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.timeout(), StdDuration::from_secs(20));
        assert!(config.fetch.user_agent.starts_with("JobTrackerBot/"));
        assert!(config.smtp.is_none());
        assert!(config.email.is_none());
    }

    #[test]
    fn test_blank_keywords_dropped_and_trimmed() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.scan.keywords, vec!["Backend", "rust"]);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
scan:
  keywords: [data]
  recency_days: 7
  allow_undated_jobs: false
  concurrency: 4
  orgs:
    - {name: A, url: "https://a.example/jobs"}
    - {name: B, url: "http://b.example/careers"}
fetch:
  max_attempts: 5
  base_delay_ms: 10
smtp:
  host: smtp.example.com
  username: bot@example.com
email:
  from: bot@example.com
  to: [me@example.com]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.scan.recency_days, 7);
        assert!(!config.scan.allow_undated_jobs);
        assert_eq!(config.scan.orgs.len(), 2);
        assert_eq!(config.scan.concurrency, 4);

        let policy = config.fetch.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, StdDuration::from_millis(10));
        assert_eq!(policy.max_delay, StdDuration::from_millis(8000));

        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.password, "");
        assert_eq!(config.email.unwrap().subject_prefix, "[Job Alert]");
    }

    #[test]
    fn test_invalid_org_url_rejected() {
        let yaml = "scan:\n  orgs:\n    - {name: Bad, url: \"not a url\"}\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let yaml = "scan:\n  orgs:\n    - {name: Ftp, url: \"ftp://files.example/jobs\"}\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let yaml = "scan:\n  orgs: []\nfetch:\n  max_attempts: 0\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_negative_recency_rejected_by_type() {
        let yaml = "scan:\n  recency_days: -3\n  orgs: []\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = load_config("/definitely/not/here/config.yaml").await.unwrap_err();
        assert!(err.to_string().contains("cannot read config file"));
    }
}
