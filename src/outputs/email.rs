//! Email digest of a scan run.
//!
//! The digest is a `multipart/alternative` message: an HTML table of matches
//! (organization, linked title, location, posted date, recency note) with a
//! one-line-per-match plaintext fallback. Organizations that could not be
//! scanned are listed under the table.
//!
//! Submission uses `lettre`'s blocking SMTP transport with STARTTLS, run on
//! the blocking thread pool so the runtime is never stalled.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::error::Error;
use std::fmt::Write;
use tracing::{info, instrument};

use crate::config::{EmailConfig, SmtpConfig};
use crate::models::{MatchRecord, ScanReport};
use crate::utils::escape_html;

/// Text shown in the Posted column: the parsed date, else the raw token.
fn posted_label(record: &MatchRecord) -> String {
    match (&record.job.posted_at, &record.job.posted_text) {
        (Some(dt), _) => dt.date_naive().to_string(),
        (None, Some(raw)) => raw.clone(),
        (None, None) => String::new(),
    }
}

/// `"{prefix} {YYYY-MM-DD}"` for the run's start date.
pub fn subject(prefix: &str, report: &ScanReport) -> String {
    format!("{} {}", prefix, report.started_at.date_naive())
}

/// HTML body of the digest.
pub fn render_html(report: &ScanReport) -> String {
    let mut html = String::new();

    if report.matches.is_empty() {
        html.push_str("<p>No verified matches found.</p>\n");
    } else {
        html.push_str("<h3>Job Tracker: new verified matches</h3>\n");
        html.push_str("<table border='0' cellpadding='6' cellspacing='0'>\n");
        html.push_str(
            "<tr><th align='left'>Org</th><th align='left'>Title</th>\
             <th align='left'>Location</th><th align='left'>Posted</th>\
             <th align='left'>Notes</th></tr>\n",
        );
        for record in &report.matches {
            let title = if record.job.title.is_empty() {
                "(no title)".to_string()
            } else {
                escape_html(&record.job.title)
            };
            let title_cell = match &record.job.url {
                Some(url) => format!(
                    "<a href='{}' target='_blank' rel='noreferrer'>{}</a>",
                    escape_html(url),
                    title
                ),
                None => title,
            };
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&record.organization_name),
                title_cell,
                escape_html(record.job.location.as_deref().unwrap_or_default()),
                escape_html(&posted_label(record)),
                escape_html(&record.recency_note),
            );
        }
        html.push_str("</table>\n");
    }

    if !report.errors.is_empty() {
        html.push_str("<h4>Organizations that could not be scanned</h4>\n<ul>\n");
        for e in &report.errors {
            let _ = writeln!(
                html,
                "<li><a href='{}'>{}</a>: {}</li>",
                escape_html(&e.organization_url),
                escape_html(&e.organization_name),
                escape_html(&e.error)
            );
        }
        html.push_str("</ul>\n");
    }
    html
}

/// Plaintext fallback body, one line per match.
pub fn render_text(report: &ScanReport) -> String {
    let mut text = String::new();
    for record in &report.matches {
        let _ = writeln!(
            text,
            "{} | {} | {} | posted: {} | notes: {}",
            record.organization_name,
            record.job.title,
            record.job.url.as_deref().unwrap_or("-"),
            posted_label(record),
            record.recency_note
        );
    }
    if !report.errors.is_empty() {
        text.push_str("\nErrors:\n");
        for e in &report.errors {
            let _ = writeln!(text, "{} | {} | {}", e.organization_name, e.organization_url, e.error);
        }
    }
    text
}

/// Build the multipart digest message.
pub fn build_message(email: &EmailConfig, report: &ScanReport) -> Result<Message, Box<dyn Error>> {
    let mut builder = Message::builder()
        .from(email.from.parse::<Mailbox>()?)
        .subject(subject(&email.subject_prefix, report));
    for to in &email.to {
        builder = builder.to(to.parse::<Mailbox>()?);
    }
    let message = builder.multipart(MultiPart::alternative_plain_html(
        render_text(report),
        render_html(report),
    ))?;
    Ok(message)
}

/// Submit the digest over authenticated SMTP.
#[instrument(level = "info", skip_all, fields(host = %smtp.host, port = smtp.port, recipients = email.to.len()))]
pub async fn send_digest(
    smtp: &SmtpConfig,
    email: &EmailConfig,
    report: &ScanReport,
) -> Result<(), Box<dyn Error>> {
    let message = build_message(email, report)?;
    let mailer = SmtpTransport::starttls_relay(&smtp.host)?
        .port(smtp.port)
        .credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()))
        .build();

    tokio::task::spawn_blocking(move || mailer.send(&message)).await??;
    info!(matches = report.matches.len(), "Sent digest email");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobCandidate, OrganizationFetchError};
    use chrono::{TimeZone, Utc};

    fn report() -> ScanReport {
        ScanReport {
            started_at: Utc.with_ymd_and_hms(2025, 1, 10, 6, 0, 0).unwrap(),
            matches: vec![
                MatchRecord {
                    organization_name: "Acme & Sons".to_string(),
                    organization_url: "https://acme.example/careers".to_string(),
                    job: JobCandidate {
                        title: "Backend <Rust> Engineer".to_string(),
                        url: Some("https://acme.example/jobs/1".to_string()),
                        location: Some("Location: Berlin".to_string()),
                        posted_at: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
                        posted_text: Some("2025-01-01".to_string()),
                        ..Default::default()
                    },
                    matched_keywords: vec!["backend".to_string()],
                    recency_note: "posted 2025-01-01".to_string(),
                },
                MatchRecord {
                    organization_name: "Beta".to_string(),
                    organization_url: "https://beta.example/jobs".to_string(),
                    job: JobCandidate { title: String::new(), ..Default::default() },
                    matched_keywords: vec!["backend".to_string()],
                    recency_note: "no posted date (included for review)".to_string(),
                },
            ],
            errors: vec![OrganizationFetchError {
                organization_name: "Down".to_string(),
                organization_url: "https://down.example/jobs".to_string(),
                error: "transient failure fetching https://down.example/jobs: timed out".to_string(),
            }],
        }
    }

    #[test]
    fn test_subject() {
        assert_eq!(subject("[Job Alert]", &report()), "[Job Alert] 2025-01-10");
    }

    #[test]
    fn test_html_escapes_and_links() {
        let html = render_html(&report());
        assert!(html.contains("Acme &amp; Sons"));
        assert!(html.contains(
            "<a href='https://acme.example/jobs/1' target='_blank' rel='noreferrer'>Backend &lt;Rust&gt; Engineer</a>"
        ));
        assert!(html.contains("<td>2025-01-01</td>"));
        assert!(html.contains("(no title)"));
        assert!(html.contains("Organizations that could not be scanned"));
        assert!(html.contains("timed out"));
    }

    #[test]
    fn test_html_without_matches() {
        let empty = ScanReport { matches: vec![], errors: vec![], ..report() };
        assert_eq!(render_html(&empty), "<p>No verified matches found.</p>\n");
    }

    #[test]
    fn test_text_fallback_lines() {
        let text = render_text(&report());
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Acme & Sons | Backend <Rust> Engineer | https://acme.example/jobs/1 | posted: 2025-01-01 | notes: posted 2025-01-01")
        );
        assert_eq!(
            lines.next(),
            Some("Beta |  | - | posted:  | notes: no posted date (included for review)")
        );
        assert!(text.contains("Down | https://down.example/jobs |"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let email = EmailConfig {
            from: "not an address".to_string(),
            to: vec!["me@example.com".to_string()],
            subject_prefix: "[Job Alert]".to_string(),
        };
        assert!(build_message(&email, &report()).is_err());
    }

    #[test]
    fn test_build_message_multipart() {
        let email = EmailConfig {
            from: "Tracker <bot@example.com>".to_string(),
            to: vec!["me@example.com".to_string(), "you@example.com".to_string()],
            subject_prefix: "[Jobs]".to_string(),
        };
        let message = build_message(&email, &report()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: [Jobs] 2025-01-10"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("me@example.com"));
    }
}
