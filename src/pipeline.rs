use tracing::{debug, info};

use crate::app::App;
use crate::calculation::extraction::bot_j_values_from_csv;
use crate::calculation::ranking::top_values;
use crate::calculation::report::JaReport;
use crate::error::Error;
use crate::io::csv_dump::write_records;
use crate::io::sigsci_client::{FeedPage, FeedSource, fetch_with_retry};
use crate::prelude::*;
use crate::window::FeedWindow;

/// Fetch, dump, extract, rank. In that order, once.
pub fn run<S>(ctx: &App, source: &S, window: FeedWindow) -> AppResult<JaReport>
where
    S: FeedSource + ?Sized,
{
    let config = &ctx.config;

    debug!(from = window.from, until = window.until, "Feed window");

    let mut spinner = ctx.spinner("Fetching request feed");
    let response = fetch_with_retry(source, &window, &config.retry, &mut spinner);
    spinner.stop();

    let response = response?;

    if !response.is_success() {
        return Err(Error::FetchFailed {
            status: response.status,
            body: response.body,
        }
        .into());
    }

    let page = FeedPage::from_body(&response.body)?;

    info!(records = page.data.len(), "Fetched request feed");

    write_records(&config.output_file, &page.data)?;

    if config.verbose {
        println!(
            "Data successfully written to {}",
            config.output_file.display()
        );
    }

    let bot_j_values = bot_j_values_from_csv(&config.output_file)?;

    debug!(found = bot_j_values.len(), "Extracted bot_j values");

    let ranked = top_values(&bot_j_values, config.top_n);

    Ok(JaReport::new(config.top_n, ranked))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::Path;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::cli::{Config, Credentials, FeedTarget, RetryPolicy};
    use crate::io::sigsci_client::FeedResponse;

    /// Answers every attempt the same way.
    struct FixedSource {
        status: u16,
        body: String,
        attempts: Cell<u32>,
    }

    impl FixedSource {
        fn new(status: u16, body: &str) -> Self {
            FixedSource {
                status,
                body: body.to_owned(),
                attempts: Cell::new(0),
            }
        }
    }

    impl FeedSource for FixedSource {
        fn fetch_once(&self, _window: &FeedWindow) -> AppResult<FeedResponse> {
            self.attempts.set(self.attempts.get() + 1);

            Ok(FeedResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn app(output_file: &Path) -> App {
        let config = Config {
            credentials: Credentials::default(),
            target: FeedTarget {
                base_url: "http://localhost".to_owned(),
                corp_name: Some("acme".to_owned()),
                site_name: Some("www".to_owned()),
            },
            output_file: output_file.to_path_buf(),
            retry: RetryPolicy {
                max_attempts: 3,
                wait: Duration::ZERO,
            },
            top_n: 2,
            verbose: false,
        };

        App::with_config(config, true)
    }

    fn window() -> FeedWindow {
        FeedWindow {
            from: 1_700_000_000,
            until: 1_700_086_400,
        }
    }

    #[test]
    fn test_full_run() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.csv");
        let body = r#"{"data": [
            {"id": "1", "summation": {"attrs": {"bot_j": "x"}}},
            {"id": "2", "summation": {"attrs": {"bot_j": "y"}}},
            {"id": "3", "remoteIP": "10.0.0.3"},
            {"id": "4", "summation": {"attrs": {"bot_j": "x"}}},
            {"id": "5", "summation": {"attrs": {"bot_j": "z"}}}
        ]}"#;
        let source = FixedSource::new(200, body);

        let report = run(&app(&output), &source, window()).unwrap();

        assert_eq!(source.attempts.get(), 1);
        assert_eq!(report.ranked.len(), 2);
        assert_eq!(report.ranked[0].value, "x");
        assert_eq!(report.ranked[0].count, 2);
        assert_eq!(report.ranked[1].value, "y");

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("id,remoteIP,summation\n"));
        assert_eq!(written.lines().count(), 6);
    }

    #[test]
    fn test_failed_fetch_is_an_error_and_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.csv");
        let source = FixedSource::new(503, "upstream down");

        let error = run(&app(&output), &source, window()).unwrap_err();

        assert_eq!(source.attempts.get(), 3);
        assert_eq!(error.to_string(), "Failed to fetch data: 503 - upstream down");
        assert!(!output.exists());
    }

    #[test]
    fn test_unauthorized_fails_after_one_attempt() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.csv");
        let source = FixedSource::new(401, r#"{"message": "Unauthorized"}"#);

        let error = run(&app(&output), &source, window()).unwrap_err();

        assert_eq!(source.attempts.get(), 1);
        assert!(error.to_string().starts_with("Failed to fetch data: 401"));
    }

    #[test]
    fn test_success_without_data_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.csv");
        let source = FixedSource::new(200, r#"{"message": "ok"}"#);

        let result = run(&app(&output), &source, window());

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_feed_reports_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.csv");
        let source = FixedSource::new(200, r#"{"data": []}"#);

        let report = run(&app(&output), &source, window()).unwrap();

        assert!(report.ranked.is_empty());
        assert!(output.exists());
    }
}
