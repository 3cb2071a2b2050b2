use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::calculation::ranking::DEFAULT_TOP_N;
use crate::error::Error;
use crate::prelude::*;

pub const DEFAULT_BASE_URL: &str = "https://dashboard.signalsciences.net/api/v0";

impl Cli {
    /// Convenience constructor to avoid redundant `Parser` imports in main.
    pub fn new() -> Self {
        Cli::parse()
    }
}

// Structs

/// Fetch the last 24 hours of the request feed, store it as CSV, then rank the JA3 values.
#[derive(Parser, Debug)]
#[command(name = "ja3top", version)]
pub struct Cli {
    /// Signal Sciences user email.
    #[arg(long = "sigsci_email", env = "SIGSCI_EMAIL")]
    pub sigsci_email: Option<String>,

    /// Signal Sciences API token.
    #[arg(long = "sigsci_token", env = "SIGSCI_TOKEN", hide_env_values = true)]
    pub sigsci_token: Option<String>,

    /// Corporation name.
    #[arg(long = "corp_name", env = "CORP_NAME")]
    pub corp_name: Option<String>,

    /// Site name.
    #[arg(long = "site_name", env = "SITE_NAME")]
    pub site_name: Option<String>,

    /// Output CSV file name. Overwritten on every run.
    #[arg(long = "output_file", default_value = "output.csv")]
    pub output_file: PathBuf,

    /// Enable verbose output for debugging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// How many JA3 values to report.
    #[arg(long = "top_n", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Attempts in total, the first one included.
    #[arg(long = "max_retries", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_retries: u32,

    /// Seconds to wait between attempts.
    #[arg(long = "retry_wait_secs", default_value_t = 10)]
    pub retry_wait_secs: u64,

    /// API root, handy for pointing at a mock server.
    #[arg(long = "base_url", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Skip animations.
    #[arg(long = "no_animate", default_value_t = false)]
    pub no_animate: bool,
}

/// Everything the pipeline needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub credentials: Credentials,
    pub target: FeedTarget,
    pub output_file: PathBuf,
    pub retry: RetryPolicy,
    pub top_n: usize,
    pub verbose: bool,
}

/// Either may be missing. The API is the one to complain about it.
#[derive(Clone, PartialEq, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedTarget {
    pub base_url: String,
    pub corp_name: Option<String>,
    pub site_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts in total, never zero.
    pub max_attempts: u32,
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            wait: Duration::from_secs(10),
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            credentials: Credentials {
                email: cli.sigsci_email,
                token: cli.sigsci_token,
            },
            target: FeedTarget {
                base_url: cli.base_url,
                corp_name: cli.corp_name,
                site_name: cli.site_name,
            },
            output_file: cli.output_file,
            retry: RetryPolicy {
                max_attempts: cli.max_retries.max(1),
                wait: Duration::from_secs(cli.retry_wait_secs),
            },
            top_n: cli.top_n,
            verbose: cli.verbose,
        }
    }
}

impl FeedTarget {
    /// Builds `{base}/corps/{corp}/sites/{site}/feed/requests`.
    pub fn requests_url(&self) -> AppResult<String> {
        let corp = self
            .corp_name
            .as_deref()
            .ok_or(Error::MissingSetting("Corporation name"))?;
        let site = self
            .site_name
            .as_deref()
            .ok_or(Error::MissingSetting("Site name"))?;

        let base = self.base_url.trim_end_matches('/');

        Ok(format!("{base}/corps/{corp}/sites/{site}/feed/requests"))
    }
}

// Keep the token out of debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
