use std::time::Duration;

use tracing::{debug, warn};
use ureq::Agent;

use crate::cli::{Config, Credentials, RetryPolicy};
use crate::display::SpinnerContainer;
use crate::error::Error;
use crate::prelude::*;
use crate::window::FeedWindow;

/// Status code and raw body of a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedResponse {
    pub status: u16,
    pub body: String,
}

impl FeedResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// One GET against the request feed. No retrying in here.
pub trait FeedSource {
    fn fetch_once(&self, window: &FeedWindow) -> AppResult<FeedResponse>;
}

/// Calls `source` until it answers 200/201, answers 401, or runs out of attempts.
///
/// Never turns a bad status into an error; the caller gets the last response and
/// decides. Transport errors count as failed attempts and are only returned once the
/// budget is spent.
pub fn fetch_with_retry<S>(
    source: &S,
    window: &FeedWindow,
    policy: &RetryPolicy,
    spinner: &mut SpinnerContainer,
) -> AppResult<FeedResponse>
where
    S: FeedSource + ?Sized,
{
    retry_with_pause(source, window, policy, spinner, wait)
}

/// Same loop, with the sleeping between attempts handed to `pause`.
fn retry_with_pause<S, P>(
    source: &S,
    window: &FeedWindow,
    policy: &RetryPolicy,
    spinner: &mut SpinnerContainer,
    mut pause: P,
) -> AppResult<FeedResponse>
where
    S: FeedSource + ?Sized,
    P: FnMut(Duration),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!(attempt, max_attempts, "Fetching request feed");

        match source.fetch_once(window) {
            Ok(response) if response.is_success() => return Ok(response),

            Ok(response) => {
                warn!(
                    "API call failed with status code {}. Error message: {}",
                    response.status, response.body
                );

                // 401 is final.
                if response.is_unauthorized() || attempt >= max_attempts {
                    return Ok(response);
                }
            }

            Err(report) => {
                warn!("API call failed: {report}");

                if attempt >= max_attempts {
                    return Err(report);
                }
            }
        }

        attempt += 1;
        spinner.update_text(progress_text(attempt, max_attempts));
        pause(policy.wait);
    }
}

/// The real thing, over HTTPS.
pub struct HttpFeedSource {
    agent: Agent,
    url: String,
    credentials: Credentials,
}

impl HttpFeedSource {
    pub fn new(config: &Config) -> AppResult<Self> {
        // Statuses are inspected by hand, so they must not come back as errors.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Ok(HttpFeedSource {
            agent,
            url: config.target.requests_url()?,
            credentials: config.credentials.clone(),
        })
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch_once(&self, window: &FeedWindow) -> AppResult<FeedResponse> {
        let request = self
            .agent
            .get(self.url.as_str())
            .header("Content-Type", "application/json")
            // ranging.
            .query("from", window.from.to_string())
            .query("until", window.until.to_string());

        // Missing credentials are left out and the API answers 401.
        let request = match self.credentials.email.as_deref() {
            Some(email) => request.header("x-api-user", email),
            None => request,
        };

        let request = match self.credentials.token.as_deref() {
            Some(token) => request.header("x-api-token", token),
            None => request,
        };

        let mut response = request
            .call()
            .map_err(Error::Transport)?;

        let status = response.status().as_u16();

        // A whole day of traffic easily goes past ureq's default body limit.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(Error::Transport)?;

        Ok(FeedResponse { status, body })
    }
}

// private

fn wait(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

fn progress_text(attempt: u32, max_attempts: u32) -> String {
    format!("Retrying ({attempt}/{max_attempts})")
}
