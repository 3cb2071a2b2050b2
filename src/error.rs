use miette::Diagnostic;
use thiserror::Error;

// Codes follow the same layout everywhere.
// ja3top::config -> flags, environment, credentials.
// ja3top::api -> the request feed and whatever it sends back.
// ja3top::io -> the output file.
// ja3top::time -> the feed window.

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{0} not found.")]
    #[diagnostic(
        code(ja3top::config::missing_setting),
        help(
"Pass it as a flag or export the matching environment variable (CORP_NAME, SITE_NAME).\n\
Try running `echo $CORP_NAME $SITE_NAME` to check if they're present."
        )
    )]
    MissingSetting(&'static str),

    /// The last attempt still came back with a non-success status.
    #[error("Failed to fetch data: {status} - {body}")]
    #[diagnostic(
        code(ja3top::api::fetch_failed),
        help("A 401 means the email/token pair was rejected. Anything else was retried already.")
    )]
    FetchFailed { status: u16, body: String },

    #[error("Could not reach the request feed.")]
    #[diagnostic(
        code(ja3top::api::transport),
        help("Check your network connection and the --base_url value.")
    )]
    Transport(#[source] ureq::Error),

    #[error("The request feed answered with something that is not a {{\"data\": [...]}} object.")]
    #[diagnostic(code(ja3top::api::malformed_response))]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Could not write the output file '{path}'.")]
    #[diagnostic(
        code(ja3top::io::output_file),
        help("Make sure the directory exists and is writable, or pick another --output_file.")
    )]
    OutputFile {
        path: String,

        #[source]
        source: csv::Error,
    },

    #[error("Could not read back the output file '{path}'.")]
    #[diagnostic(code(ja3top::io::read_back))]
    ReadBack {
        path: String,

        #[source]
        source: csv::Error,
    },

    #[error("Could not compute the feed window.")]
    #[diagnostic(code(ja3top::time::window))]
    Window(#[source] jiff::Error),
}
