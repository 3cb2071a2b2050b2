mod app;
mod calculation;
mod cli;
mod display;
mod error;
mod io;
mod pipeline;
mod prelude;
mod window;

use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use io::sigsci_client::HttpFeedSource;
use prelude::*;
use window::FeedWindow;

fn main() -> AppResult {
    let cli = Cli::new();

    init_logging(cli.verbose);

    let app = App::new(cli);

    let window = FeedWindow::now()?;
    let source = HttpFeedSource::new(&app.config)?;

    // A failed fetch comes back as an error, so the exit code is non-zero.
    let report = pipeline::run(&app, &source, window)?;

    println!("{}", report.render());

    Ok(())
}

// private

/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,ja3top=debug" } else { "warn" };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
