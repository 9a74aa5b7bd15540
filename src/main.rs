//! Binary entrypoint for the URL summarizer.

use std::process::ExitCode;

use url_summarizer::start;

/// Start the web server.
fn main() -> ExitCode {
    start::run()
}
