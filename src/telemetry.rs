//! Process-wide tracing setup. Called once from `main`; library code only
//! emits events, which are no-ops when no subscriber is installed.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool, json: bool) {
    // RUST_LOG wins; otherwise only show debug logs with --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("hyperpersona=debug")
        } else {
            EnvFilter::new("hyperpersona=warn")
        }
    });

    // Logs go to stderr so stdout stays clean for reports
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
