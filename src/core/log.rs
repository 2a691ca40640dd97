//! Diagnostic output on stderr, so converted values on stdout stay clean.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Filter directive used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> String {
    if verbose {
        format!("{CRATE_TARGET}=debug")
    } else {
        "off".to_string()
    }
}

/// `RUST_LOG` wins over `--verbose`; an unparsable value falls back to the default.
fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), verbose);

    // A subscriber may already be installed when embedded or under test
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
