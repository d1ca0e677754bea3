//! Tracing initialization.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, util::SubscriberInitExt};

/// Environment variable holding a filter directive such as `docsearch=debug`.
/// Takes precedence over `RUST_LOG`.
pub const LOG_ENV: &str = "DOCSEARCH_LOG";

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times; only the first call counts.
///
/// `level` applies when neither `DOCSEARCH_LOG` nor `RUST_LOG` is set. Test
/// runs always log at DEBUG through the test writer. Otherwise logs go to
/// stderr so query output on stdout stays pipeable.
pub fn init(level: Level) {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = env_filter(if is_test { Level::DEBUG } else { level });

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .compact();

        if is_test {
            // Guard must outlive the closure.
            std::mem::forget(builder.with_test_writer().finish().set_default());
        } else if let Err(e) = builder.with_writer(std::io::stderr).try_init() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()))
}
