//! Subscriber setup for hosts that embed the engine.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive string,
/// e.g. `evidence_analysis=debug,evidence_session=warn`.
pub const LOG_ENV_VAR: &str = "EVIDENCE_LOG";

/// Directive used when `EVIDENCE_LOG` is unset or does not parse.
pub const DEFAULT_LOG_FILTER: &str = "evidence=info";

static INIT: Once = Once::new();

/// Build the filter for a raw directive string.
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a fmt subscriber filtered by `EVIDENCE_LOG`. Runs once per
/// process and leaves an already installed global subscriber alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let directives = std::env::var(LOG_ENV_VAR).ok();
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .with(filter_from(directives.as_deref()))
            .try_init();
    });
}
