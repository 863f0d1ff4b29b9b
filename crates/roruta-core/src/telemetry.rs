//! Tracing initialisation for the `roruta` binary.
//!
//! The binary writes its results (tables, CSV reports, `--json` documents) to
//! stdout. Every log line, plain or JSON, goes to stderr so that piping
//! `roruta evaluate --json | jq` never sees a log record.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown when `RUST_LOG` is unset.
const LOG_TARGETS: [&str; 2] = ["roruta_core", "roruta"];

/// Filter directives for `level` limited to this workspace's crates.
pub fn default_directives(level: Level) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={}", level.as_str().to_lowercase()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialise the global subscriber on stderr.
///
/// `RUST_LOG` wins over `level` when set. With `json` each event becomes one
/// JSON object per line carrying the `roruta.session` span fields. Only the
/// first call in a process installs a subscriber.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json().with_current_span(true))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
