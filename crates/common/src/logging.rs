//! Structured log output
//!
//! Every record is a single JSON line. Callers attach the fixed field
//! vocabulary (`event`, `delivery`, `repo`, `pr_number`, `head_sha`,
//! `plan_id`, `error`) through `tracing` macros; installation tokens are
//! never passed as fields.
//!
//! Records use the `tracing-subscriber` JSON shape: `level` is upper case
//! (`"INFO"`, `"ERROR"`) and the human-readable text sits under `message`.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Build the JSON subscriber writing to `writer`.
///
/// `RUST_LOG` overrides `default_directive`.
pub fn subscriber<W>(default_directive: &str, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

/// Install the global subscriber on stdout.
///
/// Calling this twice is harmless: the second install is ignored.
pub fn init(default_directive: &str) {
    let _ = tracing::subscriber::set_global_default(subscriber(
        default_directive,
        std::io::stdout,
    ));
}
