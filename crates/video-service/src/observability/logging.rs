//! Structured JSON logging.
//!
//! Every event is emitted as one flat JSON object. Span context is not
//! attached, so an event carries exactly the fields written at its call
//! site. Audit and error records rely on this to stay free of request
//! bodies and user identifiers.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "video=info,tower_http=debug";

/// JSON formatting layer writing to `make_writer`.
pub fn json_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
}

/// Install the global subscriber: `EnvFilter` plus JSON output on stdout.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(json_layer(std::io::stdout))
        .init();
}
