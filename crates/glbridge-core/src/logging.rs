use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the configuration names one.
pub const DEFAULT_FILTER: &str = "info,glbridge=debug,winit=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `filter`. Calling this more than once is harmless: the
/// first subscriber stays installed.
pub fn init(filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_thread_names(true)
        .try_init()
        .is_err()
    {
        tracing::trace!("tracing subscriber already installed");
    }
}
