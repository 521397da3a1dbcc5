//! Profiling utilities based on the `puffin` crate.

pub use puffin::profile_function;

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable puffin scopes and serve them over HTTP on `address`.
///
/// Failure to bind is logged, not fatal: the bridge works the same without a viewer.
#[cfg(feature = "profiling")]
pub fn init_profiling(address: &str) {
    puffin::set_scopes_on(true);

    match puffin_http::Server::new(address) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{}", address);
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

/// Without the `profiling` feature scopes are recorded but never served.
#[cfg(not(feature = "profiling"))]
pub fn init_profiling(address: &str) {
    tracing::warn!(
        "profiling requested on {} but glbridge-core was built without the `profiling` feature",
        address
    );
}

/// Mark a frame boundary. The UI thread calls this once per event-loop wake-up.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
