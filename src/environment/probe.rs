//! Waiting for a started service to answer over HTTP.

use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Checks whether a URL is ready to serve requests.
pub trait ReadinessProbe: Send + Sync {
    /// Returns `true` when `url` answers with HTTP 200.
    fn is_ready(&self, url: &str) -> bool;
}

/// Probe issuing a plain `GET` with ureq.
pub struct HttpProbe {
    agent: ureq::Agent,
}

impl HttpProbe {
    /// Creates a probe whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl ReadinessProbe for HttpProbe {
    fn is_ready(&self, url: &str) -> bool {
        match self.agent.get(url).call() {
            Ok(response) => response.status() == 200,
            Err(e) => {
                debug!("{url} not ready: {e}");
                false
            }
        }
    }
}

/// Polls `url` every `interval` until it is ready or `timeout` elapses.
///
/// Returns whether the server became ready.
pub fn wait_for_server(
    probe: &dyn ReadinessProbe,
    url: &str,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let start = Instant::now();
    loop {
        if probe.is_ready(url) {
            return true;
        }
        if start.elapsed() + interval > timeout {
            return false;
        }
        thread::sleep(interval);
    }
}
