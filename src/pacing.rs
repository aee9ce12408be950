//! Pacing policy for outbound calls.
//!
//! Rate-limit pauses and retry delays are routed through a [`Pacer`] value
//! injected into each component instead of bare `sleep` calls, so tests can
//! substitute a zero-delay policy and assert on the pauses that would have
//! happened.

use std::time::Duration;
use tokio::time::sleep;

/// A policy deciding how to spend a requested pause.
pub trait Pacer {
    async fn pause(&self, delay: Duration);
}

/// Production pacing: actually sleep for the requested duration.
pub struct Sleeper;

impl Pacer for Sleeper {
    async fn pause(&self, delay: Duration) {
        sleep(delay).await;
    }
}

/// Zero-delay pacing for tests.
#[cfg(test)]
pub struct NoDelay;

#[cfg(test)]
impl Pacer for NoDelay {
    async fn pause(&self, _delay: Duration) {}
}

/// Records every requested pause without sleeping.
#[cfg(test)]
pub struct RecordingPacer(pub std::sync::Mutex<Vec<Duration>>);

#[cfg(test)]
impl RecordingPacer {
    pub fn new() -> Self {
        Self(std::sync::Mutex::new(Vec::new()))
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.0.lock().unwrap().push(delay);
    }
}
