//! Simple timing utility, reported through `tracing`

use std::time::Instant;

pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        tracing::trace!(target: "trivia_bn254::timer", "* {}", name);
        Timer {
            name,
            start: Instant::now(),
        }
    }

    pub fn stop(&self) {
        let elapsed = self.start.elapsed();
        tracing::debug!(target: "trivia_bn254::timer", ?elapsed, "* {}", self.name);
    }
}
