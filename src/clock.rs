use std::time::{Duration, Instant};

/// Wall-clock time since a session began, frozen once stopped.
pub struct Stopwatch {
    started: Instant,
    stopped: Option<Duration>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }

    /// Freezes the reading; later calls keep the first value.
    pub fn stop(&mut self) -> Duration {
        *self.stopped.get_or_insert_with(|| self.started.elapsed())
    }

    pub fn is_running(&self) -> bool {
        self.stopped.is_none()
    }
}
