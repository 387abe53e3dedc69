//! Elapsed-time tracking and the wall-clock abstraction.

use std::cell::Cell;
use std::rc::Rc;

/// Source of wall-clock milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time; `web-time` keeps this working in the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Accumulating stopwatch.
///
/// Time is folded into `accumulated_ms` on every stop and checkpoint, so a
/// session that is closed while running never loses or double counts time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
    accumulated_ms: u64,
    running_since: Option<u64>,
}

impl Stopwatch {
    /// A stopped watch that already holds `accumulated_ms`
    pub fn with_elapsed(accumulated_ms: u64) -> Self {
        Self {
            accumulated_ms,
            running_since: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Start timing; no-op when already running
    pub fn start(&mut self, now_ms: u64) {
        if self.running_since.is_none() {
            self.running_since = Some(now_ms);
        }
    }

    /// Stop timing; no-op when already stopped
    pub fn stop(&mut self, now_ms: u64) {
        if let Some(since) = self.running_since.take() {
            self.accumulated_ms += now_ms.saturating_sub(since);
        }
    }

    /// Fold the running span into the accumulated total and keep running
    pub fn checkpoint(&mut self, now_ms: u64) -> u64 {
        if let Some(since) = self.running_since {
            self.accumulated_ms += now_ms.saturating_sub(since);
            self.running_since = Some(now_ms);
        }
        self.accumulated_ms
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.running_since {
            Some(since) => self.accumulated_ms + now_ms.saturating_sub(since),
            None => self.accumulated_ms,
        }
    }

    /// Total folded in by the last stop or checkpoint
    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }
}
