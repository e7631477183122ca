//! # Cycle Instrumentation
//!
//! Optional profiling of a validation run. A [`CycleMeter`] reads the host's
//! cycle counter; a [`Profiler`] records how many cycles each named phase
//! consumed. Nothing here is global: a profiler is handed to
//! [`crate::service::AccountBookScript::with_profiler`] explicitly and is
//! absent on the production path.

use std::cell::Cell;
use tracing::debug;

/// Source of the host's monotonically increasing cycle count.
pub trait CycleMeter {
    /// Cycles consumed so far.
    fn current_cycles(&self) -> u64;
}

/// A named checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Phase that just finished.
    pub label: &'static str,
    /// Counter value at the checkpoint.
    pub at: u64,
    /// Cycles since the previous checkpoint.
    pub delta: u64,
}

/// Records checkpoints against a meter.
pub struct Profiler<'m> {
    meter: &'m dyn CycleMeter,
    start: u64,
    last: u64,
    checkpoints: Vec<Checkpoint>,
}

impl<'m> Profiler<'m> {
    /// Start profiling from the meter's current value.
    pub fn new(meter: &'m dyn CycleMeter) -> Self {
        let start = meter.current_cycles();
        Self {
            meter,
            start,
            last: start,
            checkpoints: Vec::new(),
        }
    }

    /// Close the current phase under `label`.
    pub fn checkpoint(&mut self, label: &'static str) {
        let at = self.meter.current_cycles();
        let delta = at.saturating_sub(self.last);
        debug!(label, cycles = delta, "checkpoint");
        self.checkpoints.push(Checkpoint { label, at, delta });
        self.last = at;
    }

    /// Checkpoints recorded so far.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Cycles since the profiler was created, as of the last checkpoint.
    pub fn total(&self) -> u64 {
        self.last.saturating_sub(self.start)
    }
}

impl std::fmt::Debug for Profiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiler")
            .field("start", &self.start)
            .field("checkpoints", &self.checkpoints)
            .finish()
    }
}

/// Meter that advances by a fixed step on every read. Off-chain stand-in.
#[derive(Debug, Default)]
pub struct SteppingMeter {
    now: Cell<u64>,
    step: u64,
}

impl SteppingMeter {
    /// Meter starting at zero, advancing `step` per read.
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl CycleMeter for SteppingMeter {
    fn current_cycles(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now.saturating_add(self.step));
        now
    }
}
