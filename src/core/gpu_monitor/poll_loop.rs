//! Fixed-cadence polling loop.
//!
//! The loop owns the [`HistoryBuffer`] and is its only writer. Rendering runs
//! synchronously inside each tick, so the buffer is never shared across
//! threads. The only cross-thread state is the [`StopSignal`] and the
//! [`LoopStatus`] handle.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::collector::SampleSource;
use super::history::HistoryBuffer;
use crate::error::Result;

/// Lifecycle of a [`PollLoop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

/// Cooperative, interruptible stop flag shared between threads
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake any thread blocked in [`StopSignal::wait_timeout`]
    pub fn raise(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock() = true;
        condvar.notify_all();
    }

    pub fn is_raised(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Block for up to `timeout`. Returns true if the flag is raised.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let mut raised = flag.lock();
        if !*raised {
            condvar.wait_while_for(&mut raised, |raised| !*raised, timeout);
        }
        *raised
    }
}

/// Read-only view of a loop's state, usable from other threads
#[derive(Debug, Clone)]
pub struct LoopStatus {
    state: Arc<Mutex<LoopState>>,
}

impl LoopStatus {
    pub fn get(&self) -> LoopState {
        *self.state.lock()
    }
}

pub struct PollLoop {
    interval: Duration,
    history: HistoryBuffer,
    state: Arc<Mutex<LoopState>>,
}

impl PollLoop {
    pub fn new(interval: Duration, history: HistoryBuffer) -> Self {
        Self {
            interval,
            history,
            state: Arc::new(Mutex::new(LoopState::Idle)),
        }
    }

    pub fn state(&self) -> LoopState {
        *self.state.lock()
    }

    pub fn status(&self) -> LoopStatus {
        LoopStatus {
            state: Arc::clone(&self.state),
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn into_history(self) -> HistoryBuffer {
        self.history
    }

    /// Tick until `stop` is raised or a tick fails.
    ///
    /// Each tick collects a sample, appends it, renders, then waits for the
    /// interval. The wait is skipped until two samples exist so the first
    /// plot appears immediately. The loop always ends in `Stopped`; a tick
    /// error is returned after the transition.
    pub fn run<S, F>(&mut self, source: &mut S, mut render: F, stop: &StopSignal) -> Result<()>
    where
        S: SampleSource + ?Sized,
        F: FnMut(&HistoryBuffer) -> Result<()>,
    {
        self.transition(LoopState::Running);

        let outcome = self.tick_until_stopped(source, &mut render, stop);

        self.transition(LoopState::Stopped);
        outcome
    }

    fn tick_until_stopped<S, F>(&mut self, source: &mut S, render: &mut F, stop: &StopSignal) -> Result<()>
    where
        S: SampleSource + ?Sized,
        F: FnMut(&HistoryBuffer) -> Result<()>,
    {
        while !stop.is_raised() {
            let sample = source.next_sample()?;
            self.history.append(sample);
            render(&self.history)?;

            if self.history.len() > 1 && stop.wait_timeout(self.interval) {
                break;
            }
        }

        self.transition(LoopState::Stopping);
        Ok(())
    }

    fn transition(&self, next: LoopState) {
        let mut state = self.state.lock();
        log::debug!("Poll loop {:?} -> {:?}", *state, next);
        *state = next;
    }
}
