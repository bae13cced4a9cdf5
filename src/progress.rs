//! Batch progress reporting and cooperative cancellation.
//!
//! [`ProgressReporter`] is a passive display surface: it holds the values a
//! progress dialog would show (percent, status line, queue length) and the
//! batch state machine `Idle -> Running -> {Completed, Stopped, Failed} ->
//! Idle`. It never halts work itself; a user stop request is forwarded to the
//! owner through a registered handler, and the owner decides what to do.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// State of the batch a reporter is displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

impl BatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchState::Completed | BatchState::Stopped | BatchState::Failed
        )
    }
}

/// Terminal outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed,
    Stopped,
    Failed,
}

pub struct ProgressReporter {
    state: BatchState,
    percent: u8,
    status: String,
    queued_jobs: usize,
    stop_handler: Option<Box<dyn FnMut() + Send>>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            state: BatchState::Idle,
            percent: 0,
            status: "Ready".to_owned(),
            queued_jobs: 0,
            stop_handler: None,
        }
    }

    /// Register the handler invoked when the user requests a stop.
    pub fn on_stop_requested(&mut self, handler: impl FnMut() + Send + 'static) {
        self.stop_handler = Some(Box::new(handler));
    }

    /// Update the displayed completion percentage, clamped to 100.
    pub fn set_progress(&mut self, percent: u8) {
        self.percent = percent.min(100);
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    pub fn set_queue(&mut self, jobs: usize) {
        self.queued_jobs = jobs;
    }

    /// Toggle between `Running` and `Completed`.
    ///
    /// `set_running(true)` starts a run from `Idle` (or from a terminal state,
    /// resetting first); `set_running(false)` completes a running one. For the
    /// other terminal states use [`finish`](Self::finish).
    pub fn set_running(&mut self, running: bool) {
        if running {
            if self.state.is_terminal() {
                self.reset();
            }
            self.start();
        } else {
            self.finish(BatchOutcome::Completed);
        }
    }

    /// `Idle -> Running`. Ignored in any other state.
    pub fn start(&mut self) {
        if self.state == BatchState::Idle {
            self.state = BatchState::Running;
        }
    }

    /// `Running -> {Completed, Stopped, Failed}`. Ignored unless running.
    pub fn finish(&mut self, outcome: BatchOutcome) {
        if self.state == BatchState::Running {
            self.state = match outcome {
                BatchOutcome::Completed => BatchState::Completed,
                BatchOutcome::Stopped => BatchState::Stopped,
                BatchOutcome::Failed => BatchState::Failed,
            };
        }
    }

    /// Terminal state back to `Idle`. Ignored while idle or running.
    pub fn reset(&mut self) {
        if self.state.is_terminal() {
            self.state = BatchState::Idle;
            self.percent = 0;
            self.status = "Ready".to_owned();
        }
    }

    /// Forward a user stop request to the owner.
    ///
    /// Only effective while running; the reporter does not change state, the
    /// owner decides whether and how to halt the batch.
    pub fn request_stop(&mut self) {
        if self.state != BatchState::Running {
            return;
        }
        if let Some(handler) = self.stop_handler.as_mut() {
            handler();
        }
    }

    /// Whether the stop affordance should be enabled.
    pub fn stop_enabled(&self) -> bool {
        self.state == BatchState::Running
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn queued_jobs(&self) -> usize {
        self.queued_jobs
    }
}

/// Shared flag for cooperative cancellation of a load.
///
/// Clones observe the same flag. The loader checks it once per slice, so
/// cancellation latency is one slice decode.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
