//! Agent loop state management
//!
//! Tracks where the run is in its lifecycle and how many tool-dispatch
//! rounds it has performed, so the iteration bound and the termination
//! conditions can be tested on their own.

use crate::core::{Result, SkybriefError};

/// Phase of the orchestration loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Waiting on the next model gateway call
    Running,
    /// Executing the current batch of tool calls
    Dispatching,
    /// Terminal: the model produced a final answer
    Done,
    /// Terminal: a fatal error ended the run
    Failed,
}

/// State of one orchestration run
#[derive(Debug, Clone)]
pub struct LoopState {
    /// Current phase
    pub phase: RunPhase,
    /// Tool-dispatch rounds performed so far
    pub iterations: usize,
    /// Maximum allowed dispatch rounds
    pub max_iterations: usize,
}

impl LoopState {
    /// Create a fresh state with the given iteration bound
    pub fn new(max_iterations: usize) -> Self {
        Self {
            phase: RunPhase::Running,
            iterations: 0,
            max_iterations,
        }
    }

    /// Whether the loop should make another gateway call
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Enter the dispatching phase, enforcing the iteration bound
    ///
    /// The increment happens before the check, so a run that never sees a
    /// final answer fails on the round after the last allowed dispatch
    /// without executing any of its tool calls.
    pub fn begin_dispatch(&mut self) -> Result<()> {
        self.phase = RunPhase::Dispatching;
        self.iterations += 1;

        if self.iterations > self.max_iterations {
            self.phase = RunPhase::Failed;
            return Err(SkybriefError::IterationBound(self.max_iterations));
        }

        Ok(())
    }

    /// Return to the running phase after a dispatch batch completes
    pub fn resume(&mut self) {
        self.phase = RunPhase::Running;
    }

    /// Terminate normally once the model has produced a final answer
    pub fn finish(&mut self) {
        self.phase = RunPhase::Done;
    }

    /// Terminate with a fatal error
    pub fn fail(&mut self) {
        self.phase = RunPhase::Failed;
    }
}
