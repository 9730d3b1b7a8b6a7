//! Run lifecycle state machine.
//!
//! `Idle -> Running -> {Completed | Aborted | Failed}`. Terminal states are final.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Created, not started.
    Idle,
    /// Iterating over the sequence.
    Running,
    /// Every element was processed.
    Completed,
    /// Stopped at a checkpoint after cancellation was requested.
    Aborted,
    /// Stopped by an invalid element or a failing observer or sink.
    Failed,
}

impl RunState {
    /// Whether the run has settled.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted | Self::Failed)
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Completed => 2,
            Self::Aborted => 3,
            Self::Failed => 4,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Aborted,
            _ => Self::Failed,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Shared, atomically updated run state.
#[derive(Debug, Clone)]
pub struct StateCell {
    state: Arc<AtomicU8>,
}

impl StateCell {
    /// A cell in the given state.
    #[must_use]
    pub fn new(initial: RunState) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(initial.as_u8())),
        }
    }

    /// Current state.
    #[must_use]
    pub fn get(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move `Idle -> Running`. Returns `false` if the cell was not idle.
    pub fn start(&self) -> bool {
        self.transition(RunState::Idle, RunState::Running)
    }

    /// Move `Running -> target`. Returns `false` if the run was not running
    /// or `target` is not terminal.
    pub fn finish(&self, target: RunState) -> bool {
        target.is_terminal() && self.transition(RunState::Running, target)
    }

    fn transition(&self, from: RunState, to: RunState) -> bool {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(RunState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let cell = StateCell::default();
        assert_eq!(cell.get(), RunState::Idle);
        assert!(cell.start());
        assert_eq!(cell.get(), RunState::Running);
        assert!(cell.finish(RunState::Completed));
        assert_eq!(cell.get(), RunState::Completed);
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [RunState::Completed, RunState::Aborted, RunState::Failed] {
            let cell = StateCell::default();
            cell.start();
            assert!(cell.finish(terminal));
            assert!(!cell.start());
            assert!(!cell.finish(RunState::Completed));
            assert!(!cell.finish(RunState::Failed));
            assert_eq!(cell.get(), terminal);
        }
    }

    #[test]
    fn cannot_finish_from_idle() {
        let cell = StateCell::default();
        assert!(!cell.finish(RunState::Completed));
        assert_eq!(cell.get(), RunState::Idle);
    }

    #[test]
    fn cannot_finish_into_non_terminal() {
        let cell = StateCell::default();
        cell.start();
        assert!(!cell.finish(RunState::Idle));
        assert!(!cell.finish(RunState::Running));
        assert_eq!(cell.get(), RunState::Running);
    }

    #[test]
    fn clones_share_state() {
        let cell = StateCell::default();
        let other = cell.clone();
        cell.start();
        assert_eq!(other.get(), RunState::Running);
    }

    #[test]
    fn display_and_serialize() {
        assert_eq!(RunState::Aborted.to_string(), "aborted");
        assert_eq!(
            serde_json::to_string(&RunState::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn round_trip_through_u8() {
        for state in [
            RunState::Idle,
            RunState::Running,
            RunState::Completed,
            RunState::Aborted,
            RunState::Failed,
        ] {
            assert_eq!(RunState::from_u8(state.as_u8()), state);
        }
    }
}
