//! Stop/continue/interrupt relay as an explicit two-state machine.
//!
//! One watcher owns the state and decides, per incoming signal, whether the
//! default action runs. Handlers are never re-armed from inside a handler.

use nix::sys::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LooperState {
    Running,
    Stopped,
}

/// What the watcher performs after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Default action of SIGTSTP: the whole process stops.
    Stop,
    /// Nothing to raise; the kernel has already continued us.
    Resume,
    /// Default action of SIGINT: the process terminates.
    Terminate,
    Ignore,
}

pub const WATCHED: [Signal; 3] = [Signal::SIGINT, Signal::SIGTSTP, Signal::SIGCONT];

impl LooperState {
    pub fn on_signal(self, sig: Signal) -> (LooperState, Action) {
        match (self, sig) {
            (_, Signal::SIGINT) => (self, Action::Terminate),
            (LooperState::Running, Signal::SIGTSTP) => (LooperState::Stopped, Action::Stop),
            (LooperState::Stopped, Signal::SIGCONT) => (LooperState::Running, Action::Resume),
            _ => (self, Action::Ignore),
        }
    }
}
