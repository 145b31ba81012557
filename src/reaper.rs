//! Wait/reap policy: blocking waits for foreground children and a
//! non-blocking sweep over tracked background children.

use std::fmt;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::error::ExecError;

/// A live child, tagged with the stage it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: Pid,
    pub stage: usize,
    pub program: String,
}

/// Outcome of a wait, reduced to what the shell reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    Running,
}

impl ChildState {
    pub fn is_finished(self) -> bool { matches!(self, ChildState::Exited(_) | ChildState::Signaled(_)) }
}

impl From<WaitStatus> for ChildState {
    fn from(status: WaitStatus) -> Self {
        match status {
            WaitStatus::Exited(_, code) => ChildState::Exited(code),
            WaitStatus::Signaled(_, sig, _) => ChildState::Signaled(sig as i32),
            WaitStatus::Stopped(_, sig) => ChildState::Stopped(sig as i32),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            WaitStatus::PtraceEvent(_, sig, _) => ChildState::Stopped(sig as i32),
            #[cfg(any(target_os = "linux", target_os = "android"))]
            WaitStatus::PtraceSyscall(_) => ChildState::Stopped(0),
            WaitStatus::Continued(_) | WaitStatus::StillAlive => ChildState::Running,
        }
    }
}

impl fmt::Display for ChildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildState::Exited(code) => write!(f, "exit {code}"),
            ChildState::Signaled(sig) => write!(f, "signal {sig}"),
            ChildState::Stopped(sig) => write!(f, "stopped by signal {sig}"),
            ChildState::Running => f.write_str("running"),
        }
    }
}

/// Retries on EINTR.
fn syscall<F, T>(f: F) -> nix::Result<T>
where
    F: Fn() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => (),
            result => return result,
        }
    }
}

/// Suspends until `handle` exits, is killed, or stops.
pub fn wait_for(handle: &ProcessHandle) -> Result<ChildState, ExecError> {
    let status = syscall(|| waitpid(handle.pid, Some(WaitPidFlag::WUNTRACED)))
        .map_err(|source| ExecError::Wait { pid: handle.pid.as_raw(), source })?;
    let state = ChildState::from(status);
    tracing::debug!(pid = handle.pid.as_raw(), program = %handle.program, %state, "waited");
    Ok(state)
}

/// Children left running after `execute` returned: background launches and
/// stopped foreground children.
#[derive(Debug, Default)]
pub struct BackgroundJobs {
    handles: Vec<ProcessHandle>,
}

impl BackgroundJobs {
    pub fn new() -> Self { BackgroundJobs::default() }

    pub fn track(&mut self, handle: ProcessHandle) { self.handles.push(handle); }

    pub fn len(&self) -> usize { self.handles.len() }
    pub fn is_empty(&self) -> bool { self.handles.is_empty() }
    pub fn contains(&self, pid: Pid) -> bool { self.handles.iter().any(|h| h.pid == pid) }
    pub fn iter(&self) -> impl Iterator<Item = &ProcessHandle> { self.handles.iter() }

    /// Reaps every tracked child that has finished, without blocking.
    /// Handles already collected elsewhere (ECHILD) are dropped too.
    pub fn sweep(&mut self) -> Vec<(ProcessHandle, ChildState)> {
        let mut reaped = Vec::new();
        self.handles.retain(|h| {
            match syscall(|| waitpid(h.pid, Some(WaitPidFlag::WNOHANG))) {
                Ok(status) => {
                    let state = ChildState::from(status);
                    if !state.is_finished() { return true; }
                    tracing::debug!(pid = h.pid.as_raw(), program = %h.program, %state, "reaped");
                    reaped.push((h.clone(), state));
                    false
                }
                Err(errno) => {
                    tracing::warn!(pid = h.pid.as_raw(), %errno, "dropping untrackable child");
                    false
                }
            }
        });
        reaped
    }
}
