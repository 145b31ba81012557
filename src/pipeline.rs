//! Pipeline coordinator: N stages joined by N-1 channels.
//!
//! Every channel exists before the first fork. Each child rebinds its own
//! ends and closes all of them; the parent drops every endpoint before it
//! waits, otherwise a reader never sees end-of-stream.

use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::io::RawFd;

use nix::fcntl::OFlag;
use nix::unistd::{pipe2, Pid};

use crate::cmdline::Pipeline;
use crate::error::ExecError;
use crate::launcher::{spawn, PreparedStage, Wiring};
use crate::reaper::ProcessHandle;

/// Unidirectional byte stream between two adjacent stages.
#[derive(Debug)]
pub struct Channel {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl Channel {
    /// Both ends close-on-exec, so a fork racing in another thread cannot
    /// carry them past exec.
    pub fn open() -> Result<Self, ExecError> {
        let (read, write) = pipe2(OFlag::O_CLOEXEC).map_err(ExecError::Pipe)?;
        Ok(Channel { read, write })
    }
}

/// What a pipeline launch produced: the children that exist and, if the launch
/// stopped part-way, why.
#[derive(Debug, Default)]
pub struct Launched {
    pub handles: Vec<ProcessHandle>,
    pub error: Option<ExecError>,
}

/// Forks every stage of `pipeline`. Waiting is left to the caller, which gets
/// the handles back even when a later fork failed.
pub fn launch(pipeline: &Pipeline) -> Launched {
    let background = !pipeline.is_blocking();
    let mut launched = Launched::default();

    let prepared = match pipeline.stages().iter().enumerate().map(|(i, s)| PreparedStage::new(i, s, background)).collect::<Result<Vec<_>, _>>() {
        Ok(p) => p,
        Err(e) => { launched.error = Some(e); return launched; }
    };
    let mut channels = Vec::with_capacity(prepared.len().saturating_sub(1));
    for _ in 1..prepared.len() {
        match Channel::open() {
            Ok(c) => channels.push(c),
            Err(e) => { launched.error = Some(e); return launched; }
        }
    }
    let endpoints: Vec<RawFd> = channels.iter().flat_map(|c| [c.read.as_raw_fd(), c.write.as_raw_fd()]).collect();

    let mut group: Option<Pid> = None;
    for (i, stage) in prepared.iter().enumerate() {
        let wiring = Wiring {
            group: if background { Some(group.unwrap_or(Pid::from_raw(0))) } else { None },
            stdin: if i > 0 { Some(channels[i - 1].read.as_raw_fd()) } else { None },
            stdout: channels.get(i).map(|c| c.write.as_raw_fd()),
            close: endpoints.clone(),
        };
        match spawn(stage, &wiring) {
            Ok(pid) => {
                group.get_or_insert(pid);
                launched.handles.push(stage.handle(pid));
            }
            Err(e) => { launched.error = Some(e); break; }
        }
    }
    drop(channels);
    launched
}
