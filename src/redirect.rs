//! Standard-stream rebinding for a stage. Paths are converted before fork;
//! the `apply_*` methods run in the child between fork and exec and only
//! issue raw syscalls on that prepared data.

use std::ffi::{CStr, CString};
use std::os::unix::io::RawFd;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};

use crate::cmdline::Stage;
use crate::error::ExecError;

pub const NULL_DEVICE: &str = "/dev/null";
pub const STDIN: RawFd = libc::STDIN_FILENO;
pub const STDOUT: RawFd = libc::STDOUT_FILENO;

/// Child-side failure: the operation, the path involved (if any) and errno.
#[derive(Debug)]
pub struct ChildFailure<'a> {
    pub op: &'static str,
    pub path: Option<&'a CStr>,
    pub errno: Errno,
}

#[derive(Debug, Default)]
pub struct Redirections {
    null_device: Option<CString>,
    input: Option<CString>,
    output: Option<CString>,
}

impl Redirections {
    pub fn for_stage(stage: &Stage, detach_stdin: bool) -> Result<Self, ExecError> {
        let c = |s: &str| CString::new(s).map_err(|_| ExecError::NulByte { program: stage.program().to_string() });
        Ok(Redirections {
            null_device: if detach_stdin { Some(c(NULL_DEVICE)?) } else { None },
            input: stage.input_redirect.as_deref().map(c).transpose()?,
            output: stage.output_redirect.as_deref().map(c).transpose()?,
        })
    }

    pub fn detaches_stdin(&self) -> bool { self.null_device.is_some() }

    /// Background stages read the null device so they never take terminal input.
    pub fn apply_detach(&self) -> Result<(), ChildFailure<'_>> {
        match &self.null_device {
            Some(dev) => open_onto(dev, OFlag::O_RDONLY, Mode::empty(), STDIN),
            None => Ok(()),
        }
    }

    /// Create or truncate, rw-r--r--.
    pub fn apply_output(&self) -> Result<(), ChildFailure<'_>> {
        match &self.output {
            Some(path) => {
                let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
                open_onto(path, OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC, mode, STDOUT)
            }
            None => Ok(()),
        }
    }

    /// Applied last, so it overrides the null-device binding of a background stage.
    pub fn apply_input(&self) -> Result<(), ChildFailure<'_>> {
        match &self.input {
            Some(path) => open_onto(path, OFlag::O_RDONLY, Mode::empty(), STDIN),
            None => Ok(()),
        }
    }
}

/// Moves `fd` onto `target` and closes the original descriptor.
pub fn rebind(fd: RawFd, target: RawFd) -> nix::Result<()> {
    if fd != target {
        dup2(fd, target)?;
        close(fd)?;
    }
    Ok(())
}

fn open_onto(path: &CStr, flags: OFlag, mode: Mode, target: RawFd) -> Result<(), ChildFailure<'_>> {
    let fd = open(path, flags | OFlag::O_CLOEXEC, mode).map_err(|errno| ChildFailure { op: "open", path: Some(path), errno })?;
    rebind(fd, target).map_err(|errno| ChildFailure { op: "dup2", path: Some(path), errno })
}
