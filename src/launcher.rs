//! Process creation: one fork per stage, stream wiring in the child, then
//! exec through PATH.

use std::ffi::{c_char, CString};
use std::os::unix::io::RawFd;
use std::ptr;

use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::{close, dup2, fork, setpgid, ForkResult, Pid};

use crate::cmdline::Stage;
use crate::error::ExecError;
use crate::reaper::ProcessHandle;
use crate::redirect::{ChildFailure, Redirections, STDIN, STDOUT};

/// Exit status of a child whose setup or exec failed.
pub const EXEC_FAILURE_STATUS: i32 = 127;

/// A stage converted for the child: argv as C strings plus its redirections.
#[derive(Debug)]
pub struct PreparedStage {
    index: usize,
    name: String,
    program: CString,
    argv: Vec<CString>,
    /// Null-terminated pointers into `argv`, built before fork so exec needs no allocation.
    argv_ptrs: Vec<*const c_char>,
    redirect: Redirections,
}

impl PreparedStage {
    pub fn new(index: usize, stage: &Stage, background: bool) -> Result<Self, ExecError> {
        let nul = || ExecError::NulByte { program: stage.program().to_string() };
        let argv = stage.argv.iter().map(|a| CString::new(a.as_str())).collect::<Result<Vec<_>, _>>().map_err(|_| nul())?;
        let program = argv.first().cloned().ok_or_else(nul)?;
        // CString buffers live on the heap, so the pointers survive moving `argv`.
        let argv_ptrs = argv.iter().map(|a| a.as_ptr()).chain([ptr::null()]).collect();
        Ok(PreparedStage { index, name: stage.program().to_string(), program, argv, argv_ptrs, redirect: Redirections::for_stage(stage, background)? })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn index(&self) -> usize { self.index }
    pub fn argv(&self) -> &[CString] { &self.argv }

    pub fn handle(&self, pid: Pid) -> ProcessHandle { ProcessHandle { pid, stage: self.index, program: self.name.clone() } }
}

/// Process group and stream wiring applied in the child before exec.
#[derive(Debug, Default, Clone)]
pub struct Wiring {
    /// `Some(Pid 0)` makes the child a new group leader, `Some(pgid)` joins that group.
    pub group: Option<Pid>,
    pub stdin: Option<RawFd>,
    pub stdout: Option<RawFd>,
    /// Channel endpoints the child closes once its own ends are rebound.
    pub close: Vec<RawFd>,
}

impl Wiring {
    pub fn detached() -> Self { Wiring { group: Some(Pid::from_raw(0)), ..Wiring::default() } }
}

/// Forks one child for `stage`. Only the parent returns.
pub fn spawn(stage: &PreparedStage, wiring: &Wiring) -> Result<Pid, ExecError> {
    // SAFETY: the child branch only performs raw syscalls on data prepared
    // before the fork, then execs or _exits.
    match unsafe { fork() } {
        Err(errno) => Err(ExecError::Fork(errno)),
        Ok(ForkResult::Child) => run_child(stage, wiring),
        Ok(ForkResult::Parent { child }) => {
            if let Some(pgid) = wiring.group {
                let pgid = if pgid.as_raw() == 0 { child } else { pgid };
                // EACCES after the child has exec'd; it already joined on its side.
                let _ = setpgid(child, pgid);
            }
            tracing::debug!(pid = child.as_raw(), stage = stage.index, program = %stage.name, "spawned");
            Ok(child)
        }
    }
}

/// Single-stage launch: background stages lead their own group and read the
/// null device.
pub fn launch(stage: &Stage) -> Result<ProcessHandle, ExecError> {
    let background = !stage.blocking;
    let prepared = PreparedStage::new(0, stage, background)?;
    let wiring = if background { Wiring::detached() } else { Wiring::default() };
    let pid = spawn(&prepared, &wiring)?;
    Ok(prepared.handle(pid))
}

fn run_child(stage: &PreparedStage, wiring: &Wiring) -> ! {
    if let Some(pgid) = wiring.group {
        if let Err(errno) = setpgid(Pid::from_raw(0), pgid) { fail(ChildFailure { op: "setpgid", path: None, errno }) }
    }
    if let Err(f) = stage.redirect.apply_detach() { fail(f) }
    for (fd, target) in [(wiring.stdin, STDIN), (wiring.stdout, STDOUT)] {
        if let Some(fd) = fd {
            if let Err(errno) = dup2(fd, target) { fail(ChildFailure { op: "dup2", path: None, errno }) }
        }
    }
    for &fd in wiring.close.iter().filter(|&&fd| fd > libc::STDERR_FILENO) {
        let _ = close(fd);
    }
    if let Err(f) = stage.redirect.apply_output() { fail(f) }
    if let Err(f) = stage.redirect.apply_input() { fail(f) }
    // The shell ignores SIGPIPE; children must die on a closed pipe as usual.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
    // Only returns on failure.
    unsafe { libc::execvp(stage.program.as_ptr(), stage.argv_ptrs.as_ptr()) };
    let errno = Errno::last();
    report(&[b"execvp: ", stage.program.to_bytes(), b": ", errno.desc().as_bytes(), b"\n"]);
    exit_child()
}

fn fail(f: ChildFailure<'_>) -> ! {
    report(&[f.op.as_bytes(), b": "]);
    if let Some(path) = f.path { report(&[path.to_bytes(), b": "]); }
    report(&[f.errno.desc().as_bytes(), b"\n"]);
    exit_child()
}

/// Raw write(2) to fd 2: no locks, no allocation.
fn report(parts: &[&[u8]]) {
    for p in parts {
        unsafe { libc::write(libc::STDERR_FILENO, p.as_ptr().cast(), p.len()) };
    }
}

/// Skips destructors and atexit handlers; the parent's buffers stay untouched.
fn exit_child() -> ! {
    unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
}
