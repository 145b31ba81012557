use nix::errno::Errno;
use thiserror::Error;

/// Engine failures. Every message is one line led by the failing operation.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("fork: {0}")]
    Fork(Errno),
    #[error("pipe: {0}")]
    Pipe(Errno),
    #[error("waitpid: pid {pid}: {source}")]
    Wait { pid: i32, source: Errno },
    #[error("{program}: argument contains a nul byte")]
    NulByte { program: String },
    #[error("cd: missing HOME")]
    MissingHome,
    #[error("cd: {path}: {source}")]
    ChangeDir { path: String, source: std::io::Error },
    #[error("{command}: missing process id")]
    MissingPid { command: &'static str },
    #[error("{command}: invalid process id '{arg}'")]
    InvalidPid { command: &'static str, arg: String },
    #[error("{command}: pid {pid}: {source}")]
    Signal { command: &'static str, pid: i32, source: Errno },
}
