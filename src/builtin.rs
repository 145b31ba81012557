//! Commands that must run inside the shell process itself.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::ExecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Quit,
    Cd,
}

impl Builtin {
    /// Exact, case-sensitive match on argv[0].
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "quit" => Some(Builtin::Quit),
            "cd" => Some(Builtin::Cd),
            _ => None,
        }
    }
}

/// `argv[1]` unless absent or `~`, otherwise `home`.
pub fn cd_target(argv: &[String], home: Option<OsString>) -> Result<PathBuf, ExecError> {
    match argv.get(1).map(String::as_str) {
        Some(dir) if dir != "~" => Ok(PathBuf::from(dir)),
        _ => home.filter(|h| !h.is_empty()).map(PathBuf::from).ok_or(ExecError::MissingHome),
    }
}

/// Changes the shell's own working directory; never forks.
pub fn change_dir(argv: &[String]) -> Result<PathBuf, ExecError> {
    let target = cd_target(argv, std::env::var_os("HOME"))?;
    std::env::set_current_dir(&target).map_err(|source| ExecError::ChangeDir { path: target.display().to_string(), source })?;
    tracing::debug!(dir = %target.display(), "changed directory");
    Ok(target)
}
