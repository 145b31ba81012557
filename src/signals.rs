//! `zzzz`, `kuku` and `blast`: deliver a signal to a pid named on the line.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::error::ExecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCommand {
    Suspend,
    Resume,
    Interrupt,
}

impl SignalCommand {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "zzzz" => Some(SignalCommand::Suspend),
            "kuku" => Some(SignalCommand::Resume),
            "blast" => Some(SignalCommand::Interrupt),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalCommand::Suspend => "zzzz",
            SignalCommand::Resume => "kuku",
            SignalCommand::Interrupt => "blast",
        }
    }

    pub fn signal(self) -> Signal {
        match self {
            SignalCommand::Suspend => Signal::SIGTSTP,
            SignalCommand::Resume => Signal::SIGCONT,
            SignalCommand::Interrupt => Signal::SIGINT,
        }
    }

    /// Only positive pids: 0 and negatives would address process groups,
    /// including the shell's own.
    pub fn target(self, argv: &[String]) -> Result<Pid, ExecError> {
        let command = self.name();
        let arg = argv.get(1).ok_or(ExecError::MissingPid { command })?;
        match arg.parse::<i32>() {
            Ok(pid) if pid > 0 => Ok(Pid::from_raw(pid)),
            _ => Err(ExecError::InvalidPid { command, arg: arg.clone() }),
        }
    }

    pub fn deliver(self, argv: &[String]) -> Result<Pid, ExecError> {
        let pid = self.target(argv)?;
        kill(pid, self.signal()).map_err(|source| ExecError::Signal { command: self.name(), pid: pid.as_raw(), source })?;
        tracing::debug!(pid = pid.as_raw(), signal = self.signal().as_str(), "signal delivered");
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn names_map_to_signals() {
        assert_eq!(SignalCommand::lookup("zzzz").map(SignalCommand::signal), Some(Signal::SIGTSTP));
        assert_eq!(SignalCommand::lookup("kuku").map(SignalCommand::signal), Some(Signal::SIGCONT));
        assert_eq!(SignalCommand::lookup("blast").map(SignalCommand::signal), Some(Signal::SIGINT));
        assert_eq!(SignalCommand::lookup("kill"), None);
    }

    #[test]
    fn target_parsing() {
        let c = SignalCommand::Suspend;
        assert_eq!(c.target(&argv(&["zzzz", "1234"])).unwrap(), Pid::from_raw(1234));
        assert_eq!(c.target(&argv(&["zzzz"])).unwrap_err().to_string(), "zzzz: missing process id");
        assert_eq!(c.target(&argv(&["zzzz", "abc"])).unwrap_err().to_string(), "zzzz: invalid process id 'abc'");
        assert!(c.target(&argv(&["zzzz", "0"])).is_err());
        assert!(c.target(&argv(&["zzzz", "-1"])).is_err());
    }
}
