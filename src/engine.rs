//! The command execution engine: built-ins, signal commands, then launch and
//! wait.

use std::io::{self, Write};

use crate::builtin::{self, Builtin};
use crate::cmdline::{Pipeline, Stage};
use crate::config::Config;
use crate::error::ExecError;
use crate::launcher;
use crate::pipeline;
use crate::reaper::{self, BackgroundJobs, ChildState, ProcessHandle};
use crate::signals::SignalCommand;

/// What the read loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs parsed lines. Diagnostics go to `W` (stderr for the real shell).
pub struct Executor<W: Write = io::Stderr> {
    config: Config,
    jobs: BackgroundJobs,
    diag: W,
}

impl Executor {
    pub fn new(config: Config) -> Self { Executor::with_diagnostics(config, io::stderr()) }
}

impl<W: Write> Executor<W> {
    pub fn with_diagnostics(config: Config, diag: W) -> Self {
        Executor { config, jobs: BackgroundJobs::new(), diag }
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn background_jobs(&self) -> &BackgroundJobs { &self.jobs }
    pub fn diagnostics(&self) -> &W { &self.diag }
    pub fn into_diagnostics(self) -> W { self.diag }

    /// Executes one line. The pipeline is consumed, so it is released on
    /// every path, including `quit`.
    pub fn execute(&mut self, pipeline: Option<Pipeline>) -> Flow {
        self.reap_background();
        let Some(pipeline) = pipeline else { return Flow::Continue };
        let first = pipeline.first();

        match Builtin::lookup(first.program()) {
            Some(Builtin::Quit) => return Flow::Quit,
            Some(Builtin::Cd) => {
                if let Err(e) = builtin::change_dir(&first.argv) { self.report(&e); }
                return Flow::Continue;
            }
            None => {}
        }
        if let Some(cmd) = SignalCommand::lookup(first.program()) {
            if let Err(e) = cmd.deliver(&first.argv) { self.report(&e); }
            return Flow::Continue;
        }

        if pipeline.len() == 1 { self.run_single(first); } else { self.run_pipeline(&pipeline); }
        Flow::Continue
    }

    /// Collects finished background children; returns how many were reaped.
    pub fn reap_background(&mut self) -> usize {
        let reaped = self.jobs.sweep();
        if self.config.debug {
            for (h, state) in &reaped {
                let _ = writeln!(self.diag, "[done] {} {} ({})", h.pid, h.program, state);
            }
        }
        reaped.len()
    }

    fn run_single(&mut self, stage: &Stage) {
        match launcher::launch(stage) {
            Ok(handle) => {
                self.trace_spawn(&handle);
                if stage.blocking { self.wait_foreground(vec![handle]); } else { self.jobs.track(handle); }
            }
            Err(e) => self.report(&e),
        }
    }

    fn run_pipeline(&mut self, pipeline: &Pipeline) {
        let launched = pipeline::launch(pipeline);
        for h in &launched.handles { self.trace_spawn(h); }
        if let Some(e) = &launched.error { self.report(e); }
        // Children forked before a failure are still waited on or tracked.
        if pipeline.is_blocking() {
            self.wait_foreground(launched.handles);
        } else {
            for h in launched.handles { self.jobs.track(h); }
        }
    }

    fn wait_foreground(&mut self, handles: Vec<ProcessHandle>) {
        for h in handles {
            match reaper::wait_for(&h) {
                Ok(ChildState::Stopped(_)) => self.jobs.track(h),
                Ok(_) => {}
                Err(e) => self.report(&e),
            }
        }
    }

    fn trace_spawn(&mut self, h: &ProcessHandle) {
        if self.config.debug {
            let _ = writeln!(self.diag, "PID: {}, Executing command: {}", h.pid, h.program);
        }
    }

    fn report(&mut self, e: &ExecError) {
        let _ = writeln!(self.diag, "{e}");
        let _ = self.diag.flush();
    }
}
