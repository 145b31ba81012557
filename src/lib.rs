//! A minimal interactive command shell: line parser plus the execution
//! engine that turns a parsed line into wired, waited-on child processes.

pub mod builtin;
pub mod cmdline;
pub mod config;
pub mod engine;
pub mod error;
pub mod launcher;
pub mod looper;
pub mod parser;
pub mod pipeline;
pub mod reaper;
pub mod redirect;
pub mod signals;

pub use cmdline::{Pipeline, Stage};
pub use config::{Config, Options};
pub use engine::{Executor, Flow};
pub use error::ExecError;
pub use parser::{parse, ParseError};
