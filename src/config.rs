use anyhow::{bail, Result};

pub const DEBUG_ENV: &str = "MINISH_DEBUG";

/// Engine configuration, threaded into [`crate::Executor`] at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub debug: bool,
}

/// Command line of the `minish` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub config: Config,
    pub command: Option<String>,
    pub show_help: bool,
}

pub const USAGE: &str = "usage: minish [-d|--debug] [-c <command line>]";

impl Options {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut opts = Options::default();
        opts.config.debug = std::env::var_os(DEBUG_ENV).is_some();
        let mut args = args.into_iter();
        while let Some(a) = args.next() {
            match a.as_str() {
                "-d" | "--debug" => opts.config.debug = true,
                "-c" => { opts.command = Some(args.next().ok_or_else(|| anyhow::anyhow!("missing command line after -c"))?); }
                "-h" | "--help" => opts.show_help = true,
                other => bail!("unknown arg: {other}"),
            }
        }
        Ok(opts)
    }
}
