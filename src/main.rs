use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use minish::config::USAGE;
use minish::{parse, Executor, Flow, Options};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let opts = match Options::from_args(env::args().skip(1)) {
        Ok(o) => o,
        Err(e) => { eprintln!("minish: {e}\n{USAGE}"); return ExitCode::from(2); }
    };
    if opts.show_help { println!("{USAGE}"); return ExitCode::SUCCESS; }

    let mut filter = EnvFilter::from_default_env();
    if opts.config.debug {
        if let Ok(d) = "minish=debug".parse() { filter = filter.add_directive(d); }
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match run(opts) {
        Ok(code) => code,
        Err(e) => { eprintln!("minish: {e:?}"); ExitCode::FAILURE }
    }
}

/// Parses and executes one line; parse errors are reported and skipped.
fn run_line(exec: &mut Executor, line: &str) -> Flow {
    match parse(line) {
        Ok(pipeline) => exec.execute(pipeline),
        Err(e) => { eprintln!("{e}"); Flow::Continue }
    }
}

fn prompt() -> Result<()> {
    let mut out = io::stdout();
    match env::current_dir() {
        Ok(cwd) => write!(out, "{}$ ", cwd.display())?,
        Err(e) => { eprintln!("getcwd: {e}"); write!(out, "$ ")?; }
    }
    out.flush()?;
    Ok(())
}

fn run(opts: Options) -> Result<ExitCode> {
    let mut exec = Executor::new(opts.config.clone());
    if let Some(line) = opts.command {
        run_line(&mut exec, &line);
        return Ok(ExitCode::SUCCESS);
    }
    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        exec.reap_background();
        if interactive { prompt()?; }
        let mut line = String::new();
        if input.read_line(&mut line).context("reading input line")? == 0 { break; }
        if run_line(&mut exec, &line) == Flow::Quit { return Ok(ExitCode::SUCCESS); }
    }
    if interactive { println!("Exiting shell."); }
    Ok(ExitCode::SUCCESS)
}
