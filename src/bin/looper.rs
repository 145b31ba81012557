//! Prints a heartbeat every second and relays SIGTSTP, SIGCONT and SIGINT
//! through an explicit state machine owned by one watcher thread.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use minish::looper::{Action, LooperState, WATCHED};
use nix::sys::signal::Signal;
use signal_hook::iterator::Signals;
use signal_hook::low_level::emulate_default_handler;

fn main() -> Result<()> {
    // Armed before the pid is published, so no signal meets the default action.
    let mut signals = Signals::new(WATCHED.iter().map(|s| *s as i32)).context("installing signal watcher")?;
    println!("Starting the program with PID: {}", std::process::id());
    std::io::stdout().flush()?;
    thread::spawn(move || {
        let mut state = LooperState::Running;
        for raw in signals.forever() {
            let Ok(sig) = Signal::try_from(raw) else { continue };
            println!("\n[PID {}] Received Signal: {}", std::process::id(), sig.as_str());
            let _ = std::io::stdout().flush();
            let (next, action) = state.on_signal(sig);
            state = next;
            let res = match action {
                Action::Stop | Action::Terminate => emulate_default_handler(raw),
                Action::Resume | Action::Ignore => Ok(()),
            };
            if let Err(e) = res { eprintln!("looper: default action for {}: {e}", sig.as_str()); }
        }
    });

    loop {
        println!("Looper is running...");
        std::io::stdout().flush()?;
        thread::sleep(Duration::from_secs(1));
    }
}
