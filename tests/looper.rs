use std::io::{BufRead, BufReader};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use minish::{Config, Executor, Pipeline, Stage};
use test_util::{eventually, proc_state};

#[test]
fn looper_follows_zzzz_kuku_blast() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_looper"))
        .process_group(0)
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn looper");
    let mut lines = BufReader::new(child.stdout.take().expect("stdout")).lines();
    let first = lines.next().expect("first line").expect("utf8");
    let pid: i32 = first.rsplit(' ').next().and_then(|p| p.parse().ok()).expect("pid in banner");
    assert_eq!(pid, child.id() as i32);

    let mut ex = Executor::with_diagnostics(Config::default(), Vec::new());
    ex.execute(Pipeline::single(Stage::new(["zzzz".to_string(), pid.to_string()])));
    assert!(read_until(&mut lines, "Received Signal: SIGTSTP"), "SIGTSTP relayed");
    assert!(eventually(|| proc_state(pid) == Some('T')), "looper stopped");
    ex.execute(Pipeline::single(Stage::new(["kuku".to_string(), pid.to_string()])));
    // The watcher has left the stop transition only once it prints SIGCONT.
    assert!(read_until(&mut lines, "Received Signal: SIGCONT"), "SIGCONT relayed");
    assert!(eventually(|| matches!(proc_state(pid), Some(s) if s != 'T')), "looper resumed");
    ex.execute(Pipeline::single(Stage::new(["blast".to_string(), pid.to_string()])));
    let status = child.wait().unwrap();
    assert!(!status.success());
    assert!(ex.diagnostics().is_empty());
}

fn read_until(lines: &mut impl Iterator<Item = std::io::Result<String>>, needle: &str) -> bool {
    lines.map_while(Result::ok).any(|l| l.contains(needle))
}
