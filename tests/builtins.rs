use std::process::Stdio;
use test_util::*;

#[test]
fn cd_without_argument_goes_home() {
    let home = tempfile::tempdir().expect("tempdir");
    let record = home.path().join("pwd.txt");
    let mut cmd = minish();
    cmd.env("HOME", home.path());
    let out = run_script_with(cmd, &format!("cd\npwd > {}\n", record.display()));
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    let expected = home.path().canonicalize().unwrap();
    assert_eq!(std::fs::read_to_string(&record).unwrap().trim_end(), expected.to_str().unwrap());
}

#[test]
fn cd_tilde_and_explicit_dir() {
    let home = tempfile::tempdir().expect("tempdir");
    let other = tempfile::tempdir().expect("tempdir");
    let record = home.path().join("pwd.txt");
    let mut cmd = minish();
    cmd.env("HOME", home.path());
    let script = format!("cd {}\ncd ~\npwd > {}\n", other.path().display(), record.display());
    let out = run_script_with(cmd, &script);
    assert!(out.status.success());
    let expected = home.path().canonicalize().unwrap();
    assert_eq!(std::fs::read_to_string(&record).unwrap().trim_end(), expected.to_str().unwrap());
}

#[test]
fn cd_to_missing_directory_keeps_cwd() {
    let start = tempfile::tempdir().expect("tempdir");
    let record = start.path().join("pwd.txt");
    let mut cmd = minish();
    cmd.current_dir(start.path());
    let out = run_script_with(cmd, &format!("cd /nonexistent-minish-dir\npwd > {}\n", record.display()));
    assert!(out.status.success());
    assert!(stderr_of(&out).contains("cd: /nonexistent-minish-dir: "), "stderr: {}", stderr_of(&out));
    let expected = start.path().canonicalize().unwrap();
    assert_eq!(std::fs::read_to_string(&record).unwrap().trim_end(), expected.to_str().unwrap());
}

#[test]
fn cd_without_home_reports() {
    let mut cmd = minish();
    cmd.env_remove("HOME");
    let out = run_script_with(cmd, "cd\n");
    assert!(out.status.success());
    assert_eq!(stderr_of(&out), "cd: missing HOME\n");
}

#[test]
fn quit_exits_zero_and_ignores_later_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("never.txt");
    let mut cmd = minish();
    cmd.stdout(Stdio::null()).stderr(Stdio::null());
    let script = format!("sleep 2 &\nquit\nprintf x > {}\n", marker.display());
    let mut child = cmd.stdin(Stdio::piped()).spawn().expect("spawn minish");
    {
        use std::io::Write;
        child.stdin.take().unwrap().write_all(script.as_bytes()).unwrap();
    }
    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0));
    assert!(!marker.exists());
}

#[test]
fn end_of_input_exits_zero() {
    let out = run_script("");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn parse_errors_run_nothing() {
    let out = run_script("printf a >\nprintf b |\nprintf ok\n");
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "ok");
    assert!(stderr_of(&out).contains("parse: missing file name after '>'"));
    assert!(stderr_of(&out).contains("parse: empty command in pipeline"));
}

#[test]
fn signal_commands_require_a_pid() {
    let out = run_script("zzzz\nkuku abc\nblast 999999999\n");
    assert!(out.status.success());
    let err = stderr_of(&out);
    assert!(err.contains("zzzz: missing process id"), "stderr: {err}");
    assert!(err.contains("kuku: invalid process id 'abc'"));
    assert!(err.contains("blast: pid 999999999: "));
}
