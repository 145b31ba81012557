use test_util::*;

#[test]
fn producer_bytes_reach_consumer_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.txt");
    let out = run_script(&format!("printf abc | cat > {}\nquit\n", output.display()));
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "abc");
}

#[test]
fn three_stage_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    std::fs::write(&input, b"pear\napple\nfig\n").unwrap();
    let out = run_script(&format!("cat < {} | sort | head -n 1 > {}\n", input.display(), output.display()));
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "apple\n");
}

#[test]
fn consumer_sees_end_of_stream() {
    // wc only finishes once every write end is closed.
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("count.txt");
    let out = run_script(&format!("printf xyz | wc -c > {}\n", output.display()));
    assert!(out.status.success());
    assert_eq!(std::fs::read_to_string(&output).unwrap().trim(), "3");
}

#[test]
fn failing_stage_does_not_hang_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.txt");
    let out = run_script(&format!("no-such-program-xyz | cat > {}\nprintf done\n", output.display()));
    assert!(out.status.success());
    assert!(stderr_of(&out).contains("execvp: no-such-program-xyz"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    assert_eq!(stdout_of(&out), "done");
}

#[test]
fn background_pipeline_runs_detached() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.txt");
    let out = run_script(&format!("printf xyz | cat > {} &\nquit\n", output.display()));
    assert!(out.status.success());
    assert!(eventually(|| std::fs::read_to_string(&output).map(|s| s == "xyz").unwrap_or(false)));
}
