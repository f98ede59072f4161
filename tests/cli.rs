use std::fs;
use std::process::Command;

fn hackvm() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hackvm"))
}

const SYS: &str = "function Sys.init 0\npush constant 2\npush constant 3\nadd\nlabel END\ngoto END\n";

#[test]
fn test_build_directory_writes_named_asm() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("Adder");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("Sys.vm"), SYS).unwrap();

    let status = hackvm().arg("build").arg(&project).status().unwrap();
    assert!(status.success());
    let asm = fs::read_to_string(project.join("Adder.asm")).unwrap();
    assert!(asm.starts_with("// bootstrap\n@256\n"));
}

#[test]
fn test_build_file_with_flags() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Seven.vm");
    let output = dir.path().join("out.asm");
    fs::write(&input, "push constant 7\n").unwrap();

    let status = hackvm()
        .args(["build", "--no-comments", "--no-halt", "-o"])
        .arg(&output)
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "@7\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"
    );
}

#[test]
fn test_check_reports_ok_and_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("Good.vm");
    let bad = dir.path().join("Bad.vm");
    fs::write(&good, "push constant 1\n").unwrap();
    fs::write(&bad, "pop constant 1\n").unwrap();

    let out = hackvm().arg("check").arg(&good).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OK:"));

    let out = hackvm().arg("check").arg(&bad).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(!bad.with_extension("asm").exists());
}

#[test]
fn test_run_prints_stack() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Sys.vm");
    fs::write(&input, SYS).unwrap();

    let out = hackvm().arg("run").arg(&input).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("SP=262"), "stdout: {}", stdout);
    assert!(stdout.contains(", 5]"), "stdout: {}", stdout);
}

#[test]
fn test_unknown_bootstrap_mode() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("X.vm");
    fs::write(&input, "push constant 1\n").unwrap();
    let out = hackvm()
        .args(["build", "--bootstrap", "sometimes"])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}
