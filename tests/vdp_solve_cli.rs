use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;
use vdp_phase::Dataset;

#[test]
fn solve_writes_a_loadable_phase_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("results.txt");
    Command::cargo_bin("vdp_solve")
        .unwrap()
        .args(["--tend", "5", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Results saved to"));

    let ds = Dataset::from_txt(&out).unwrap();
    assert!(ds.len() > 2);
    assert_eq!(ds.y1.len(), ds.y2.len());
    assert_eq!(ds.y1[0], 2.0);
    assert_eq!(ds.y2[0], 0.0);
}

#[test]
fn solve_writes_to_results_txt_by_default() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("vdp_solve")
        .unwrap()
        .current_dir(dir.path())
        .args(["--method", "rk2", "--tend", "2"])
        .assert()
        .success();
    assert!(dir.path().join("results.txt").exists());
}

#[test]
fn solve_rejects_bad_tolerance() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("vdp_solve")
        .unwrap()
        .current_dir(dir.path())
        .args(["--tolerance", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid parameter"));
    assert!(!dir.path().join("results.txt").exists());
}

#[test]
fn plot_fails_without_results_file() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("phase_plot")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found: results.txt"));
}

#[test]
fn plot_fails_on_malformed_line() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("results.txt"), "1.0 2.0\nabc 2.0\n").unwrap();
    Command::cargo_bin("phase_plot")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

fn headless_plot(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("phase_plot").unwrap();
    cmd.current_dir(dir)
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .env("PATH", "")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn plot_succeeds_on_valid_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("results.txt"), "1.0 2.0\n3.0 4.0\n").unwrap();
    headless_plot(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("read 2 sample pairs"));
}

#[test]
fn plot_succeeds_on_empty_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("results.txt"), "").unwrap();
    headless_plot(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("read 0 sample pairs"));
}

#[test]
fn solve_then_plot_headless() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("vdp_solve")
        .unwrap()
        .current_dir(dir.path())
        .args(["--tend", "3"])
        .assert()
        .success();
    headless_plot(dir.path()).assert().success();
}
