use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diameter"))
        .current_dir(dir)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn write_inputs(dir: &Path, timetable: &str, schedule: &str) {
    fs::write(dir.join("timetable.txt"), timetable).unwrap();
    fs::write(dir.join("schedule.txt"), schedule).unwrap();
}

#[test]
fn prints_itineraries_and_writes_diameter() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "A\tB\t4\n", "# round trip\nX\tA\t0\tB\t4\nX\tB\t10\tA\t14\n");

    let output = run(dir.path(), &["timetable.txt", "schedule.txt"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "X\tA\t0\tB\t4\n\nX\tB\t10\tA\t14\n\n");
    assert_eq!(fs::read_to_string(dir.path().join("diameter.txt")).unwrap(), "X\tB\t10\tA\t14\n");
}

#[test]
fn custom_output_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "A\tB\t4\n", "X\tA\t0\tB\t4\nX\tB\t10\tA\t14\n");

    let output = run(
        dir.path(),
        &["timetable.txt", "schedule.txt", "--diameter-out", "longest.tsv", "--all-routes", "routes.tsv"],
    );
    assert!(output.status.success());
    assert!(dir.path().join("longest.tsv").exists());
    assert_eq!(fs::read_to_string(dir.path().join("routes.tsv")).unwrap(), "X\tA\t0\tB\t4\n\nX\tB\t10\tA\t14\n\n");
}

#[test]
fn invalid_leg_fails_with_the_record() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "A\tB\t4\n", "X\tA\t0\tB\t4\nX\tB\t10\tA\t15\n");

    let output = run(dir.path(), &["timetable.txt", "schedule.txt"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("X B 10 A 15"), "{stderr}");
}

#[test]
fn unreachable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "A\tB\t4\n", "X\tA\t0\tB\t4\n");

    let output = run(dir.path(), &["timetable.txt", "schedule.txt"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Location A is unreachable from B"), "{stderr}");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(dir.path(), &["nope.txt", "schedule.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("cannot open nope.txt"));

    let output = run(dir.path(), &["only-one.txt"]);
    assert!(!output.status.success());
}

#[test]
fn empty_schedule_succeeds_with_no_output() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "A\tB\t4\n", "# nothing scheduled\n");

    let output = run(dir.path(), &["timetable.txt", "schedule.txt"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("diameter.txt")).unwrap(), "");
}

#[test]
fn stale_diameter_file_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "A\tA\t2\n", "X\tA\t0\tA\t2\n");
    fs::write(dir.path().join("diameter.txt"), "STALE\n").unwrap();

    let output = run(dir.path(), &["timetable.txt", "schedule.txt"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(dir.path().join("diameter.txt")).unwrap(), "");
}
