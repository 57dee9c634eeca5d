use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part2_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/sample.txt");

    cmd.assert().success().stdout(str::diff("6\n"));
}

#[test]
fn part2_rejects_map_without_guard() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/no_guard.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("There's no guard in given laboratory"));
}
