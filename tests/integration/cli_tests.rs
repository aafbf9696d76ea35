//! CLI integration tests
//!
//! These tests run the built binary against fixture projects.

mod common;

use assert_cmd::Command;
use common::{layout, Fixture};
use predicates::prelude::*;

fn reslint() -> Command {
    let mut cmd = Command::cargo_bin("reslint").unwrap();
    cmd.arg("--quiet");
    cmd
}

fn broken_layout() -> Fixture {
    Fixture::new().with("res/layout/main.xml", &layout("    <TextView android:layout_height=\"wrap_content\" />"))
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("reslint")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--single-file"))
        .stdout(predicate::str::contains("--show-fixes"));
}

#[test]
fn test_clean_project_exits_zero() {
    let fixture = Fixture::new().with("res/layout/main.xml", &layout(""));
    reslint()
        .arg(fixture.path())
        .assert()
        .success()
        .stdout("No warnings.\n");
}

#[test]
fn test_errors_exit_one_with_exact_text() {
    let fixture = broken_layout();
    reslint()
        .arg(fixture.path())
        .assert()
        .code(1)
        .stdout(
            "res/layout/main.xml:4: Error: The required layout_width attribute is missing [RequiredSize]\n    <TextView android:layout_height=\"wrap_content\" />\n     ~~~~~~~~\n1 errors, 0 warnings\n",
        );
}

#[test]
fn test_show_fixes() {
    let fixture = broken_layout();
    reslint()
        .arg(fixture.path())
        .arg("--show-fixes")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Fix for res/layout/main.xml line 4: Set layout_width to wrap_content:\n@@ -4 +4\n",
        ))
        .stdout(predicate::str::contains("Set layout_width to match_parent"));
}

#[test]
fn test_disable_and_json() {
    let fixture = broken_layout();
    reslint()
        .arg(fixture.path())
        .args(["--disable", "RequiredSize"])
        .assert()
        .success();

    reslint()
        .arg(fixture.path())
        .args(["--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"id\": \"RequiredSize\""));
}

#[test]
fn test_apply_fixes_rewrites_files() {
    let fixture = broken_layout();
    reslint()
        .arg(fixture.path())
        .arg("--apply-fixes")
        .assert()
        .success()
        .stdout("No warnings.\n");
    assert!(fixture
        .read("res/layout/main.xml")
        .contains("<TextView android:layout_width=\"wrap_content\" android:layout_height=\"wrap_content\" />"));
}

#[test]
fn test_baseline_round_trip() {
    let fixture = broken_layout();
    let baseline = fixture.path().join("baseline.json");
    reslint()
        .arg(fixture.path())
        .arg("--generate-baseline")
        .arg(&baseline)
        .assert()
        .code(1);
    reslint()
        .arg(fixture.path())
        .arg("--baseline")
        .arg(&baseline)
        .assert()
        .success()
        .stdout("No warnings.\n");
}

#[test]
fn test_config_file_severity_override() {
    let fixture = Fixture::new()
        .with("res/values/strings.xml", "<resources>\n    <string name=\"a\">Wait...</string>\n</resources>\n")
        .with(".reslint.yml", "severity_overrides:\n  TypographyEllipsis: error\n");
    reslint()
        .arg(fixture.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: Replace \"...\" with ellipsis character"));
}

#[test]
fn test_single_file_mode() {
    let fixture = Fixture::new().with(
        "res/layout/main.xml",
        &layout("    <Button android:layout_width=\"1dp\" android:layout_height=\"1dp\" android:layout_below=\"@id/elsewhere\" />"),
    );
    let file = fixture.path().join("res/layout/main.xml");
    reslint()
        .arg(fixture.path())
        .arg("--single-file")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("[UnknownIdInLayout]"))
        .stdout(predicate::str::contains("0 errors, 1 warnings"));
}
