use assert_cmd::Command;

mod common;

use common::*;

#[test]
fn requires_path() {
    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.assert().failure();
}

#[test]
fn extracts_regions_from_page_directory() {
    let pages = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    save_page(pages.path(), "lang-99.png", &sample_page());
    save_page(pages.path(), "blank.png", &page_with_blocks(120, 120, &[]));

    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.arg("-p").arg(pages.path()).arg("-o").arg(out.path()).arg("-s");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Exported 2 region(s) from 2 page(s)"));

    assert!(out.path().join("lang-99_roi-1.png").is_file());
    assert!(out.path().join("lang-99_roi-2.png").is_file());
    assert!(!out.path().join("lang-99_roi-3.png").exists());
    assert!(out.path().join("lang-99_annotated.png").is_file());
    assert!(out.path().join("blank_annotated.png").is_file());
}

#[test]
fn outputs_default_to_input_directory() {
    let pages = tempfile::tempdir().unwrap();
    let page = save_page(pages.path(), "scan.png", &sample_page());

    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.arg("--path").arg(&page).args(["--min-height", "100"]);
    cmd.assert().success();

    assert!(pages.path().join("scan_roi-1.png").is_file());
    assert!(!pages.path().join("scan_roi-2.png").exists());
}

#[test]
fn missing_output_directory_fails() {
    let pages = tempfile::tempdir().unwrap();
    save_page(pages.path(), "scan.png", &sample_page());

    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.arg("-p").arg(pages.path()).args(["-o", "/definitely/not/here"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("does not exist"));
}

#[test]
fn unreadable_page_is_reported_and_others_continue() {
    let pages = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    save_page(pages.path(), "good.png", &sample_page());
    std::fs::write(pages.path().join("broken.png"), b"not a png").unwrap();

    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.arg("-p").arg(pages.path()).arg("-o").arg(out.path());
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("broken.png"))
        .stderr(predicates::str::contains("1 of 2 page(s) failed"));

    assert!(out.path().join("good_roi-2.png").is_file());
}

#[test]
fn debug_output_goes_to_per_page_directory() {
    let pages = tempfile::tempdir().unwrap();
    let debug = tempfile::tempdir().unwrap();
    save_page(pages.path(), "scan.png", &sample_page());
    std::fs::write(debug.path().join("notes.txt"), b"earlier run").unwrap();

    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.arg("-p").arg(pages.path()).arg("--debug-out").arg(debug.path());
    cmd.assert().success();

    assert!(debug.path().join("scan/00_input/01.png").is_file());
    assert!(debug.path().join("scan/05_region_filtering/01.png").is_file());
}

#[test]
fn non_empty_page_debug_directory_fails_that_page() {
    let pages = tempfile::tempdir().unwrap();
    let debug = tempfile::tempdir().unwrap();
    save_page(pages.path(), "scan.png", &sample_page());
    std::fs::create_dir(debug.path().join("scan")).unwrap();
    std::fs::write(debug.path().join("scan/old.png"), b"stale").unwrap();

    let mut cmd = Command::cargo_bin("roicut").unwrap();
    cmd.arg("-p").arg(pages.path()).arg("--debug-out").arg(debug.path());
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("Debug directory is not empty"))
        .stderr(predicates::str::contains("1 of 1 page(s) failed"));
}
