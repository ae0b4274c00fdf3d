mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use common::{encoded_image, encoded_jpeg, zip_entries};
use image::ImageFormat;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.args(["serve", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--uploads-dir"));
}

#[test]
fn test_compress_help() {
    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.args(["compress", "--help"]);
    cmd.assert().success();
}

#[test]
fn test_compress_missing_args() {
    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.args(["compress"]);
    cmd.assert().failure();
}

#[test]
fn test_compress_nonexistent_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.args(["compress", "nonexistent.jpg"])
        .arg(temp_dir.path())
        .args(["--size", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_compress_with_invalid_size() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("notes.txt");
    input.write_str("hello").unwrap();

    for size in ["0", "-1", "2.5", "big"] {
        let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
        cmd.arg("compress")
            .arg(input.path())
            .arg(temp.child("out").path())
            .arg(format!("--size={}", size));
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported parameter"));
    }
    temp.child("out").assert(predicate::path::missing());
}

#[test]
fn test_compress_text_file_creates_zip() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("notes.txt");
    input.write_str("line\n".repeat(200).as_str()).unwrap();
    let out = temp.child("out");

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(out.path())
        .args(["--size", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Archived notes.txt"));

    let archive = out.child("notes.txt.zip");
    archive.assert(predicate::path::is_file());
    let entries = zip_entries(&fs::read(archive.path()).unwrap());
    assert_eq!(
        entries,
        vec![("notes.txt".to_string(), "line\n".repeat(200).into_bytes())]
    );
}

#[test]
fn test_compress_unknown_type_creates_zip() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("blob.bin");
    input.write_binary(&[0u8, 1, 2, 3, 255]).unwrap();
    let out = temp.child("out");

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(out.path())
        .args(["--size", "1"]);
    cmd.assert().success();

    out.child("blob.bin.zip").assert(predicate::path::is_file());
}

#[test]
fn test_compress_image_meets_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("photo.jpg");
    input
        .write_binary(&encoded_image(80, 60, ImageFormat::Jpeg))
        .unwrap();
    let out = temp.child("out");

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(out.path())
        .args(["--size", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Target met at quality 95"));

    let output = out.child("photo.jpg");
    output.assert(predicate::path::is_file());
    assert!(image::open(output.path()).is_ok());
}

#[test]
fn test_compress_large_jpeg_fits_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("large.jpg");
    input.write_binary(&encoded_jpeg(1500, 1500, 100)).unwrap();
    assert!(fs::metadata(input.path()).unwrap().len() > 1024 * 1024);
    let out = temp.child("out");

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(out.path())
        .args(["--size", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Target met at quality"))
        .stdout(predicate::str::contains("Target met at quality 95").not());

    let output = out.child("large.jpg");
    assert!(fs::metadata(output.path()).unwrap().len() <= 1_048_576);
}

#[test]
fn test_compress_unreachable_target_warns() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("noise.png");
    input
        .write_binary(&encoded_image(800, 800, ImageFormat::Png))
        .unwrap();
    let out = temp.child("out");

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(out.path())
        .args(["--size", "1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("not reachable; kept quality 10"));

    out.child("noise.png").assert(predicate::path::is_file());
}

#[test]
fn test_compress_quiet_prints_nothing() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("data.json");
    input.write_str("{\"a\": 1}").unwrap();

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("-q")
        .arg("compress")
        .arg(input.path())
        .arg(temp.child("out").path())
        .args(["--size", "1"]);
    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_compress_corrupt_image_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("broken.png");
    input.write_binary(b"fake png data").unwrap();
    let out = temp.child("out");

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(out.path())
        .args(["--size", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot decode image"));

    out.child("broken.png").assert(predicate::path::missing());
}

#[test]
fn test_compress_refuses_to_overwrite_input() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("photo.jpg");
    let original = encoded_image(16, 16, ImageFormat::Jpeg);
    input.write_binary(&original).unwrap();

    let mut cmd = Command::cargo_bin("file-squeeze").unwrap();
    cmd.arg("compress")
        .arg(input.path())
        .arg(temp.path())
        .args(["--size", "1"]);
    cmd.assert().failure();

    assert_eq!(fs::read(input.path()).unwrap(), original);
}
