//! Binary-level smoke tests for the acceso CLI.

use assert_cmd::Command;
use predicates::prelude::*;

fn acceso() -> Command {
    Command::cargo_bin("acceso").unwrap()
}

fn write_png(path: &std::path::Path) {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 10, 10]));
    image::DynamicImage::ImageRgb8(img).save(path).unwrap();
}

#[test]
fn help_lists_subcommands() {
    acceso()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("classify")
                .and(predicate::str::contains("batch"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn classify_missing_input_fails() {
    acceso()
        .args(["classify", "/definitely/not/here.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn classify_without_labels_reports_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    write_png(&photo);

    acceso()
        .arg("classify")
        .arg(&photo)
        .arg("--asset-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("asset not found: labels.txt"));
}

#[test]
fn classify_without_model_reports_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.png");
    write_png(&photo);
    std::fs::write(dir.path().join("labels.txt"), "Anillos\nBolsos\n").unwrap();

    acceso()
        .arg("classify")
        .arg(&photo)
        .arg("--asset-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("asset not found: accesonet.onnx"));
}

#[test]
fn batch_with_no_matches_fails() {
    acceso()
        .args(["batch", "/definitely/not/here/*.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_show_prints_json() {
    acceso()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"classifier\""));
}

#[test]
fn config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    acceso()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("accesonet.onnx"));

    // A second init without --force must refuse to overwrite.
    acceso()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
