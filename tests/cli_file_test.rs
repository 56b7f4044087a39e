//! File round trips through the operations behind the CLI commands.

mod common;

use retro_quant::PaletteKind;
use retrokit::cli;
use retrokit::imaging::decode_png;
use retrokit::models::{PaletteChoice, ProcessingParams, Resolution};
use tempfile::TempDir;

use common::{fixtures, TestApp};

fn write_fixture(dir: &TempDir, name: &str, buffer: &retro_quant::PixelBuffer) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, fixtures::png_bytes(buffer)).unwrap();
    path
}

#[test]
fn test_quantize_file() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "in.png", &fixtures::gradient(30, 20));
    let output = dir.path().join("out.png");
    let state = TestApp::create_state();
    let params = ProcessingParams::new(PaletteChoice::Preset(PaletteKind::Pico8))
        .with_resolution(Resolution::Exact {
            width: 15,
            height: 10,
        });

    let report = cli::quantize_file(&state.processor, &input, &output, &params, true).unwrap();

    assert_eq!((report.width, report.height), (15, 10));
    let written = std::fs::read(&output).unwrap();
    assert_eq!(report.bytes_written, written.len());
    let image = decode_png(&written).unwrap();
    assert_eq!((image.width(), image.height()), (15, 10));
    common::assert_only_colors(&image, PaletteKind::Pico8.colors());
}

#[test]
fn test_restore_file() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "big.png", &fixtures::upscaled_sprite(6));
    let output = dir.path().join("small.png");
    let state = TestApp::create_state();

    let (report, estimate) = cli::restore_file(&state.processor, &input, &output, false)
        .unwrap()
        .expect("Expected an upscale to be detected");

    assert_eq!((estimate.width, estimate.height), (10, 12));
    assert_eq!(report.palette.len(), fixtures::SPRITE_COLORS.len());
    let image = decode_png(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(image, fixtures::sprite());
}

#[test]
fn test_restore_file_without_upscale_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "noise.png", &fixtures::noise(24, 24, 3));
    let output = dir.path().join("out.png");
    let state = TestApp::create_state();

    let result = cli::restore_file(&state.processor, &input, &output, false).unwrap();

    assert!(result.is_none());
    assert!(!output.exists());
}

#[test]
fn test_detect_file() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "big.png", &fixtures::upscaled_sprite(2));
    let state = TestApp::create_state();

    let estimate = cli::detect_file(&state.processor, &input).unwrap().unwrap();

    assert_eq!((estimate.scale_x, estimate.scale_y), (2.0, 2.0));
}

#[test]
fn test_missing_input_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.png");
    let state = TestApp::create_state();

    let error = cli::detect_file(&state.processor, &missing).unwrap_err();

    assert!(error.to_string().contains("missing.png"));
}
