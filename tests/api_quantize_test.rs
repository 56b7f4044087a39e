//! Tests for /api/quantize endpoint.

mod common;

use axum::http::StatusCode;
use base64::Engine;
use retro_quant::{Color, PaletteKind};
use retrokit::api::QuantizeResponse;
use retrokit::imaging::decode_png;
use retrokit::models::AppConfig;
use common::{fixtures, TestApp};

#[tokio::test]
async fn test_quantize_with_preset() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(32, 32));

    let response = app.post_png("/api/quantize?palette=gameboy", body).await;

    let image = common::decode_body(&response);
    assert_eq!((image.width(), image.height()), (32, 32));
    common::assert_only_colors(&image, PaletteKind::GameBoy.colors());

    let palette = response.header("x-palette").unwrap();
    for hex in palette.split(',') {
        let color: Color = hex.parse().unwrap();
        assert!(PaletteKind::GameBoy.colors().contains(&color));
    }
}

#[tokio::test]
async fn test_quantize_uses_default_palette() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(16, 16));

    let response = app.post_png("/api/quantize", body).await;

    let image = common::decode_body(&response);
    common::assert_only_colors(&image, PaletteKind::Pico8.colors());
}

#[tokio::test]
async fn test_repeated_request_is_cached() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(24, 24));

    let first = app.post_png("/api/quantize?palette=cga", body.clone()).await;
    let second = app.post_png("/api/quantize?palette=cga", body).await;

    common::assert_png(&first);
    common::assert_png(&second);
    assert_eq!(first.header("x-cache"), Some("miss"));
    assert_eq!(second.header("x-cache"), Some("hit"));
    assert_eq!(first.body, second.body);

    let stats = app.processor.cache_stats();
    assert_eq!(stats.image.entries, 1);
    assert_eq!(stats.image.hits, 1);
}

#[tokio::test]
async fn test_parameter_order_does_not_split_cache() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(24, 24));

    app.post_png("/api/quantize?palette=c64&resolution=12x12", body.clone())
        .await;
    let response = app
        .post_png("/api/quantize?resolution=12x12&palette=c64", body)
        .await;

    assert_eq!(response.header("x-cache"), Some("hit"));
}

#[tokio::test]
async fn test_quantize_json_format() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(20, 10));

    let response = app
        .post_png("/api/quantize?palette=mono&format=json", body)
        .await;

    common::assert_ok(&response);
    let json: QuantizeResponse = response.json();
    assert_eq!((json.width, json.height), (20, 10));
    assert!(!json.cached);
    assert!(!json.palette.is_empty());
    assert!(json.palette.iter().all(|c| c == "#000000" || c == "#ffffff"));

    let encoded = json
        .image
        .strip_prefix("data:image/png;base64,")
        .expect("Expected a PNG data URL");
    let png = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .unwrap();
    let image = decode_png(&png).unwrap();
    assert_eq!((image.width(), image.height()), (20, 10));
}

#[tokio::test]
async fn test_resolution_stretch_and_fit() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(40, 40));

    let stretched = app
        .post_png("/api/quantize?palette=pico8&resolution=20x10", body.clone())
        .await;
    let image = common::decode_body(&stretched);
    assert_eq!((image.width(), image.height()), (20, 10));

    let fitted = app
        .post_png("/api/quantize?palette=pico8&resolution=20x10&scaling=fit", body)
        .await;
    let image = common::decode_body(&fitted);
    assert_eq!((image.width(), image.height()), (10, 10));
}

#[tokio::test]
async fn test_derive_keeps_existing_colors() {
    let app = TestApp::new();
    let sprite = fixtures::sprite();

    let response = app
        .post_png(
            "/api/quantize?palette=derive&colors=16",
            fixtures::png_bytes(&sprite),
        )
        .await;

    let image = common::decode_body(&response);
    assert_eq!(image, sprite);
    let palette = response.header("x-palette").unwrap();
    assert_eq!(palette.split(',').count(), fixtures::SPRITE_COLORS.len());
}

#[tokio::test]
async fn test_derive_reduces_colors() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(32, 32));

    let response = app
        .post_png("/api/quantize?palette=derive&colors=6", body)
        .await;

    let image = common::decode_body(&response);
    let palette: Vec<Color> = response
        .header("x-palette")
        .unwrap()
        .split(',')
        .map(|hex| hex.parse().unwrap())
        .collect();
    assert!(palette.len() <= 6);
    common::assert_only_colors(&image, &palette);
}

#[tokio::test]
async fn test_custom_palette() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(16, 16));

    let response = app
        .post_png("/api/quantize?palette=custom&custom=%23000,%23ff0000", body)
        .await;

    let image = common::decode_body(&response);
    common::assert_only_colors(&image, &[Color::new(0, 0, 0), Color::new(255, 0, 0)]);
}

#[tokio::test]
async fn test_original_palette_is_unchanged() {
    let app = TestApp::new();
    let sprite = fixtures::sprite();

    let response = app
        .post_png("/api/quantize?palette=original", fixtures::png_bytes(&sprite))
        .await;

    assert_eq!(common::decode_body(&response), sprite);
}

#[tokio::test]
async fn test_palette_image_is_fixed_point() {
    let app = TestApp::new();
    let colors = PaletteKind::ZxSpectrum.colors();
    let pixels: Vec<Color> = (0..colors.len() * 4).map(|i| colors[i % colors.len()]).collect();
    let image =
        retro_quant::PixelBuffer::from_colors(colors.len() as u32, 4, &pixels).unwrap();

    let response = app
        .post_png(
            "/api/quantize?palette=zx-spectrum",
            fixtures::png_bytes(&image),
        )
        .await;

    assert_eq!(common::decode_body(&response), image);
}

#[tokio::test]
async fn test_empty_body_rejected() {
    let app = TestApp::new();

    let response = app.post_png("/api/quantize", Vec::new()).await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_png_rejected() {
    let app = TestApp::new();

    let response = app
        .post_png("/api/quantize", b"not an image".to_vec())
        .await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("PNG decode error"));
}

#[tokio::test]
async fn test_invalid_parameters_rejected() {
    let app = TestApp::new();
    let body = fixtures::png_bytes(&fixtures::gradient(4, 4));

    for query in [
        "palette=vga",
        "palette=derive&colors=0",
        "palette=derive&colors=300",
        "palette=custom",
        "palette=custom&custom=%23zzz",
        "resolution=0x10",
        "resolution=big",
        "scaling=crop",
        "format=gif",
    ] {
        let response = app
            .post_png(&format!("/api/quantize?{query}"), body.clone())
            .await;
        common::assert_error(&response, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_body_limit_from_config() {
    let app = TestApp::with_config(AppConfig {
        max_upload_mb: 1,
        optimize_png: false,
        ..AppConfig::default()
    });

    let response = app
        .post_png("/api/quantize", vec![0u8; 2 * 1024 * 1024])
        .await;

    common::assert_status(&response, StatusCode::PAYLOAD_TOO_LARGE);
}
