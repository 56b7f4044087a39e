//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use retro_quant::{Color, PixelBuffer};
use retrokit::imaging::decode_png;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    // Check Content-Type header
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert JSON error body has expected status field
pub fn assert_json_status(response: &TestResponse, expected_status: u16) {
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected_status as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected_status,
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert a request was rejected with the given status and a JSON error body
pub fn assert_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    assert_json_status(response, expected.as_u16());
    let json: serde_json::Value = response.json();
    assert!(json["error"].is_string(), "Expected error message");
}

/// Decode the PNG body of a successful response
pub fn decode_body(response: &TestResponse) -> PixelBuffer {
    assert_png(response);
    decode_png(&response.body).expect("Response body is not a decodable PNG")
}

/// Assert every pixel of `buffer` is one of `allowed`
pub fn assert_only_colors(buffer: &PixelBuffer, allowed: &[Color]) {
    for (i, p) in buffer.pixels().enumerate() {
        let color = Color::new(p[0], p[1], p[2]);
        assert!(
            allowed.contains(&color),
            "Pixel {i} has color {} which is not in the palette",
            color.to_hex()
        );
    }
}
