//! Test fixtures: caller tokens, image bytes and configuration

use image::{ImageFormat, Rgb, RgbImage};
use jsonwebtoken::{EncodingKey, Header, encode};
use looks_gateway::Config;
use looks_gateway::config::SecretStoreConfig;
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_USER: &str = "user-with-key";
pub const TEST_API_KEY: &str = "AIza-integration";
pub const USER_WITHOUT_KEY: &str = "user-without-key";

/// Configuration with a static secret store and fast pacing
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.gateway.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    config.gateway.batch.group_delay_ms = 20;
    config.gateway.batch.item_timeout_secs = 2;
    config.gateway.secrets = SecretStoreConfig::Static {
        keys: HashMap::from([(TEST_USER.to_string(), TEST_API_KEY.to_string())]),
    };
    config
}

/// Mint a token the gateway accepts for `user_id`
pub fn token_for(user_id: &str) -> String {
    sign(json!({
        "sub": user_id,
        "aud": "authenticated",
        "email": format!("{}@example.com", user_id),
        "exp": chrono::Utc::now().timestamp() + 3600,
    }))
}

/// Token signed with the right secret but already expired
pub fn expired_token_for(user_id: &str) -> String {
    sign(json!({
        "sub": user_id,
        "aud": "authenticated",
        "exp": chrono::Utc::now().timestamp() - 3600,
    }))
}

fn sign(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// A tiny real PNG
pub fn png_bytes() -> Vec<u8> {
    let image = RgbImage::from_pixel(2, 2, Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A tiny real BMP, which the upstream does not accept as-is
pub fn bmp_bytes() -> Vec<u8> {
    let image = RgbImage::from_pixel(2, 2, Rgb([10, 200, 10]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Bmp).unwrap();
    out.into_inner()
}
