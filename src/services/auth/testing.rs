// Token minting helpers shared by unit tests.
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

pub const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn mint(alg: Algorithm, claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// Sign an arbitrary payload text, bypassing claims serialization.
pub fn mint_raw(alg: Algorithm, payload: &str, secret: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Header::new(alg)).unwrap());
    let message = format!("{header}.{}", URL_SAFE_NO_PAD.encode(payload));
    let signature = jsonwebtoken::crypto::sign(
        message.as_bytes(),
        &EncodingKey::from_secret(secret.as_bytes()),
        alg,
    )
    .unwrap();
    format!("{message}.{signature}")
}
