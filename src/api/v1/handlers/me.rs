/*
 * Responsibility
 * - GET /me: gate が付与した claims をそのまま返す
 */
use axum::Json;

use crate::api::v1::extractors::AuthClaims;
use crate::services::auth::DecodedClaims;

pub async fn me(AuthClaims(claims): AuthClaims) -> Json<DecodedClaims> {
    Json(claims)
}
