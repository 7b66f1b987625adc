/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開, /me は bearer gate の内側
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware;
use crate::services::auth::JwtAuth;

pub fn routes(auth: JwtAuth) -> Router {
    let protected = middleware::auth::access::apply(Router::new().route("/me", get(me)), auth);

    Router::new().route("/health", get(health)).merge(protected)
}
