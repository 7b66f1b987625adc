//! Bearer token gate for axum.
//!
//! ```ignore
//! let auth = JwtAuth::new(AuthOptions::new(secret, [Algorithm::HS256]))?;
//! let app = jwt_gate::apply(Router::new().route("/me", get(me)), auth);
//! ```
//!
//! Handlers read the verified payload with [`AuthClaims`]. Rejections are
//! [`AuthError`] values and render as `401` JSON responses.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;

pub use api::v1::extractors::AuthClaims;
pub use error::{AuthError, AuthErrorKind};
pub use middleware::auth::access::apply;
pub use services::auth::{
    AuthOptions, DecodedClaims, GateConfigError, JwtAuth, JwtVerifier, TokenVerifier, VerifyError,
    parse_authorization,
};
