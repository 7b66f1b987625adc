/*
 * Responsibility
 * - Bearer token gate: options, header parsing, verification, claims
 * - HTTP wiring lives in middleware::auth
 */
mod claims;
mod header;
mod jwt_auth;
mod options;
mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::DecodedClaims;
pub use header::parse_authorization;
pub use jwt_auth::JwtAuth;
pub use options::{AuthOptions, GateConfigError};
pub use verifier::{JwtVerifier, TokenVerifier, VerifyError};
