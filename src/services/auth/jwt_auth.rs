use std::sync::Arc;

use crate::error::{AuthError, AuthErrorKind};

use super::claims::DecodedClaims;
use super::header::parse_authorization;
use super::options::{AuthOptions, GateConfigError};
use super::verifier::{JwtVerifier, TokenVerifier, VerifyError};

/// The bearer-token gate: header parsing, verification and failure
/// classification.
///
/// Built once at startup and cloned into the middleware; clones share the
/// same immutable options and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    options: Arc<AuthOptions>,
    verifier: Arc<dyn TokenVerifier>,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl JwtAuth {
    /// Fails when the secret is missing or the allow-list cannot be served
    /// by a single key.
    pub fn new(options: AuthOptions) -> Result<Self, GateConfigError> {
        let verifier = JwtVerifier::new(&options)?;
        Ok(Self {
            options: Arc::new(options),
            verifier: Arc::new(verifier),
        })
    }

    /// Gate over a custom verification primitive. The secret and
    /// allow-list invariants still apply.
    pub fn with_verifier(
        options: AuthOptions,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Result<Self, GateConfigError> {
        options.validate()?;
        Ok(Self {
            options: Arc::new(options),
            verifier,
        })
    }

    pub fn options(&self) -> &AuthOptions {
        &self.options
    }

    /// Decide a request from its raw `Authorization` value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<DecodedClaims, AuthError> {
        let token = parse_authorization(authorization).map_err(|kind| self.reject(kind))?;

        self.verifier.verify(token).map_err(|err| {
            let kind = match &err {
                VerifyError::Expired => AuthErrorKind::TokenExpired,
                VerifyError::Invalid(_) => AuthErrorKind::TokenInvalid,
            };
            tracing::debug!(code = kind.code(), error = %err, "request rejected");
            self.error_for(kind)
        })
    }

    /// Build the error for `kind`, using the configured message if any.
    pub fn reject(&self, kind: AuthErrorKind) -> AuthError {
        tracing::debug!(code = kind.code(), "request rejected");
        self.error_for(kind)
    }

    fn error_for(&self, kind: AuthErrorKind) -> AuthError {
        AuthError::new(kind, self.options.message_for(kind))
    }
}
