use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde_json::Value;
use std::error::Error as StdError;
use thiserror::Error;

use super::claims::DecodedClaims;
use super::options::{AuthOptions, GateConfigError};

/// Outcome classes the gate distinguishes. Everything that is not an expiry
/// is reported as `Invalid`.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,

    #[error("token rejected: {0}")]
    Invalid(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid(Box::new(e)),
        }
    }
}

/// Token verification primitive used by the gate.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<DecodedClaims, VerifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Hmac,
    Rsa,
    Ec,
    Ed,
}

fn family(alg: Algorithm) -> KeyFamily {
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => KeyFamily::Hmac,
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => KeyFamily::Rsa,
        Algorithm::ES256 | Algorithm::ES384 => KeyFamily::Ec,
        Algorithm::EdDSA => KeyFamily::Ed,
    }
}

/// `jsonwebtoken` backed verifier: signature, algorithm allow-list, `exp` and
/// `nbf` (when present). `aud`/`iss` are not checked.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(options: &AuthOptions) -> Result<Self, GateConfigError> {
        options.validate()?;

        let first = options.algorithms[0];
        if let Some(other) = options
            .algorithms
            .iter()
            .copied()
            .find(|alg| family(*alg) != family(first))
        {
            return Err(GateConfigError::MixedKeyFamilies(first, other));
        }

        let secret = options.secret.as_bytes();
        let decoding_key = match family(first) {
            KeyFamily::Hmac => Ok(DecodingKey::from_secret(secret)),
            KeyFamily::Rsa => DecodingKey::from_rsa_pem(secret),
            KeyFamily::Ec => DecodingKey::from_ec_pem(secret),
            KeyFamily::Ed => DecodingKey::from_ed_pem(secret),
        }
        .map_err(|source| GateConfigError::InvalidKey {
            algorithm: first,
            source,
        })?;

        let mut validation = Validation::new(first);
        validation.algorithms = options.algorithms.clone();
        // exp/nbf are checked when present, never required
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = options.leeway_seconds;
        // expired once now >= exp + leeway
        validation.reject_tokens_expiring_in_less_than = 1;

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

impl JwtVerifier {
    /// Signature and algorithm check for tokens whose payload is not a JSON
    /// object. Such payloads carry no registered claims, so there is nothing
    /// else to validate; the payload text is returned as is.
    fn verify_raw(
        &self,
        token: &str,
        parse_error: jsonwebtoken::errors::Error,
    ) -> Result<DecodedClaims, VerifyError> {
        let header = jsonwebtoken::decode_header(token)?;
        if !self.validation.algorithms.contains(&header.alg) {
            return Err(jsonwebtoken::errors::Error::from(ErrorKind::InvalidAlgorithm).into());
        }

        let (message, signature) = token
            .rsplit_once('.')
            .ok_or(jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken))?;
        let (_, payload) = message
            .split_once('.')
            .ok_or(jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken))?;

        let valid = jsonwebtoken::crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            header.alg,
        )?;
        if !valid {
            return Err(jsonwebtoken::errors::Error::from(ErrorKind::InvalidSignature).into());
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| jsonwebtoken::errors::Error::from(ErrorKind::Utf8(e)))?;

        match serde_json::from_str::<Value>(&text) {
            // an object the claims parser still rejected
            Ok(Value::Object(_)) => Err(parse_error.into()),
            _ => Ok(DecodedClaims::Raw(text)),
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<DecodedClaims, VerifyError> {
        match jsonwebtoken::decode::<Value>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(DecodedClaims::from(data.claims)),
            // payload is not a claims object
            Err(e) if matches!(e.kind(), ErrorKind::Json(_)) => self.verify_raw(token, e),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::auth::testing::{SECRET, mint, mint_raw, now};

    fn verifier(algorithms: &[Algorithm]) -> JwtVerifier {
        JwtVerifier::new(&AuthOptions::new(SECRET, algorithms.iter().copied())).unwrap()
    }

    #[test]
    fn test_valid_token_decodes() {
        let token = mint(Algorithm::HS256, json!({"sub": "user123", "exp": now() + 3600}));
        let claims = verifier(&[Algorithm::HS256]).verify(&token).unwrap();
        assert_eq!(claims.subject(), Some("user123"));
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let token = mint(Algorithm::HS256, json!({"sub": "user123"}));
        assert!(verifier(&[Algorithm::HS256]).verify(&token).is_ok());
    }

    #[test]
    fn test_audience_is_not_checked() {
        let token = mint(Algorithm::HS256, json!({"sub": "u", "aud": "someone-else"}));
        assert!(verifier(&[Algorithm::HS256]).verify(&token).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let token = mint(Algorithm::HS256, json!({"sub": "u", "exp": now() - 3600}));
        let err = verifier(&[Algorithm::HS256]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let token = mint(Algorithm::HS256, json!({"sub": "u", "exp": now()}));
        let err = verifier(&[Algorithm::HS256]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Expired));

        let token = mint(Algorithm::HS256, json!({"sub": "u", "exp": now() + 5}));
        assert!(verifier(&[Algorithm::HS256]).verify(&token).is_ok());
    }

    #[test]
    fn test_string_payload_is_raw() {
        let token = mint_raw(Algorithm::HS256, "hello", SECRET);
        let claims = verifier(&[Algorithm::HS256]).verify(&token).unwrap();
        assert_eq!(claims, DecodedClaims::Raw("hello".to_string()));
    }

    #[test]
    fn test_non_object_json_payload_is_raw() {
        let token = mint_raw(Algorithm::HS256, "[1,2]", SECRET);
        let claims = verifier(&[Algorithm::HS256]).verify(&token).unwrap();
        assert_eq!(claims.as_raw(), Some("[1,2]"));
    }

    #[test]
    fn test_raw_payload_still_checks_signature_and_algorithm() {
        let forged = mint_raw(Algorithm::HS256, "hello", "another-secret-for-testing-purposes");
        assert!(matches!(
            verifier(&[Algorithm::HS256]).verify(&forged),
            Err(VerifyError::Invalid(_))
        ));

        let other_alg = mint_raw(Algorithm::HS384, "hello", SECRET);
        assert!(matches!(
            verifier(&[Algorithm::HS256]).verify(&other_alg),
            Err(VerifyError::Invalid(_))
        ));
    }

    #[test]
    fn test_leeway_tolerates_recent_expiry() {
        let options = AuthOptions::new(SECRET, [Algorithm::HS256]).with_leeway_seconds(120);
        let token = mint(Algorithm::HS256, json!({"sub": "u", "exp": now() - 30}));
        assert!(JwtVerifier::new(&options).unwrap().verify(&token).is_ok());
    }

    #[test]
    fn test_not_yet_valid_is_invalid() {
        let token = mint(Algorithm::HS256, json!({"sub": "u", "nbf": now() + 3600}));
        let err = verifier(&[Algorithm::HS256]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn test_algorithm_outside_allow_list() {
        let token = mint(Algorithm::HS384, json!({"sub": "u", "exp": now() + 3600}));
        let err = verifier(&[Algorithm::HS256]).verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));

        assert!(verifier(&[Algorithm::HS256, Algorithm::HS384]).verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret() {
        let other = JwtVerifier::new(&AuthOptions::new(
            "another-secret-for-testing-purposes",
            [Algorithm::HS256],
        ))
        .unwrap();
        let token = mint(Algorithm::HS256, json!({"sub": "u"}));
        assert!(matches!(other.verify(&token), Err(VerifyError::Invalid(_))));
    }

    #[test]
    fn test_garbage_token() {
        let err = verifier(&[Algorithm::HS256]).verify("abc.def.ghi").unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn test_mixed_families_rejected() {
        let err = JwtVerifier::new(&AuthOptions::new(
            SECRET,
            [Algorithm::HS256, Algorithm::RS256],
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            GateConfigError::MixedKeyFamilies(Algorithm::HS256, Algorithm::RS256)
        ));
    }

    #[test]
    fn test_asymmetric_family_needs_pem_key() {
        let err = JwtVerifier::new(&AuthOptions::new(SECRET, [Algorithm::RS256])).unwrap_err();
        assert!(matches!(
            err,
            GateConfigError::InvalidKey {
                algorithm: Algorithm::RS256,
                ..
            }
        ));
    }
}
