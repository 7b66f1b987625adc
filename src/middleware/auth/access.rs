//! Bearer token verification → `DecodedClaims` into request extensions.
//!
//! - `Authorization: <scheme> <token>` is parsed and the token verified by `JwtAuth`.
//! - On success the claims are inserted into the request and the next service runs.
//! - On failure the request ends here with a 401 `AuthError` response.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::{AuthError, AuthErrorKind};
use crate::services::auth::JwtAuth;

/// Put every route of `router` behind the gate.
///
/// ```ignore
/// let auth = JwtAuth::new(AuthOptions::new(secret, [Algorithm::HS256]))?;
/// let protected = middleware::auth::access::apply(Router::new().route("/me", get(me)), auth);
/// ```
pub fn apply<S>(router: Router<S>, auth: JwtAuth) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth, access_middleware))
}

async fn access_middleware(
    State(auth): State<JwtAuth>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = match req.headers().get(header::AUTHORIZATION).map(HeaderValue::to_str) {
        None => auth.authenticate(None)?,
        Some(Ok(value)) => auth.authenticate(Some(value))?,
        // not visible ASCII: cannot hold a well-formed credential
        Some(Err(_)) => return Err(auth.reject(AuthErrorKind::InvalidAuthHeader)),
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
