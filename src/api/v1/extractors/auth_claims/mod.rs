/*!
 * Authenticated claims extractor
 *
 * Responsibility:
 * - 認証済みリクエストの DecodedClaims を handler に提供する
 * - 検証そのものは middleware::auth::access の責務
 */

mod core;

pub use core::AuthClaims;
