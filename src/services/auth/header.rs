//! `Authorization` header parsing.
//!
//! Only the shape `<scheme> <credential>` is checked; the scheme itself is
//! accepted positionally, so `Basic abc` yields `abc` just like `Bearer abc`.

use crate::error::AuthErrorKind;

/// Extract the credential from a raw `Authorization` value.
///
/// Runs of whitespace separate segments, and leading or trailing whitespace
/// leaves an empty segment at that end (`" Bearer x"` has three segments,
/// `"Bearer "` has two with an empty credential).
pub fn parse_authorization(value: Option<&str>) -> Result<&str, AuthErrorKind> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthErrorKind::NoAuthHeader),
    };

    let segments = split_segments(value);
    if segments.len() != 2 {
        return Err(AuthErrorKind::InvalidAuthHeader);
    }

    match segments[1] {
        "" => Err(AuthErrorKind::NoAuthHeader),
        token => Ok(token),
    }
}

fn split_segments(value: &str) -> Vec<&str> {
    let pieces: Vec<&str> = value.split(char::is_whitespace).collect();
    let last = pieces.len() - 1;

    pieces
        .into_iter()
        .enumerate()
        .filter(|(i, piece)| *i == 0 || *i == last || !piece.is_empty())
        .map(|(_, piece)| piece)
        .collect()
}
