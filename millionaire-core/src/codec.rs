//! Answer token encoding.
//!
//! The "FHE" tokens are a reversible text transform (a `FHE-` prefix over a
//! base64 body), not a confidentiality mechanism. Keeping the transform
//! behind this module means a real homomorphic scheme can replace it without
//! touching the game state machine.

use crate::error::{CoreError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const TOKEN_PREFIX: &str = "FHE-";

/// Encode an option index into an opaque answer token.
pub fn encode(index: usize) -> String {
    format!("{}{}", TOKEN_PREFIX, STANDARD.encode(index.to_string()))
}

/// Decode an answer token back into an option index.
///
/// Tokens without the expected prefix fall back to a direct decimal parse.
/// The fallback mirrors the original catalog format and is a known design
/// smell; it stays until every stored token carries the prefix.
pub fn decode(token: &str) -> Result<usize> {
    let body = match token.strip_prefix(TOKEN_PREFIX) {
        Some(body) => {
            let bytes = STANDARD
                .decode(body)
                .map_err(|e| CoreError::decode(format!("invalid token body: {}", e)))?;
            String::from_utf8(bytes)
                .map_err(|e| CoreError::decode(format!("token body is not utf-8: {}", e)))?
        }
        None => token.to_string(),
    };

    body.trim()
        .parse::<usize>()
        .map_err(|e| CoreError::decode(format!("token does not hold an index: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_option_indices() {
        for i in 0..4 {
            let token = encode(i);
            assert!(token.starts_with(TOKEN_PREFIX));
            assert_eq!(decode(&token).unwrap(), i);
        }
    }

    #[test]
    fn test_bare_numeric_fallback() {
        assert_eq!(decode("2").unwrap(), 2);
    }

    #[test]
    fn test_malformed_tokens_fail() {
        assert!(decode("FHE-not base64!!").is_err());
        assert!(decode("garbage").is_err());
        assert!(decode("").is_err());
    }
}
