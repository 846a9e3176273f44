//! Opaque `wm_`-prefixed API tokens (§6): random bytes on issuance, only
//! their SHA-256 hash is ever stored or looked up.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Literal prefix every issued opaque token carries.
pub const TOKEN_PREFIX: &str = "wm_";

const TOKEN_RANDOM_BYTES: usize = 32;

/// Generates a new opaque token. The caller stores only [`hash`] of the
/// return value; the plaintext is shown to the user exactly once.
pub fn generate() -> String {
    let mut bytes = [0u8; TOKEN_RANDOM_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// SHA-256 hex digest of a token, the only form persisted in
/// [`ApiToken::token_hash`](webmacs_data::model::ApiToken::token_hash) or
/// [`BlacklistToken::token_hash`](webmacs_data::model::BlacklistToken::token_hash).
pub fn hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Whether a bearer token looks like an opaque API token rather than a JWT.
pub fn is_opaque(token: &str) -> bool {
    token.starts_with(TOKEN_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_carry_the_prefix() {
        assert!(generate().starts_with(TOKEN_PREFIX));
    }

    #[test]
    fn generated_tokens_are_distinct() {
        assert_ne!(generate(), generate());
    }

    #[test]
    fn hash_is_deterministic() {
        let token = generate();
        assert_eq!(hash(&token), hash(&token));
    }

    #[test]
    fn distinct_tokens_hash_differently() {
        assert_ne!(hash("wm_a"), hash("wm_b"));
    }

    #[test]
    fn opaque_detection() {
        assert!(is_opaque("wm_abc123"));
        assert!(!is_opaque("eyJhbGciOiJIUzI1NiJ9.x.y"));
    }
}
