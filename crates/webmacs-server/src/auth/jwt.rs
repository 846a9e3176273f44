//! HS256 JWT issuance and verification (§6: `{sub, iat, exp, role?}`).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webmacs_core::ErrorKind;

use super::TRACING_TARGET;

/// Claims carried by every issued access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    pub fn new(user_public_id: Uuid, ttl: jiff::SignedDuration, role: Option<String>) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            sub: user_public_id,
            iat: now.as_second(),
            exp: (now + ttl).as_second(),
            role,
        }
    }
}

/// Signs and verifies HS256 access tokens against a single shared secret.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn encode(&self, claims: &Claims) -> webmacs_core::Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "failed to encode access token");
            ErrorKind::DependencyFailure.with_context("token generation failed")
        })
    }

    /// Decodes and validates a bearer token. Expiry is enforced by the
    /// underlying library; a caller must separately check the blacklist
    /// table (§4.J) before trusting the claims.
    pub fn decode(&self, token: &str) -> webmacs_core::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(target: TRACING_TARGET, error = %e, "access token rejected");
                ErrorKind::Unauthorized.with_context("invalid or expired token")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_valid_token() {
        let codec = JwtCodec::new("0123456789abcdef0123456789abcdef");
        let sub = Uuid::new_v4();
        let claims = Claims::new(sub, jiff::SignedDuration::from_hours(24), Some("admin".to_string()));
        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded.sub, sub);
        assert_eq!(decoded.role.as_deref(), Some("admin"));
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let a = JwtCodec::new("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let b = JwtCodec::new("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        let claims = Claims::new(Uuid::new_v4(), jiff::SignedDuration::from_hours(24), None);
        let token = a.encode(&claims).unwrap();
        assert!(b.decode(&token).is_err());
    }

    #[test]
    fn rejects_an_expired_token() {
        let codec = JwtCodec::new("0123456789abcdef0123456789abcdef");
        let claims = Claims::new(Uuid::new_v4(), jiff::SignedDuration::from_secs(-1), None);
        let token = codec.encode(&claims).unwrap();
        assert!(codec.decode(&token).is_err());
    }
}
