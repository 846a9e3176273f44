//! Authentication: password hashing, HS256 access tokens, and opaque
//! `wm_`-prefixed API tokens (§6).

mod jwt;
mod password;
mod token;

pub use jwt::{Claims, JwtCodec};
pub use password::PasswordHasher;
pub use token::{generate as generate_token, hash as hash_token, is_opaque, TOKEN_PREFIX};

use diesel_async::AsyncPgConnection;
use webmacs_core::{Error, ErrorKind};
use webmacs_data::model::User;
use webmacs_data::query::{ApiTokenRepository, BlacklistTokenRepository, UserRepository};

/// Tracing target for authentication events.
pub const TRACING_TARGET: &str = "webmacs_server::auth";

/// Resolves a bearer token to its owning user, accepting either an opaque
/// `wm_`-prefixed token or an HS256 JWT (§6). A blacklisted token of
/// either shape is rejected.
pub async fn authenticate(
    conn: &mut AsyncPgConnection,
    jwt_codec: &JwtCodec,
    bearer_token: &str,
) -> Result<User, Error> {
    let token_hash = hash_token(bearer_token);
    if BlacklistTokenRepository::is_blacklisted(conn, &token_hash)
        .await
        .map_err(|e| e.into_core())?
    {
        return Err(ErrorKind::Unauthorized.with_context("token has been revoked"));
    }

    if is_opaque(bearer_token) {
        return ApiTokenRepository::find_user_by_token_hash(conn, &token_hash)
            .await
            .map_err(|e| e.into_core());
    }

    let claims = jwt_codec.decode(bearer_token)?;
    UserRepository::find_by_public_id(conn, claims.sub).await.map_err(|e| e.into_core())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_and_jwt_shapes_are_distinguishable() {
        assert!(is_opaque(&generate_token()));
        let codec = JwtCodec::new("0123456789abcdef0123456789abcdef");
        let claims = Claims::new(uuid::Uuid::new_v4(), jiff::SignedDuration::from_hours(1), None);
        let token = codec.encode(&claims).unwrap();
        assert!(!is_opaque(&token));
    }
}
