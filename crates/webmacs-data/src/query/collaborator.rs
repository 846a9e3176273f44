//! Minimal repositories for the external-collaborator entities (§3, §6):
//! just enough to authenticate requests and run the blacklist-token janitor
//! (§5); full CRUD for these entities is out of scope (§1).

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::error::{PgError, PgResult};
use crate::model::{ApiToken, BlacklistToken, NewApiToken, NewBlacklistToken, NewUser, User};
use crate::schema;

#[derive(Debug, Default, Clone, Copy)]
pub struct UserRepository;

impl UserRepository {
    pub async fn create(conn: &mut AsyncPgConnection, user: NewUser) -> PgResult<User> {
        use schema::users;

        diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email_value: &str,
    ) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        users
            .filter(email.eq(email_value))
            .select(User::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    pub async fn find_by_public_id(
        conn: &mut AsyncPgConnection,
        user_public_id: Uuid,
    ) -> PgResult<User> {
        use schema::users::dsl::*;

        users
            .filter(public_id.eq(user_public_id))
            .select(User::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }

    /// Whether any user row exists, used to gate the initial-admin seed
    /// (§4.J: "seeded only when the user table is empty").
    pub async fn any_exist(conn: &mut AsyncPgConnection) -> PgResult<bool> {
        use schema::users::dsl::*;

        let count: i64 = users.count().get_result(conn).await.map_err(PgError::from)?;
        Ok(count > 0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ApiTokenRepository;

impl ApiTokenRepository {
    pub async fn create(conn: &mut AsyncPgConnection, token: NewApiToken) -> PgResult<ApiToken> {
        use schema::api_tokens;

        diesel::insert_into(api_tokens::table)
            .values(&token)
            .returning(ApiToken::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    /// Looks up the owning user for an opaque bearer token's SHA-256 hash
    /// (§6: "the server stores only SHA-256 of the token").
    pub async fn find_user_by_token_hash(
        conn: &mut AsyncPgConnection,
        token_hash_value: &str,
    ) -> PgResult<User> {
        use schema::{api_tokens, users};

        users::table
            .inner_join(api_tokens::table.on(api_tokens::user_id.eq(users::id)))
            .filter(api_tokens::token_hash.eq(token_hash_value))
            .select(User::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(PgError::from)?
            .ok_or(PgError::NotFound)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BlacklistTokenRepository;

impl BlacklistTokenRepository {
    /// Records a logged-out token's hash (§6 `POST /auth/logout`).
    pub async fn create(
        conn: &mut AsyncPgConnection,
        token: NewBlacklistToken,
    ) -> PgResult<BlacklistToken> {
        use schema::blacklist_tokens;

        diesel::insert_into(blacklist_tokens::table)
            .values(&token)
            .returning(BlacklistToken::as_returning())
            .get_result(conn)
            .await
            .map_err(PgError::from)
    }

    pub async fn is_blacklisted(
        conn: &mut AsyncPgConnection,
        token_hash_value: &str,
    ) -> PgResult<bool> {
        use schema::blacklist_tokens::dsl::*;

        let count: i64 = blacklist_tokens
            .filter(token_hash.eq(token_hash_value))
            .count()
            .get_result(conn)
            .await
            .map_err(PgError::from)?;
        Ok(count > 0)
    }

    /// Deletes blacklist entries older than `retention_window` relative to
    /// `now` — the fixed-cadence janitor in §5.
    pub async fn delete_expired(
        conn: &mut AsyncPgConnection,
        now: Timestamp,
        retention_window: jiff::SignedDuration,
    ) -> PgResult<usize> {
        use schema::blacklist_tokens::dsl::*;

        let cutoff_jiff = jiff::Timestamp::from(now) - retention_window;
        let cutoff = Timestamp::from(cutoff_jiff);

        diesel::delete(blacklist_tokens.filter(blacklisted_on.lt(cutoff)))
            .execute(conn)
            .await
            .map_err(PgError::from)
    }
}
