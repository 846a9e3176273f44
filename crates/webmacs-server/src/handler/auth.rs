//! Login/logout handlers (§6 `/auth/login`, `/auth/logout`).

use aide::axum::ApiRouter;
use aide::axum::routing::post_with;
use aide::transform::TransformOperation;
use axum::Json;
use axum::http::StatusCode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webmacs_data::model::NewBlacklistToken;
use webmacs_data::query::{BlacklistTokenRepository, UserRepository};

use crate::auth::{self, Claims};
use crate::error::{HttpError, Result};
use crate::extract::{AuthUser, PgPool};
use crate::state::AppState;

const TRACING_TARGET: &str = "webmacs_server::handler::auth";

#[derive(Debug, Deserialize, JsonSchema)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct LoginResponse {
    access_token: String,
    public_id: Uuid,
    username: String,
}

async fn login(
    PgPool(mut conn): PgPool,
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    let user = UserRepository::find_by_email(&mut conn, &request.email)
        .await
        .map_err(HttpError::from)?;

    let hasher = auth::PasswordHasher::new();
    let password_valid = match &user {
        Some(user) => hasher.verify_password(&request.password, &user.password_hash).is_ok(),
        None => false,
    };

    let Some(user) = user.filter(|_| password_valid) else {
        tracing::warn!(target: TRACING_TARGET, email = %request.email, "login failed");
        return Err(crate::error::reject(webmacs_core::ErrorKind::Unauthorized, "invalid email or password"));
    };

    let claims = Claims::new(user.public_id, state.config.access_token_ttl(), Some(user.role.clone()));
    let access_token = state.jwt.encode(&claims)?;

    tracing::info!(target: TRACING_TARGET, user_id = %user.public_id, "login succeeded");

    Ok((
        StatusCode::OK,
        Json(LoginResponse { access_token, public_id: user.public_id, username: user.email }),
    ))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Login").description("Authenticates a user and returns a bearer access token.").response::<200, Json<LoginResponse>>()
}

/// Inserts the presented token's hash into the blacklist (§6). Idempotent:
/// logging out an already-blacklisted token succeeds.
async fn logout(
    PgPool(mut conn): PgPool,
    axum_extra::TypedHeader(axum_extra::headers::Authorization(bearer)): axum_extra::TypedHeader<
        axum_extra::headers::Authorization<axum_extra::headers::authorization::Bearer>,
    >,
    AuthUser(_user): AuthUser,
) -> Result<StatusCode> {
    let token_hash = auth::hash_token(bearer.token());

    BlacklistTokenRepository::create(
        &mut conn,
        NewBlacklistToken {
            public_id: Uuid::new_v4(),
            token_hash,
            blacklisted_on: jiff_diesel::Timestamp::from(jiff::Timestamp::now()),
        },
    )
    .await
    .map_err(HttpError::from)?;

    Ok(StatusCode::OK)
}

fn logout_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Logout").description("Revokes the presented bearer token by blacklisting its hash.").response::<200, ()>()
}

pub fn routes() -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/auth/login", post_with(login, login_docs))
        .api_route("/auth/logout", post_with(logout, logout_docs))
        .with_path_items(|item| item.tag("Auth"))
}
