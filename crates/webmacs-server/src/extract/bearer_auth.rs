//! Bearer-token extractor: resolves either token shape in §6 to its user,
//! caching the result in request extensions so later extractors in the
//! same request don't re-query the database.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use webmacs_data::PgClient;

use crate::auth::{self, JwtCodec};
use crate::error::HttpError;

/// The authenticated user for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub webmacs_data::model::User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Sync,
    PgClient: FromRef<S>,
    JwtCodec: FromRef<S>,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<AuthUser>() {
            return Ok(cached.clone());
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| crate::error::reject(webmacs_core::ErrorKind::Unauthorized, "missing bearer token"))?;

        let pg_client = PgClient::from_ref(state);
        let jwt_codec = JwtCodec::from_ref(state);
        let mut conn = pg_client.get_connection().await.map_err(HttpError::from)?;

        let user = auth::authenticate(&mut conn, &jwt_codec, bearer.token()).await?;

        let auth_user = AuthUser(user);
        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}

impl aide::OperationInput for AuthUser {
    fn operation_input(_ctx: &mut aide::generate::GenContext, operation: &mut aide::openapi::Operation) {
        operation.security = vec![[("BearerAuth".to_string(), vec![])].into()];
    }
}
