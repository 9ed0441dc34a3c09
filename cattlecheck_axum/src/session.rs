use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use http::StatusCode;

use cattlecheck::User;

use crate::AppState;
use crate::error::{ApiError, IntoResponseError};

/// Authenticated caller, resolved from the bearer credential
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use cattlecheck_axum::{AppState, AuthUser};
///
/// async fn whoami(AuthUser(user): AuthUser) -> String {
///     format!("Hello, {}!", user.name)
/// }
///
/// fn app(state: AppState) -> Router {
///     Router::new().route("/whoami", get(whoami)).with_state(state)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    tracing::debug!("Missing or malformed Authorization header");
                    ApiError::new(StatusCode::UNAUTHORIZED, "No token provided")
                })?;

        let user = state
            .auth
            .authenticate(bearer.token())
            .await
            .into_response_error()?;

        Ok(AuthUser(user))
    }
}
