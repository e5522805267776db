//! Token login handler.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::extract::AppForm;
use crate::services::auth::{AccessToken, AuthService};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/token", post(token))
}

/// OAuth2 password-grant form fields.
///
/// Other form fields (`grant_type`, `scope`, ...) are accepted and ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[instrument(skip(state, form), fields(username = %form.username))]
async fn token(
    State(state): State<AppState>,
    AppForm(form): AppForm<LoginForm>,
) -> Result<Json<AccessToken>, AppError> {
    let result = AuthService::new(state.pool(), state.tokens())
        .login(&form.username, &form.password)
        .await;

    match result {
        Ok(token) => {
            tracing::info!(
                expires_in_minutes = state.tokens().ttl().num_minutes(),
                "admin login succeeded"
            );
            Ok(Json(token))
        }
        Err(e) => {
            tracing::warn!(error = %e, "admin login failed");
            Err(e.into())
        }
    }
}
