//! Bearer token extraction.
//!
//! NO AUTH IS ENFORCED: [`UnverifiedBearerToken`] hands back whatever token
//! the client sent without checking its signature or expiry, and no route
//! requires it. Product mutations and the admin dashboard are open. Adding
//! verification is tracked as its own change.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;

/// Raw bearer token from the `Authorization` header, NOT verified.
///
/// Rejects with 401 `Not authenticated` only when the header is missing or
/// does not use the `Bearer` scheme.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(UnverifiedBearerToken(token): UnverifiedBearerToken) -> String {
///     token
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedBearerToken(pub String);

impl<S> FromRequestParts<S> for UnverifiedBearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let not_authenticated = || AppError::Unauthorized("Not authenticated".to_string());

        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(not_authenticated)?;

        let (scheme, token) = value.split_once(' ').ok_or_else(not_authenticated)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(not_authenticated());
        }

        Ok(Self(token.trim().to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn echo(UnverifiedBearerToken(token): UnverifiedBearerToken) -> String {
        token
    }

    async fn call(authorization: Option<&str>) -> (StatusCode, String) {
        let app = Router::new().route("/echo", get(echo));
        let mut request = Request::builder().uri("/echo");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_returns_raw_token_without_verifying() {
        let (status, body) = call(Some("Bearer not.a.real.jwt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "not.a.real.jwt");
    }

    #[tokio::test]
    async fn test_scheme_is_case_insensitive() {
        let (status, body) = call(Some("bearer abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "abc");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Not authenticated"));
    }

    #[tokio::test]
    async fn test_other_scheme_is_unauthorized() {
        let (status, _) = call(Some("Basic YWRtaW46YWRtaW4=")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
