//! JWT authentication middleware
//!
//! Protected routes are wrapped with [`auth_middleware`], which validates the
//! `Authorization: Bearer` header and inserts an [`AuthenticatedUser`] into
//! the request extensions for handlers to pick up.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::access::Actor;
use crate::domain::user::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};

/// State for the authentication middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated identity extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// The domain-level caller for permission checks.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.role)
    }
}

/// Reject requests without a valid Bearer token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(token) = header_value.and_then(|h| h.strip_prefix("Bearer ")) else {
        return auth_error_response("Missing Bearer token");
    };

    match verify_token(token, &state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response("Token expired");
            }
            let user = AuthenticatedUser {
                user_id: claims.sub,
                name: claims.name,
                role: UserRole::from_str(&claims.role),
            };
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(_) => auth_error_response("Invalid token"),
    }
}

fn auth_error_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::Service;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "parkshare".into(),
        }
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        format!("{}:{}", user.user_id, user.role)
    }

    fn app() -> Router {
        Router::new().route("/whoami", get(whoami)).layer(from_fn_with_state(
            AuthState {
                jwt_config: jwt_config(),
            },
            auth_middleware,
        ))
    }

    async fn send(token: Option<&str>) -> axum::http::Response<Body> {
        let mut builder = Request::builder().method("GET").uri("/whoami");
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        let req = builder.body(Body::empty()).unwrap();
        let mut svc = app().into_service();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let resp = send(None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let resp = send(Some("not-a-jwt")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_the_handler() {
        let token = create_token("u-1", "Kim", "provider", &jwt_config()).unwrap();
        let resp = send(Some(&token)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
