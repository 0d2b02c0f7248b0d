//! HS256 bearer-token middleware. Session tokens come from the external
//! identity provider; this service only validates them.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use models_estate::response::ErrorResponse;
use models_estate::user::UserContext;
use std::sync::Arc;
use uuid::Uuid;

/// the claims this service reads from a session token
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Claims {
    /// the authenticated user id
    pub sub: Uuid,
    #[allow(dead_code)]
    pub exp: usize,
}

/// Shared decoder state for the auth middleware.
#[derive(Clone)]
pub struct JwtDecoder {
    key: Arc<DecodingKey>,
    validation: Validation,
}

impl JwtDecoder {
    /// build a decoder over the shared HS256 secret
    pub fn new(secret: &str) -> Self {
        JwtDecoder {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub(crate) fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Ok(jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)?.claims)
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse { message })).into_response()
}

/// Requires a valid session token and inserts a [UserContext] extension.
pub async fn require_user(
    State(jwt): State<JwtDecoder>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = bearer_token(&req) else {
        return Err(unauthorized("unauthorized"));
    };

    let claims = jwt.decode(token).map_err(|e| {
        if matches!(e.kind(), ErrorKind::ExpiredSignature) {
            unauthorized("jwt expired")
        } else {
            tracing::trace!(error = ?e, "unable to decode jwt");
            unauthorized("unauthorized")
        }
    })?;

    req.extensions_mut().insert(UserContext {
        user_id: claims.sub,
    });
    Ok(next.run(req).await)
}

/// Attempts to decode the token and attach the user to the request
/// context. Anonymous or bad-token requests simply proceed without one.
pub async fn attach_user(State(jwt): State<JwtDecoder>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(&req) {
        match jwt.decode(token) {
            Ok(claims) => {
                req.extensions_mut().insert(UserContext {
                    user_id: claims.sub,
                });
            }
            Err(e) => {
                tracing::trace!(error = ?e, "ignoring undecodable jwt");
            }
        }
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_for(secret: &str, sub: Uuid, exp: usize) -> String {
        #[derive(serde::Serialize)]
        struct OutClaims {
            sub: Uuid,
            exp: usize,
        }
        encode(
            &Header::new(Algorithm::HS256),
            &OutClaims { sub, exp },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn decodes_a_valid_token() {
        let user = Uuid::new_v4();
        let token = token_for("secret", user, far_future());
        let claims = JwtDecoder::new("secret").decode(&token).unwrap();
        assert_eq!(claims.sub, user);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = token_for("secret", Uuid::new_v4(), far_future());
        assert!(JwtDecoder::new("other").decode(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = token_for("secret", Uuid::new_v4(), 1_000);
        let err = JwtDecoder::new("secret").decode(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }
}
