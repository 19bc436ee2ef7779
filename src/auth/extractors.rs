use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::{Claims, Rol};
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
}

/// Required gate: missing token is 401, a present-but-invalid one is 403.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthenticated("Token no proporcionado".into()))?;

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => {
                warn!("invalid or expired access token");
                Err(ApiError::Forbidden("Token inválido o expirado".into()))
            }
        }
    }
}

/// Optional gate: a missing or invalid token proceeds anonymously.
pub struct OptionalAuthUser(pub Option<Claims>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let claims = bearer_token(parts).and_then(|t| keys.verify(t).ok());
        Ok(OptionalAuthUser(claims))
    }
}

/// Admin gate: required auth plus the privileged role.
#[derive(Debug)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if claims.rol != Rol::Admin {
            return Err(ApiError::Forbidden(
                "Acceso denegado. Se requiere rol de administrador".into(),
            ));
        }
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::Request;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            access_ttl_minutes: 5,
            refresh_ttl_days: 7,
        })
    }

    fn parts_with_auth(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header("Authorization", h);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() {
        let keys = keys();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn invalid_token_is_forbidden() {
        let keys = keys();
        let mut parts = parts_with_auth(Some("Bearer garbage"));
        let err = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthenticated() {
        let keys = keys();
        let mut parts = parts_with_auth(Some("Basic abc"));
        let err = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn valid_token_attaches_claims() {
        let keys = keys();
        let token = keys.sign_access(7, "a@x.com", Rol::Usuario).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "a@x.com");
    }

    #[tokio::test]
    async fn optional_auth_proceeds_anonymously() {
        let keys = keys();

        let mut parts = parts_with_auth(None);
        let OptionalAuthUser(claims) = OptionalAuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap();
        assert!(claims.is_none());

        let mut parts = parts_with_auth(Some("Bearer garbage"));
        let OptionalAuthUser(claims) = OptionalAuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap();
        assert!(claims.is_none());
    }

    #[tokio::test]
    async fn optional_auth_attaches_valid_claims() {
        let keys = keys();
        let token = keys.sign_access(9, "b@x.com", Rol::Admin).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let OptionalAuthUser(claims) = OptionalAuthUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap();
        assert_eq!(claims.unwrap().sub, 9);
    }

    #[tokio::test]
    async fn admin_gate_rejects_regular_user() {
        let keys = keys();
        let token = keys.sign_access(7, "a@x.com", Rol::Usuario).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let err = AdminUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_gate_accepts_admin() {
        let keys = keys();
        let token = keys.sign_access(1, "admin@x.com", Rol::Admin).unwrap();
        let mut parts = parts_with_auth(Some(&format!("Bearer {}", token)));
        let AdminUser(claims) = AdminUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap();
        assert_eq!(claims.rol, Rol::Admin);
    }

    #[tokio::test]
    async fn admin_gate_without_token_is_unauthenticated() {
        let keys = keys();
        let mut parts = parts_with_auth(None);
        let err = AdminUser::from_request_parts(&mut parts, &keys)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }
}
