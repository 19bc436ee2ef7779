use lazy_static::lazy_static;
use rand::RngCore;
use regex::Regex;
use sqlx::PgPool;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::dto::TokenPair;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{RefreshToken, Usuario};
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Opaque refresh token: 64 random bytes, hex-encoded.
fn generar_refresh_token() -> String {
    let mut bytes = [0u8; 64];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Sign an access token and persist a fresh refresh token row.
///
/// Every call creates a new row, so each device holds its own session.
pub async fn issue_token_pair(
    db: &PgPool,
    keys: &JwtKeys,
    user: &Usuario,
) -> anyhow::Result<TokenPair> {
    let access_token = keys.sign_access(user.id, &user.email, user.rol())?;
    let refresh_token = generar_refresh_token();
    let expires_at =
        OffsetDateTime::now_utc() + TimeDuration::seconds(keys.refresh_ttl.as_secs() as i64);
    let row = RefreshToken::insert(db, user.id, &refresh_token, expires_at).await?;
    debug!(
        refresh_token_id = row.id,
        usuario_id = row.usuario_id,
        "refresh token persisted"
    );
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

pub async fn register(
    db: &PgPool,
    keys: &JwtKeys,
    email: &str,
    password: &str,
    nombre: &str,
) -> Result<(Usuario, TokenPair), ApiError> {
    if Usuario::find_by_email(db, email).await?.is_some() {
        warn!(email, "email already registered");
        return Err(ApiError::Validation("El email ya está registrado".into()));
    }

    let hash = hash_password(password)?;
    let user = Usuario::create(db, email, &hash, nombre).await?;
    let tokens = issue_token_pair(db, keys, &user).await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((user, tokens))
}

pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(Usuario, TokenPair), ApiError> {
    // One generic message for unknown email and wrong password.
    let invalid = || ApiError::Unauthenticated("Credenciales inválidas".into());

    let user = match Usuario::find_active_by_email(db, email).await? {
        Some(u) => u,
        None => {
            warn!(email, "login unknown or inactive email");
            return Err(invalid());
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(invalid());
    }

    Usuario::touch_ultimo_login(db, user.id).await?;
    let tokens = issue_token_pair(db, keys, &user).await?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((user, tokens))
}

/// Exchange a persisted refresh token for a new access token.
///
/// The refresh token itself is not rotated; it stays valid until its fixed
/// expiry or an explicit logout.
pub async fn refresh_access_token(
    db: &PgPool,
    keys: &JwtKeys,
    refresh_token: &str,
) -> Result<String, ApiError> {
    let user = RefreshToken::find_valid_user(db, refresh_token)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("Refresh token inválido o expirado".into()))?;

    let access_token = keys.sign_access(user.id, &user.email, user.rol())?;
    Ok(access_token)
}

pub async fn logout(db: &PgPool, refresh_token: &str) -> Result<(), ApiError> {
    RefreshToken::delete(db, refresh_token).await?;
    Ok(())
}

pub async fn sweep_expired_tokens(db: &PgPool) -> anyhow::Result<u64> {
    let swept = RefreshToken::sweep_expired(db).await?;
    if swept > 0 {
        info!(swept, "expired refresh tokens removed");
    }
    Ok(swept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_token_is_128_hex_chars() {
        let token = generar_refresh_token();
        assert_eq!(token.len(), 128);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn refresh_tokens_are_unique() {
        assert_ne!(generar_refresh_token(), generar_refresh_token());
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("nombre.apellido@dominio.com.ar"));
        assert!(!is_valid_email("sin-arroba"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("con espacios@x.com"));
        assert!(!is_valid_email(""));
    }
}
