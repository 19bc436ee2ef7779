use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::repo_types::{RefreshToken, Usuario};

const USUARIO_COLS: &str =
    "id, email, password_hash, nombre, rol, activo, ultimo_login, created_at, updated_at";

impl Usuario {
    /// Find a user by email regardless of the active flag.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Usuario>> {
        let user = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {USUARIO_COLS} FROM usuarios WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Login lookup: only active accounts may authenticate.
    pub async fn find_active_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Usuario>> {
        let user = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {USUARIO_COLS} FROM usuarios WHERE email = $1 AND activo = TRUE"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Usuario>> {
        let user = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {USUARIO_COLS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user; role defaults to the non-privileged one.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        nombre: &str,
    ) -> anyhow::Result<Usuario> {
        let user = sqlx::query_as::<_, Usuario>(&format!(
            "INSERT INTO usuarios (email, password_hash, nombre) \
             VALUES ($1, $2, $3) \
             RETURNING {USUARIO_COLS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(nombre)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn touch_ultimo_login(db: &PgPool, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE usuarios SET ultimo_login = now(), updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

impl RefreshToken {
    pub async fn insert(
        db: &PgPool,
        usuario_id: i64,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<RefreshToken> {
        let row = sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (usuario_id, token, expires_at) VALUES ($1, $2, $3) \
             RETURNING id, usuario_id, token, expires_at, created_at",
        )
        .bind(usuario_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Resolve a refresh token to its owner: the row must be unexpired and
    /// joined to an active account.
    pub async fn find_valid_user(db: &PgPool, token: &str) -> anyhow::Result<Option<Usuario>> {
        let user = sqlx::query_as::<_, Usuario>(
            "SELECT u.id, u.email, u.password_hash, u.nombre, u.rol, u.activo, \
                    u.ultimo_login, u.created_at, u.updated_at \
             FROM refresh_tokens rt \
             INNER JOIN usuarios u ON rt.usuario_id = u.id \
             WHERE rt.token = $1 AND rt.expires_at > now() AND u.activo = TRUE",
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Idempotent: deleting a token that is already gone is not an error.
    pub async fn delete(db: &PgPool, token: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove every expired row; returns how many were swept.
    pub async fn sweep_expired(db: &PgPool) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < now()")
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
