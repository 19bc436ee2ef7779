use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::claims::Rol;

/// User record in `usuarios`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // never exposed in JSON
    pub nombre: String,
    pub rol: String, // 'admin' | 'usuario'
    pub activo: bool,
    pub ultimo_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Usuario {
    pub fn rol(&self) -> Rol {
        Rol::from_str_or_default(&self.rol)
    }
}

/// Persisted refresh token; one row per issued session.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub usuario_id: i64,
    pub token: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}
