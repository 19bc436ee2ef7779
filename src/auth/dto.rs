use serde::{Deserialize, Serialize};

use crate::auth::repo_types::Usuario;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub nombre: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for token refresh and logout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Token pair returned on register and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub usuario: Usuario,
    pub tokens: TokenPair,
    pub message: String,
}

/// Response for POST /auth/refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub access_token: String,
    pub message: String,
}

/// Response for GET /auth/me.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub usuario: Usuario,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn usuario() -> Usuario {
        Usuario {
            id: 1,
            email: "a@x.com".into(),
            password_hash: "secret-hash".into(),
            nombre: "A".into(),
            rol: "usuario".into(),
            activo: true,
            ultimo_login: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn auth_response_uses_wire_field_names() {
        let response = AuthResponse {
            success: true,
            usuario: usuario(),
            tokens: TokenPair {
                access_token: "acc".into(),
                refresh_token: "ref".into(),
            },
            message: "Login exitoso".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["usuario"]["email"], "a@x.com");
        assert_eq!(json["tokens"]["accessToken"], "acc");
        assert_eq!(json["tokens"]["refreshToken"], "ref");
    }

    #[test]
    fn password_hash_never_serialized() {
        let json = serde_json::to_string(&usuario()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret-hash"));
    }
}
