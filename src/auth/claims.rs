use serde::{Deserialize, Serialize};

/// User role carried in the access token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Usuario,
}

impl Rol {
    pub fn from_str_or_default(s: &str) -> Rol {
        match s {
            "admin" => Rol::Admin,
            _ => Rol::Usuario,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Usuario => "usuario",
        }
    }
}

/// JWT payload verified on every authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,     // user ID
    pub email: String,
    pub rol: Rol,
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rol_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rol::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Rol::Usuario).unwrap(), "\"usuario\"");
    }

    #[test]
    fn rol_roundtrips_from_column_value() {
        assert_eq!(Rol::from_str_or_default("admin"), Rol::Admin);
        assert_eq!(Rol::from_str_or_default("usuario"), Rol::Usuario);
        // Unknown roles degrade to the non-privileged one.
        assert_eq!(Rol::from_str_or_default("root"), Rol::Usuario);
    }
}
