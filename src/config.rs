use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

/// Which backend holds uploaded photo assets.
///
/// Chosen once at startup from `STORAGE_BACKEND`; no credential sniffing.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        base_dir: String,
        base_url: String,
    },
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        region: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    Soft,
    Hard,
}

impl DeleteMode {
    fn from_env(var: &str, default: DeleteMode) -> DeleteMode {
        match std::env::var(var).ok().as_deref() {
            Some("hard") => DeleteMode::Hard,
            Some("soft") => DeleteMode::Soft,
            _ => default,
        }
    }
}

/// Per-entity delete semantics, explicit instead of per-table folklore.
#[derive(Debug, Clone)]
pub struct DeletePolicy {
    pub categorias: DeleteMode,
    pub productos: DeleteMode,
    pub ingredientes: DeleteMode,
    pub recetas: DeleteMode,
}

impl DeletePolicy {
    fn from_env() -> Self {
        Self {
            categorias: DeleteMode::from_env("CATEGORIAS_DELETE", DeleteMode::Soft),
            productos: DeleteMode::from_env("PRODUCTOS_DELETE", DeleteMode::Soft),
            ingredientes: DeleteMode::from_env("INGREDIENTES_DELETE", DeleteMode::Soft),
            recetas: DeleteMode::from_env("RECETAS_DELETE", DeleteMode::Hard),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub delete_policy: DeletePolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "dulzura".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dulzura-users".into()),
            access_ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_days: std::env::var("REFRESH_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let storage = match std::env::var("STORAGE_BACKEND").as_deref() {
            Ok("s3") => StorageConfig::S3 {
                endpoint: std::env::var("S3_ENDPOINT")?,
                bucket: std::env::var("S3_BUCKET")?,
                access_key: std::env::var("S3_ACCESS_KEY")?,
                secret_key: std::env::var("S3_SECRET_KEY")?,
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            },
            _ => StorageConfig::Local {
                base_dir: std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()),
                base_url: std::env::var("BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".into()),
            },
        };

        Ok(Self {
            database_url,
            jwt,
            storage,
            delete_policy: DeletePolicy::from_env(),
        })
    }
}
