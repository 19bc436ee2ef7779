use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Photo record in `fotos_productos`.
///
/// `storage_key` is the backend locator (relative path on disk, object key
/// on S3); `url_publica` is what clients embed. At most one row per product
/// carries `es_principal = TRUE`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Foto {
    pub id: i64,
    pub producto_id: i64,
    pub nombre_archivo: String,
    pub storage_key: String,
    pub url_publica: String,
    pub tamano_bytes: i64,
    pub mimetype: String,
    pub ancho_px: Option<i32>,
    pub alto_px: Option<i32>,
    pub es_principal: bool,
    pub orden: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
