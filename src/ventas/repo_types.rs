use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venta {
    pub id: i64,
    pub fecha: OffsetDateTime,
    pub total: f64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VentaDetalle {
    pub id: i64,
    pub venta_id: i64,
    pub producto_id: i64,
    pub nombre_producto: String,
    pub cantidad: i32,
    pub precio_unitario: f64,
    pub subtotal: f64,
}
