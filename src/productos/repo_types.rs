use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Product record in `productos`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Producto {
    pub id: i64,
    pub categoria_id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub costo: Option<f64>,
    pub sku: Option<String>,
    pub activo: bool,
}
