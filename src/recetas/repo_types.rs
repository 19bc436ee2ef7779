use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Recipe record in `recetas`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Receta {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub instrucciones: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub porciones: Option<i32>,
    pub activo: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Join row: link columns plus the ingredient catalog entry.
#[derive(Debug, Clone, FromRow)]
pub struct RecetaIngredienteRow {
    pub ingrediente_id: i64,
    pub cantidad: f64,
    pub unidad_medida: String,
    pub notas: Option<String>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub unidad_catalogo: String,
    pub costo_unitario: Option<f64>,
    pub activo: bool,
}
