use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ingredientes::repo::Ingrediente;
use crate::recetas::repo_types::{Receta, RecetaIngredienteRow};

/// Ingredient line inside a recipe response, with the catalog entry nested.
#[derive(Debug, Serialize)]
pub struct RecetaIngrediente {
    pub ingrediente_id: i64,
    pub cantidad: f64,
    pub unidad_medida: String,
    pub notas: Option<String>,
    pub ingrediente: Ingrediente,
}

impl From<RecetaIngredienteRow> for RecetaIngrediente {
    fn from(r: RecetaIngredienteRow) -> Self {
        Self {
            ingrediente_id: r.ingrediente_id,
            cantidad: r.cantidad,
            unidad_medida: r.unidad_medida,
            notas: r.notas,
            ingrediente: Ingrediente {
                id: r.ingrediente_id,
                nombre: r.nombre,
                descripcion: r.descripcion,
                unidad_medida: r.unidad_catalogo,
                costo_unitario: r.costo_unitario,
                activo: r.activo,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecetaDetalle {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub instrucciones: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub porciones: Option<i32>,
    pub activo: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub ingredientes: Vec<RecetaIngrediente>,
}

impl RecetaDetalle {
    pub fn from_parts(receta: Receta, rows: Vec<RecetaIngredienteRow>) -> Self {
        Self {
            id: receta.id,
            nombre: receta.nombre,
            descripcion: receta.descripcion,
            instrucciones: receta.instrucciones,
            tiempo_preparacion: receta.tiempo_preparacion,
            porciones: receta.porciones,
            activo: receta.activo,
            created_at: receta.created_at,
            updated_at: receta.updated_at,
            ingredientes: rows.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ingredient line in create/update payloads.
#[derive(Debug, Deserialize)]
pub struct RecetaIngredienteInput {
    pub ingrediente_id: i64,
    pub cantidad: f64,
    pub unidad_medida: String,
    pub notas: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReceta {
    #[serde(default)]
    pub nombre: String,
    pub descripcion: Option<String>,
    pub instrucciones: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub porciones: Option<i32>,
    #[serde(default)]
    pub ingredientes: Vec<RecetaIngredienteInput>,
}

/// Partial update; a present `ingredientes` list replaces every link.
#[derive(Debug, Deserialize)]
pub struct UpdateReceta {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub instrucciones: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub porciones: Option<i32>,
    pub activo: Option<bool>,
    pub ingredientes: Option<Vec<RecetaIngredienteInput>>,
}
