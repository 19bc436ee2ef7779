use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

pub const UNIDADES_MEDIDA: [&str; 5] = ["kg", "litros", "unidades", "gramos", "ml"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingrediente {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub unidad_medida: String,
    pub costo_unitario: Option<f64>,
    pub activo: bool,
}

const COLS: &str = "id, nombre, descripcion, unidad_medida, costo_unitario, activo";

impl Ingrediente {
    pub async fn list_active(db: &PgPool) -> anyhow::Result<Vec<Ingrediente>> {
        let rows = sqlx::query_as::<_, Ingrediente>(&format!(
            "SELECT {COLS} FROM ingredientes WHERE activo = TRUE ORDER BY nombre ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_active_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Ingrediente>> {
        let row = sqlx::query_as::<_, Ingrediente>(&format!(
            "SELECT {COLS} FROM ingredientes WHERE id = $1 AND activo = TRUE"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Lookup by name including inactive rows, so a re-created ingredient
    /// reactivates instead of duplicating.
    pub async fn find_by_nombre(db: &PgPool, nombre: &str) -> anyhow::Result<Option<Ingrediente>> {
        let row = sqlx::query_as::<_, Ingrediente>(&format!(
            "SELECT {COLS} FROM ingredientes WHERE nombre = $1"
        ))
        .bind(nombre)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn insert(
        db: &PgPool,
        nombre: &str,
        descripcion: Option<&str>,
        unidad_medida: &str,
        costo_unitario: Option<f64>,
    ) -> anyhow::Result<Ingrediente> {
        let row = sqlx::query_as::<_, Ingrediente>(&format!(
            "INSERT INTO ingredientes (nombre, descripcion, unidad_medida, costo_unitario) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLS}"
        ))
        .bind(nombre)
        .bind(descripcion)
        .bind(unidad_medida)
        .bind(costo_unitario)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(db: &PgPool, i: &Ingrediente) -> anyhow::Result<Option<Ingrediente>> {
        let row = sqlx::query_as::<_, Ingrediente>(&format!(
            "UPDATE ingredientes SET nombre = $1, descripcion = $2, unidad_medida = $3, \
             costo_unitario = $4, activo = $5 \
             WHERE id = $6 \
             RETURNING {COLS}"
        ))
        .bind(&i.nombre)
        .bind(&i.descripcion)
        .bind(&i.unidad_medida)
        .bind(i.costo_unitario)
        .bind(i.activo)
        .bind(i.id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn deactivate(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE ingredientes SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_hard(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM ingredientes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
