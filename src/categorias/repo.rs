use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Categoria {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
}

impl Categoria {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Categoria>> {
        let rows = sqlx::query_as::<_, Categoria>(
            "SELECT id, nombre, descripcion, activo FROM categorias ORDER BY nombre ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Categoria>> {
        let row = sqlx::query_as::<_, Categoria>(
            "SELECT id, nombre, descripcion, activo FROM categorias WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn insert(
        db: &PgPool,
        nombre: &str,
        descripcion: Option<&str>,
    ) -> Result<Categoria, sqlx::Error> {
        sqlx::query_as::<_, Categoria>(
            "INSERT INTO categorias (nombre, descripcion) VALUES ($1, $2) \
             RETURNING id, nombre, descripcion, activo",
        )
        .bind(nombre)
        .bind(descripcion)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, c: &Categoria) -> Result<Categoria, sqlx::Error> {
        sqlx::query_as::<_, Categoria>(
            "UPDATE categorias SET nombre = $1, descripcion = $2, activo = $3 WHERE id = $4 \
             RETURNING id, nombre, descripcion, activo",
        )
        .bind(&c.nombre)
        .bind(&c.descripcion)
        .bind(c.activo)
        .bind(c.id)
        .fetch_one(db)
        .await
    }

    pub async fn deactivate(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE categorias SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_hard(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM categorias WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
