use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use crate::recetas::dto::RecetaIngredienteInput;
use crate::recetas::repo_types::{Receta, RecetaIngredienteRow};

const RECETA_COLS: &str = "id, nombre, descripcion, instrucciones, tiempo_preparacion, \
                           porciones, activo, created_at, updated_at";

impl Receta {
    pub async fn list_active(db: &PgPool) -> anyhow::Result<Vec<Receta>> {
        let rows = sqlx::query_as::<_, Receta>(&format!(
            "SELECT {RECETA_COLS} FROM recetas WHERE activo = TRUE ORDER BY nombre ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Receta>> {
        let row = sqlx::query_as::<_, Receta>(&format!(
            "SELECT {RECETA_COLS} FROM recetas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn ingredientes_de(
        db: &PgPool,
        receta_id: i64,
    ) -> anyhow::Result<Vec<RecetaIngredienteRow>> {
        let rows = sqlx::query_as::<_, RecetaIngredienteRow>(
            "SELECT ri.ingrediente_id, ri.cantidad, ri.unidad_medida, ri.notas, \
                    i.nombre, i.descripcion, i.unidad_medida AS unidad_catalogo, \
                    i.costo_unitario, i.activo \
             FROM receta_ingrediente ri \
             JOIN ingredientes i ON ri.ingrediente_id = i.id \
             WHERE ri.receta_id = $1",
        )
        .bind(receta_id)
        .fetch_all(db)
        .await
        .context("list receta ingredientes")?;
        Ok(rows)
    }

    async fn insert_links_tx(
        tx: &mut Transaction<'_, Postgres>,
        receta_id: i64,
        ingredientes: &[RecetaIngredienteInput],
    ) -> anyhow::Result<()> {
        for ing in ingredientes {
            sqlx::query(
                "INSERT INTO receta_ingrediente \
                 (receta_id, ingrediente_id, cantidad, unidad_medida, notas) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(receta_id)
            .bind(ing.ingrediente_id)
            .bind(ing.cantidad)
            .bind(&ing.unidad_medida)
            .bind(&ing.notas)
            .execute(&mut **tx)
            .await
            .context("insert receta ingrediente")?;
        }
        Ok(())
    }

    /// Parent row plus ingredient links land in one transaction.
    pub async fn create(
        db: &PgPool,
        nombre: &str,
        descripcion: Option<&str>,
        instrucciones: Option<&str>,
        tiempo_preparacion: Option<i32>,
        porciones: Option<i32>,
        ingredientes: &[RecetaIngredienteInput],
    ) -> anyhow::Result<Receta> {
        let mut tx = db.begin().await.context("begin receta tx")?;

        let receta = sqlx::query_as::<_, Receta>(&format!(
            "INSERT INTO recetas (nombre, descripcion, instrucciones, tiempo_preparacion, porciones) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {RECETA_COLS}"
        ))
        .bind(nombre)
        .bind(descripcion)
        .bind(instrucciones)
        .bind(tiempo_preparacion)
        .bind(porciones)
        .fetch_one(&mut *tx)
        .await
        .context("insert receta")?;

        Self::insert_links_tx(&mut tx, receta.id, ingredientes).await?;

        tx.commit().await.context("commit receta tx")?;
        Ok(receta)
    }

    /// Update with replace-all link strategy when `ingredientes` is given.
    pub async fn update(
        db: &PgPool,
        merged: &Receta,
        ingredientes: Option<&[RecetaIngredienteInput]>,
    ) -> anyhow::Result<Receta> {
        let mut tx = db.begin().await.context("begin receta tx")?;

        let receta = sqlx::query_as::<_, Receta>(&format!(
            "UPDATE recetas SET nombre = $1, descripcion = $2, instrucciones = $3, \
             tiempo_preparacion = $4, porciones = $5, activo = $6, updated_at = now() \
             WHERE id = $7 \
             RETURNING {RECETA_COLS}"
        ))
        .bind(&merged.nombre)
        .bind(&merged.descripcion)
        .bind(&merged.instrucciones)
        .bind(merged.tiempo_preparacion)
        .bind(merged.porciones)
        .bind(merged.activo)
        .bind(merged.id)
        .fetch_one(&mut *tx)
        .await
        .context("update receta")?;

        if let Some(ingredientes) = ingredientes {
            sqlx::query("DELETE FROM receta_ingrediente WHERE receta_id = $1")
                .bind(merged.id)
                .execute(&mut *tx)
                .await
                .context("clear receta ingredientes")?;
            Self::insert_links_tx(&mut tx, merged.id, ingredientes).await?;
        }

        tx.commit().await.context("commit receta tx")?;
        Ok(receta)
    }

    pub async fn deactivate(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE recetas SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_hard(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM recetas WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
