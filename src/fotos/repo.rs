use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use crate::fotos::repo_types::Foto;

const FOTO_COLS: &str = "id, producto_id, nombre_archivo, storage_key, url_publica, \
                         tamano_bytes, mimetype, ancho_px, alto_px, es_principal, orden, \
                         created_at, updated_at";

/// Column values for a new photo row.
pub struct NuevaFotoRow<'a> {
    pub producto_id: i64,
    pub nombre_archivo: &'a str,
    pub storage_key: &'a str,
    pub url_publica: &'a str,
    pub tamano_bytes: i64,
    pub mimetype: &'a str,
    pub es_principal: bool,
    pub orden: i32,
}

impl Foto {
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Foto>> {
        let foto = sqlx::query_as::<_, Foto>(&format!(
            "SELECT {FOTO_COLS} FROM fotos_productos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find foto by id")?;
        Ok(foto)
    }

    /// Gallery order: principal first, then the explicit ordering index.
    pub async fn list_by_producto(db: &PgPool, producto_id: i64) -> anyhow::Result<Vec<Foto>> {
        let fotos = sqlx::query_as::<_, Foto>(&format!(
            "SELECT {FOTO_COLS} FROM fotos_productos \
             WHERE producto_id = $1 \
             ORDER BY es_principal DESC, orden ASC"
        ))
        .bind(producto_id)
        .fetch_all(db)
        .await
        .context("list fotos by producto")?;
        Ok(fotos)
    }

    pub async fn principal(db: &PgPool, producto_id: i64) -> anyhow::Result<Option<Foto>> {
        let foto = sqlx::query_as::<_, Foto>(&format!(
            "SELECT {FOTO_COLS} FROM fotos_productos \
             WHERE producto_id = $1 AND es_principal = TRUE \
             LIMIT 1"
        ))
        .bind(producto_id)
        .fetch_optional(db)
        .await
        .context("get foto principal")?;
        Ok(foto)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM fotos_productos WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("delete foto")?;
        Ok(())
    }

    pub async fn clear_principal_tx(
        tx: &mut Transaction<'_, Postgres>,
        producto_id: i64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE fotos_productos SET es_principal = FALSE, updated_at = now() \
             WHERE producto_id = $1",
        )
        .bind(producto_id)
        .execute(&mut **tx)
        .await
        .context("clear principal")?;
        Ok(())
    }

    /// Next dense ordering index for the product: MAX + 1, or 1 when empty.
    pub async fn next_orden_tx(
        tx: &mut Transaction<'_, Postgres>,
        producto_id: i64,
    ) -> anyhow::Result<i32> {
        let (orden,): (i32,) = sqlx::query_as(
            "SELECT (COALESCE(MAX(orden), 0) + 1)::int FROM fotos_productos WHERE producto_id = $1",
        )
        .bind(producto_id)
        .fetch_one(&mut **tx)
        .await
        .context("next orden")?;
        Ok(orden)
    }

    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        row: NuevaFotoRow<'_>,
    ) -> anyhow::Result<Foto> {
        let foto = sqlx::query_as::<_, Foto>(&format!(
            "INSERT INTO fotos_productos \
             (producto_id, nombre_archivo, storage_key, url_publica, tamano_bytes, \
              mimetype, es_principal, orden) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {FOTO_COLS}"
        ))
        .bind(row.producto_id)
        .bind(row.nombre_archivo)
        .bind(row.storage_key)
        .bind(row.url_publica)
        .bind(row.tamano_bytes)
        .bind(row.mimetype)
        .bind(row.es_principal)
        .bind(row.orden)
        .fetch_one(&mut **tx)
        .await
        .context("insert foto")?;
        Ok(foto)
    }

    /// One conditional statement keeps the single-principal invariant: every
    /// sibling is updated, only the target ends up TRUE.
    pub async fn set_principal(db: &PgPool, id: i64, producto_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE fotos_productos SET es_principal = (id = $1), updated_at = now() \
             WHERE producto_id = $2",
        )
        .bind(id)
        .bind(producto_id)
        .execute(db)
        .await
        .context("set principal")?;
        Ok(())
    }

    /// Dense reassignment by array position, scoped to the product; ids that
    /// do not belong to it simply match no row.
    pub async fn reorder(db: &PgPool, producto_id: i64, ids: &[i64]) -> anyhow::Result<()> {
        let mut tx = db.begin().await.context("begin reorder tx")?;
        for (i, id) in ids.iter().enumerate() {
            sqlx::query(
                "UPDATE fotos_productos SET orden = $1, updated_at = now() \
                 WHERE id = $2 AND producto_id = $3",
            )
            .bind(i as i32)
            .bind(*id)
            .bind(producto_id)
            .execute(&mut *tx)
            .await
            .context("reorder foto")?;
        }
        tx.commit().await.context("commit reorder tx")?;
        Ok(())
    }

    /// (total, suma bytes, promedio bytes, máximo, mínimo) over every photo.
    pub async fn estadisticas(db: &PgPool) -> anyhow::Result<(i64, i64, f64, i64, i64)> {
        let row = sqlx::query_as(
            "SELECT COUNT(*)::bigint, \
                    COALESCE(SUM(tamano_bytes), 0)::bigint, \
                    COALESCE(AVG(tamano_bytes), 0)::double precision, \
                    COALESCE(MAX(tamano_bytes), 0)::bigint, \
                    COALESCE(MIN(tamano_bytes), 0)::bigint \
             FROM fotos_productos",
        )
        .fetch_one(db)
        .await
        .context("foto estadisticas")?;
        Ok(row)
    }

    pub async fn storage_keys(db: &PgPool) -> anyhow::Result<Vec<String>> {
        let keys: Vec<(String,)> = sqlx::query_as("SELECT storage_key FROM fotos_productos")
            .fetch_all(db)
            .await
            .context("list storage keys")?;
        Ok(keys.into_iter().map(|(k,)| k).collect())
    }
}
