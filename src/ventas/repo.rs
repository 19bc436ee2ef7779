use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use crate::ventas::dto::VentaItem;
use crate::ventas::repo_types::{Venta, VentaDetalle};

const VENTA_COLS: &str = "id, fecha, total, created_at";
const DETALLE_COLS: &str =
    "id, venta_id, producto_id, nombre_producto, cantidad, precio_unitario, subtotal";

impl Venta {
    /// Sale head plus every line item in one transaction.
    pub async fn registrar(
        db: &PgPool,
        total: f64,
        productos: &[VentaItem],
    ) -> anyhow::Result<(Venta, Vec<VentaDetalle>)> {
        let mut tx = db.begin().await.context("begin venta tx")?;

        let venta = sqlx::query_as::<_, Venta>(&format!(
            "INSERT INTO ventas (total) VALUES ($1) RETURNING {VENTA_COLS}"
        ))
        .bind(total)
        .fetch_one(&mut *tx)
        .await
        .context("insert venta")?;

        let mut detalles = Vec::with_capacity(productos.len());
        for p in productos {
            let detalle = sqlx::query_as::<_, VentaDetalle>(&format!(
                "INSERT INTO venta_detalle \
                 (venta_id, producto_id, nombre_producto, cantidad, precio_unitario, subtotal) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING {DETALLE_COLS}"
            ))
            .bind(venta.id)
            .bind(p.id)
            .bind(&p.nombre)
            .bind(p.cantidad)
            .bind(p.precio)
            .bind(f64::from(p.cantidad) * p.precio)
            .fetch_one(&mut *tx)
            .await
            .context("insert venta detalle")?;
            detalles.push(detalle);
        }

        tx.commit().await.context("commit venta tx")?;
        Ok((venta, detalles))
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Venta>> {
        let row = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {VENTA_COLS} FROM ventas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Venta>> {
        let rows = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {VENTA_COLS} FROM ventas ORDER BY fecha DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_between(db: &PgPool, desde: Date, hasta: Date) -> anyhow::Result<Vec<Venta>> {
        let rows = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {VENTA_COLS} FROM ventas \
             WHERE fecha::date BETWEEN $1 AND $2 \
             ORDER BY fecha DESC"
        ))
        .bind(desde)
        .bind(hasta)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn total_between(db: &PgPool, desde: Date, hasta: Date) -> anyhow::Result<f64> {
        let (total,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total), 0)::double precision FROM ventas \
             WHERE fecha::date BETWEEN $1 AND $2",
        )
        .bind(desde)
        .bind(hasta)
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    pub async fn detalles_de(db: &PgPool, venta_id: i64) -> anyhow::Result<Vec<VentaDetalle>> {
        let rows = sqlx::query_as::<_, VentaDetalle>(&format!(
            "SELECT {DETALLE_COLS} FROM venta_detalle WHERE venta_id = $1 ORDER BY id ASC"
        ))
        .bind(venta_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
