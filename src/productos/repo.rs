use sqlx::PgPool;

use crate::productos::repo_types::Producto;

const PRODUCTO_COLS: &str = "id, categoria_id, nombre, descripcion, precio, costo, sku, activo";

impl Producto {
    pub async fn list_active(db: &PgPool) -> anyhow::Result<Vec<Producto>> {
        let rows = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {PRODUCTO_COLS} FROM productos WHERE activo = TRUE ORDER BY nombre ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Admin listing: inactive products included.
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Producto>> {
        let rows = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {PRODUCTO_COLS} FROM productos ORDER BY nombre ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_categoria(db: &PgPool, categoria_id: i64) -> anyhow::Result<Vec<Producto>> {
        let rows = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {PRODUCTO_COLS} FROM productos \
             WHERE categoria_id = $1 AND activo = TRUE \
             ORDER BY nombre ASC"
        ))
        .bind(categoria_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Producto>> {
        let row = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {PRODUCTO_COLS} FROM productos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn exists(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM productos WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row.is_some())
    }

    pub async fn insert(
        db: &PgPool,
        categoria_id: i64,
        nombre: &str,
        descripcion: Option<&str>,
        precio: f64,
        costo: Option<f64>,
        sku: Option<&str>,
    ) -> anyhow::Result<Producto> {
        let row = sqlx::query_as::<_, Producto>(&format!(
            "INSERT INTO productos (categoria_id, nombre, descripcion, precio, costo, sku) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PRODUCTO_COLS}"
        ))
        .bind(categoria_id)
        .bind(nombre)
        .bind(descripcion)
        .bind(precio)
        .bind(costo)
        .bind(sku)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Full-row update; callers merge partial input first.
    pub async fn update(db: &PgPool, p: &Producto) -> anyhow::Result<Producto> {
        let row = sqlx::query_as::<_, Producto>(&format!(
            "UPDATE productos SET categoria_id = $1, nombre = $2, descripcion = $3, \
             precio = $4, costo = $5, sku = $6, activo = $7 \
             WHERE id = $8 \
             RETURNING {PRODUCTO_COLS}"
        ))
        .bind(p.categoria_id)
        .bind(&p.nombre)
        .bind(&p.descripcion)
        .bind(p.precio)
        .bind(p.costo)
        .bind(&p.sku)
        .bind(p.activo)
        .bind(p.id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn deactivate(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE productos SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_hard(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
