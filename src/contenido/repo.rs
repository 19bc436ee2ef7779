use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::contenido::dto::{ActualizarContenido, ContenidoDigital, NuevoContenido};

/// Repository seam for digital content: tests run against the in-memory
/// implementation, production against Postgres.
#[async_trait]
pub trait ContenidoRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<ContenidoDigital>>;
    async fn get(&self, id: i64) -> anyhow::Result<Option<ContenidoDigital>>;
    async fn list_by_producto(&self, producto_id: i64) -> anyhow::Result<Vec<ContenidoDigital>>;
    async fn list_by_etiqueta(&self, etiqueta: &str) -> anyhow::Result<Vec<ContenidoDigital>>;
    async fn insert(&self, data: NuevoContenido) -> anyhow::Result<ContenidoDigital>;
    async fn update(
        &self,
        id: i64,
        data: ActualizarContenido,
    ) -> anyhow::Result<Option<ContenidoDigital>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
    async fn add_etiqueta(&self, id: i64, etiqueta: &str)
        -> anyhow::Result<Option<ContenidoDigital>>;
    async fn remove_etiqueta(
        &self,
        id: i64,
        etiqueta: &str,
    ) -> anyhow::Result<Option<ContenidoDigital>>;
}

fn coincide_etiqueta(item: &ContenidoDigital, buscada: &str) -> bool {
    let buscada = buscada.to_lowercase();
    item.etiquetas
        .iter()
        .any(|e| e.to_lowercase().contains(&buscada))
}

// ---- In-memory ----

pub struct InMemoryContenidoRepo {
    items: RwLock<Vec<ContenidoDigital>>,
    next_id: AtomicI64,
}

impl InMemoryContenidoRepo {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryContenidoRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContenidoRepo for InMemoryContenidoRepo {
    async fn list(&self) -> anyhow::Result<Vec<ContenidoDigital>> {
        Ok(self.items.read().await.clone())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<ContenidoDigital>> {
        Ok(self.items.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn list_by_producto(&self, producto_id: i64) -> anyhow::Result<Vec<ContenidoDigital>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| i.producto_id == Some(producto_id))
            .cloned()
            .collect())
    }

    async fn list_by_etiqueta(&self, etiqueta: &str) -> anyhow::Result<Vec<ContenidoDigital>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| coincide_etiqueta(i, etiqueta))
            .cloned()
            .collect())
    }

    async fn insert(&self, data: NuevoContenido) -> anyhow::Result<ContenidoDigital> {
        let item = ContenidoDigital {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            producto_id: data.producto_id,
            titulo: data.titulo,
            descripcion: data.descripcion,
            url: data.url,
            tipo: data.tipo,
            etiquetas: data.etiquetas,
            tamano_bytes: data.tamano_bytes,
            fecha_subida: OffsetDateTime::now_utc(),
        };
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        id: i64,
        data: ActualizarContenido,
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                *item = data.aplicar(item);
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() < before)
    }

    async fn add_etiqueta(
        &self,
        id: i64,
        etiqueta: &str,
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                if !item.etiquetas.iter().any(|e| e == etiqueta) {
                    item.etiquetas.push(etiqueta.to_string());
                }
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove_etiqueta(
        &self,
        id: i64,
        etiqueta: &str,
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.etiquetas.retain(|e| e != etiqueta);
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }
}

// ---- Postgres ----

#[derive(Debug, FromRow)]
struct ContenidoRow {
    id: i64,
    producto_id: Option<i64>,
    titulo: String,
    descripcion: Option<String>,
    url: String,
    tipo: String,
    etiquetas: sqlx::types::Json<Vec<String>>,
    tamano_bytes: Option<i64>,
    fecha_subida: OffsetDateTime,
}

impl From<ContenidoRow> for ContenidoDigital {
    fn from(r: ContenidoRow) -> Self {
        Self {
            id: r.id,
            producto_id: r.producto_id,
            titulo: r.titulo,
            descripcion: r.descripcion,
            url: r.url,
            tipo: r.tipo,
            etiquetas: r.etiquetas.0,
            tamano_bytes: r.tamano_bytes,
            fecha_subida: r.fecha_subida,
        }
    }
}

const CONTENIDO_COLS: &str =
    "id, producto_id, titulo, descripcion, url, tipo, etiquetas, tamano_bytes, fecha_subida";

pub struct PgContenidoRepo {
    db: PgPool,
}

impl PgContenidoRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn replace_etiquetas(
        &self,
        id: i64,
        etiquetas: &[String],
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let row = sqlx::query_as::<_, ContenidoRow>(&format!(
            "UPDATE contenido_digital SET etiquetas = $1 WHERE id = $2 RETURNING {CONTENIDO_COLS}"
        ))
        .bind(sqlx::types::Json(etiquetas.to_vec()))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl ContenidoRepo for PgContenidoRepo {
    async fn list(&self) -> anyhow::Result<Vec<ContenidoDigital>> {
        let rows = sqlx::query_as::<_, ContenidoRow>(&format!(
            "SELECT {CONTENIDO_COLS} FROM contenido_digital ORDER BY fecha_subida DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<ContenidoDigital>> {
        let row = sqlx::query_as::<_, ContenidoRow>(&format!(
            "SELECT {CONTENIDO_COLS} FROM contenido_digital WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_by_producto(&self, producto_id: i64) -> anyhow::Result<Vec<ContenidoDigital>> {
        let rows = sqlx::query_as::<_, ContenidoRow>(&format!(
            "SELECT {CONTENIDO_COLS} FROM contenido_digital \
             WHERE producto_id = $1 \
             ORDER BY fecha_subida DESC"
        ))
        .bind(producto_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_etiqueta(&self, etiqueta: &str) -> anyhow::Result<Vec<ContenidoDigital>> {
        let rows = sqlx::query_as::<_, ContenidoRow>(&format!(
            "SELECT {CONTENIDO_COLS} FROM contenido_digital \
             WHERE EXISTS (SELECT 1 FROM jsonb_array_elements_text(etiquetas) e \
                           WHERE e ILIKE '%' || $1 || '%') \
             ORDER BY fecha_subida DESC"
        ))
        .bind(etiqueta)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, data: NuevoContenido) -> anyhow::Result<ContenidoDigital> {
        let row = sqlx::query_as::<_, ContenidoRow>(&format!(
            "INSERT INTO contenido_digital \
             (producto_id, titulo, descripcion, url, tipo, etiquetas, tamano_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CONTENIDO_COLS}"
        ))
        .bind(data.producto_id)
        .bind(&data.titulo)
        .bind(&data.descripcion)
        .bind(&data.url)
        .bind(&data.tipo)
        .bind(sqlx::types::Json(data.etiquetas))
        .bind(data.tamano_bytes)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: i64,
        data: ActualizarContenido,
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let existing = match self.get(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };
        let merged = data.aplicar(&existing);

        let row = sqlx::query_as::<_, ContenidoRow>(&format!(
            "UPDATE contenido_digital SET producto_id = $1, titulo = $2, descripcion = $3, \
             url = $4, tipo = $5, etiquetas = $6, tamano_bytes = $7 \
             WHERE id = $8 \
             RETURNING {CONTENIDO_COLS}"
        ))
        .bind(merged.producto_id)
        .bind(&merged.titulo)
        .bind(&merged.descripcion)
        .bind(&merged.url)
        .bind(&merged.tipo)
        .bind(sqlx::types::Json(merged.etiquetas))
        .bind(merged.tamano_bytes)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM contenido_digital WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_etiqueta(
        &self,
        id: i64,
        etiqueta: &str,
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let existing = match self.get(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };
        let mut etiquetas = existing.etiquetas;
        if !etiquetas.iter().any(|e| e == etiqueta) {
            etiquetas.push(etiqueta.to_string());
        }
        self.replace_etiquetas(id, &etiquetas).await
    }

    async fn remove_etiqueta(
        &self,
        id: i64,
        etiqueta: &str,
    ) -> anyhow::Result<Option<ContenidoDigital>> {
        let existing = match self.get(id).await? {
            Some(item) => item,
            None => return Ok(None),
        };
        let etiquetas: Vec<String> = existing
            .etiquetas
            .into_iter()
            .filter(|e| e != etiqueta)
            .collect();
        self.replace_etiquetas(id, &etiquetas).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nuevo(titulo: &str, producto_id: Option<i64>, etiquetas: &[&str]) -> NuevoContenido {
        NuevoContenido {
            producto_id,
            titulo: titulo.into(),
            descripcion: None,
            url: format!("https://cdn.local/{}.jpg", titulo),
            tipo: "imagen".into(),
            etiquetas: etiquetas.iter().map(|s| s.to_string()).collect(),
            tamano_bytes: Some(1024),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let repo = InMemoryContenidoRepo::new();
        let a = repo.insert(nuevo("a", None, &[])).await.unwrap();
        let b = repo.insert(nuevo("b", None, &[])).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_and_delete() {
        let repo = InMemoryContenidoRepo::new();
        let item = repo.insert(nuevo("torta", Some(3), &[])).await.unwrap();
        assert!(repo.get(item.id).await.unwrap().is_some());

        assert!(repo.delete(item.id).await.unwrap());
        assert!(repo.get(item.id).await.unwrap().is_none());
        // Deleting again reports nothing removed.
        assert!(!repo.delete(item.id).await.unwrap());
    }

    #[tokio::test]
    async fn filter_by_producto() {
        let repo = InMemoryContenidoRepo::new();
        repo.insert(nuevo("a", Some(1), &[])).await.unwrap();
        repo.insert(nuevo("b", Some(2), &[])).await.unwrap();
        repo.insert(nuevo("c", Some(1), &[])).await.unwrap();

        let del_uno = repo.list_by_producto(1).await.unwrap();
        assert_eq!(del_uno.len(), 2);
        assert!(del_uno.iter().all(|i| i.producto_id == Some(1)));
    }

    #[tokio::test]
    async fn filter_by_etiqueta_is_case_insensitive_substring() {
        let repo = InMemoryContenidoRepo::new();
        repo.insert(nuevo("a", None, &["Chocolate", "torta"]))
            .await
            .unwrap();
        repo.insert(nuevo("b", None, &["vainilla"])).await.unwrap();

        let found = repo.list_by_etiqueta("choco").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].titulo, "a");
    }

    #[tokio::test]
    async fn add_etiqueta_is_idempotent() {
        let repo = InMemoryContenidoRepo::new();
        let item = repo.insert(nuevo("a", None, &["torta"])).await.unwrap();

        repo.add_etiqueta(item.id, "promo").await.unwrap();
        let updated = repo.add_etiqueta(item.id, "promo").await.unwrap().unwrap();
        assert_eq!(updated.etiquetas, vec!["torta", "promo"]);
    }

    #[tokio::test]
    async fn remove_etiqueta() {
        let repo = InMemoryContenidoRepo::new();
        let item = repo
            .insert(nuevo("a", None, &["torta", "promo"]))
            .await
            .unwrap();

        let updated = repo.remove_etiqueta(item.id, "promo").await.unwrap().unwrap();
        assert_eq!(updated.etiquetas, vec!["torta"]);
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let repo = InMemoryContenidoRepo::new();
        let item = repo.insert(nuevo("viejo", Some(1), &["x"])).await.unwrap();

        let cambios = ActualizarContenido {
            titulo: Some("nuevo".into()),
            ..Default::default()
        };
        let updated = repo.update(item.id, cambios).await.unwrap().unwrap();
        assert_eq!(updated.titulo, "nuevo");
        assert_eq!(updated.producto_id, Some(1));
        assert_eq!(updated.etiquetas, vec!["x"]);
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let repo = InMemoryContenidoRepo::new();
        let result = repo.update(99, ActualizarContenido::default()).await.unwrap();
        assert!(result.is_none());
    }
}
