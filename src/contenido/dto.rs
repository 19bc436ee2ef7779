use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const TIPOS_CONTENIDO: [&str; 2] = ["imagen", "video"];

/// Digital content entry: marketing imagery or video attached to the
/// catalog, tagged for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContenidoDigital {
    pub id: i64,
    pub producto_id: Option<i64>,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub url: String,
    pub tipo: String, // 'imagen' | 'video'
    pub etiquetas: Vec<String>,
    pub tamano_bytes: Option<i64>,
    pub fecha_subida: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoContenido {
    pub producto_id: Option<i64>,
    #[serde(default)]
    pub titulo: String,
    pub descripcion: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub etiquetas: Vec<String>,
    pub tamano_bytes: Option<i64>,
}

/// Partial update; absent fields keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarContenido {
    pub producto_id: Option<i64>,
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub url: Option<String>,
    pub tipo: Option<String>,
    pub etiquetas: Option<Vec<String>>,
    pub tamano_bytes: Option<i64>,
}

impl ActualizarContenido {
    pub fn aplicar(self, existing: &ContenidoDigital) -> ContenidoDigital {
        ContenidoDigital {
            id: existing.id,
            producto_id: self.producto_id.or(existing.producto_id),
            titulo: self.titulo.unwrap_or_else(|| existing.titulo.clone()),
            descripcion: self.descripcion.or_else(|| existing.descripcion.clone()),
            url: self.url.unwrap_or_else(|| existing.url.clone()),
            tipo: self.tipo.unwrap_or_else(|| existing.tipo.clone()),
            etiquetas: self.etiquetas.unwrap_or_else(|| existing.etiquetas.clone()),
            tamano_bytes: self.tamano_bytes.or(existing.tamano_bytes),
            fecha_subida: existing.fecha_subida,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EtiquetaInput {
    #[serde(default)]
    pub etiqueta: String,
}
