use serde::{Deserialize, Serialize};

use crate::fotos::repo_types::Foto;

/// Aggregate storage statistics across every product photo.
#[derive(Debug, Serialize)]
pub struct FotoEstadisticas {
    pub total_fotos: i64,
    pub tamano_total_bytes: i64,
    pub tamano_total_mb: f64,
    pub promedio_kb: f64,
    pub foto_mas_grande_bytes: i64,
    pub foto_mas_pequena_bytes: i64,
}

impl FotoEstadisticas {
    pub fn from_aggregates(raw: (i64, i64, f64, i64, i64)) -> Self {
        let (total_fotos, tamano_total_bytes, promedio_bytes, mas_grande, mas_pequena) = raw;
        Self {
            total_fotos,
            tamano_total_bytes,
            tamano_total_mb: tamano_total_bytes as f64 / (1024.0 * 1024.0),
            promedio_kb: promedio_bytes / 1024.0,
            foto_mas_grande_bytes: mas_grande,
            foto_mas_pequena_bytes: mas_pequena,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReordenarRequest {
    pub orden: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubirFotoResponse {
    pub success: bool,
    pub message: String,
    pub data: Foto,
}

#[derive(Debug, Serialize)]
pub struct LimpiarResponse {
    pub success: bool,
    pub message: String,
    pub eliminados: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn estadisticas_conversions() {
        let stats = FotoEstadisticas::from_aggregates((4, 4 * 1024 * 1024, 1024.0, 3_000_000, 10));
        assert_eq!(stats.total_fotos, 4);
        assert_eq!(stats.tamano_total_mb, 4.0);
        assert_eq!(stats.promedio_kb, 1.0);
        assert_eq!(stats.foto_mas_grande_bytes, 3_000_000);
        assert_eq!(stats.foto_mas_pequena_bytes, 10);
    }

    #[test]
    fn estadisticas_empty_table() {
        let stats = FotoEstadisticas::from_aggregates((0, 0, 0.0, 0, 0));
        assert_eq!(stats.total_fotos, 0);
        assert_eq!(stats.tamano_total_mb, 0.0);
        assert_eq!(stats.promedio_kb, 0.0);
    }

    #[test]
    fn foto_serializes_wire_fields() {
        let foto = Foto {
            id: 7,
            producto_id: 3,
            nombre_archivo: "torta.jpg".into(),
            storage_key: "productos/abc.jpg".into(),
            url_publica: "http://localhost:3000/uploads/productos/abc.jpg".into(),
            tamano_bytes: 1234,
            mimetype: "image/jpeg".into(),
            ancho_px: None,
            alto_px: None,
            es_principal: true,
            orden: 1,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&foto).unwrap();
        assert_eq!(json["es_principal"], true);
        assert_eq!(json["producto_id"], 3);
        assert_eq!(json["orden"], 1);
    }
}
