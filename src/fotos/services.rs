use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::fotos::dto::FotoEstadisticas;
use crate::fotos::repo::NuevaFotoRow;
use crate::fotos::repo_types::Foto;
use crate::productos::repo_types::Producto;
use crate::state::AppState;

const MAX_TAMANO_BYTES: usize = 5 * 1024 * 1024;
const TIPOS_PERMITIDOS: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// An uploaded file, already read off the multipart stream.
pub struct ArchivoSubido {
    pub nombre_archivo: String,
    pub bytes: Bytes,
    pub mimetype: String,
}

/// Runs before any storage or database I/O.
pub fn validar_archivo(archivo: &ArchivoSubido) -> Result<(), ApiError> {
    if !TIPOS_PERMITIDOS.contains(&archivo.mimetype.as_str()) {
        return Err(ApiError::Validation(format!(
            "Tipo de archivo no permitido: {}",
            archivo.mimetype
        )));
    }
    if archivo.bytes.len() > MAX_TAMANO_BYTES {
        return Err(ApiError::Validation("El archivo supera el máximo de 5MB".into()));
    }
    Ok(())
}

fn ext_para_mime(mimetype: &str) -> Option<&'static str> {
    match mimetype {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

pub async fn subir_foto(
    state: &AppState,
    producto_id: i64,
    archivo: ArchivoSubido,
    es_principal: bool,
) -> Result<Foto, ApiError> {
    validar_archivo(&archivo)?;

    if !Producto::exists(&state.db, producto_id).await? {
        return Err(ApiError::NotFound("Producto no encontrado".into()));
    }

    let ext = ext_para_mime(&archivo.mimetype).unwrap_or("bin");
    let key = format!("productos/{}.{}", Uuid::new_v4(), ext);
    let tamano_bytes = archivo.bytes.len() as i64;

    let stored = state
        .storage
        .put_object(&key, archivo.bytes, &archivo.mimetype)
        .await?;

    // Clear-then-set and the orden computation run in one transaction; at
    // most one principal per product is observable at any point.
    let mut tx = state.db.begin().await.map_err(anyhow::Error::from)?;
    if es_principal {
        Foto::clear_principal_tx(&mut tx, producto_id).await?;
    }
    let orden = Foto::next_orden_tx(&mut tx, producto_id).await?;
    let foto = Foto::insert_tx(
        &mut tx,
        NuevaFotoRow {
            producto_id,
            nombre_archivo: &archivo.nombre_archivo,
            storage_key: &stored.key,
            url_publica: &stored.public_url,
            tamano_bytes,
            mimetype: &archivo.mimetype,
            es_principal,
            orden,
        },
    )
    .await?;
    tx.commit().await.map_err(anyhow::Error::from)?;

    info!(foto_id = foto.id, producto_id, "foto subida");
    Ok(foto)
}

pub async fn eliminar_foto(state: &AppState, id: i64) -> Result<(), ApiError> {
    let foto = Foto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Foto no encontrada".into()))?;

    // Best-effort: a missing asset must not block removing the row.
    if let Err(e) = state.storage.delete_object(&foto.storage_key).await {
        warn!(error = %e, key = %foto.storage_key, "no se pudo borrar el archivo");
    }

    Foto::delete(&state.db, id).await?;
    info!(foto_id = id, "foto eliminada");
    Ok(())
}

pub async fn establecer_principal(state: &AppState, id: i64) -> Result<(), ApiError> {
    let foto = Foto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Foto no encontrada".into()))?;

    Foto::set_principal(&state.db, id, foto.producto_id).await?;
    Ok(())
}

pub async fn reordenar(state: &AppState, producto_id: i64, ids: &[i64]) -> Result<(), ApiError> {
    Foto::reorder(&state.db, producto_id, ids).await?;
    Ok(())
}

pub async fn estadisticas(state: &AppState) -> Result<FotoEstadisticas, ApiError> {
    let raw = Foto::estadisticas(&state.db).await?;
    Ok(FotoEstadisticas::from_aggregates(raw))
}

/// Delete physically present files with no matching row. Only pruning
/// backends (the local filesystem one) support this.
pub async fn limpiar_huerfanos(state: &AppState) -> Result<u64, ApiError> {
    if !state.storage.supports_pruning() {
        return Err(ApiError::Validation(
            "No disponible con almacenamiento remoto".into(),
        ));
    }

    let en_bd: std::collections::HashSet<String> =
        Foto::storage_keys(&state.db).await?.into_iter().collect();

    let mut eliminados = 0u64;
    for key in state.storage.list_keys().await? {
        if !en_bd.contains(&key) {
            if let Err(e) = state.storage.delete_object(&key).await {
                warn!(error = %e, key = %key, "no se pudo borrar el huérfano");
            } else {
                eliminados += 1;
            }
        }
    }

    info!(eliminados, "limpieza de huérfanos completada");
    Ok(eliminados)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archivo(mimetype: &str, len: usize) -> ArchivoSubido {
        ArchivoSubido {
            nombre_archivo: "foto.bin".into(),
            bytes: Bytes::from(vec![0u8; len]),
            mimetype: mimetype.into(),
        }
    }

    #[test]
    fn validar_acepta_tipos_permitidos() {
        for mime in ["image/jpeg", "image/png", "image/webp", "image/gif"] {
            assert!(validar_archivo(&archivo(mime, 1024)).is_ok());
        }
    }

    #[test]
    fn validar_rechaza_tipo_no_permitido() {
        let err = validar_archivo(&archivo("application/pdf", 1024)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn validar_rechaza_archivo_grande() {
        let err = validar_archivo(&archivo("image/png", 5 * 1024 * 1024 + 1)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn validar_acepta_exactamente_5mb() {
        assert!(validar_archivo(&archivo("image/png", 5 * 1024 * 1024)).is_ok());
    }

    #[test]
    fn ext_mapping() {
        assert_eq!(ext_para_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_para_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_para_mime("image/png"), Some("png"));
        assert_eq!(ext_para_mime("image/webp"), Some("webp"));
        assert_eq!(ext_para_mime("image/gif"), Some("gif"));
        assert_eq!(ext_para_mime("application/octet-stream"), None);
    }
}
