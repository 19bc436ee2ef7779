use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::error::ApiError;
use crate::fotos::dto::{FotoEstadisticas, LimpiarResponse, ReordenarRequest, SubirFotoResponse};
use crate::fotos::repo_types::Foto;
use crate::fotos::services::{self, ArchivoSubido};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/fotos/upload",
            post(subir_foto).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
        .route("/fotos/producto/:producto_id", get(fotos_de_producto))
        .route(
            "/fotos/producto/:producto_id/principal",
            get(foto_principal),
        )
        .route(
            "/fotos/producto/:producto_id/reordenar",
            put(reordenar_fotos),
        )
        .route("/fotos/:foto_id/principal", put(establecer_principal))
        .route("/fotos/:foto_id", delete(eliminar_foto))
        .route("/fotos/estadisticas", get(estadisticas))
        .route("/fotos/limpiar-huerfanos", post(limpiar_huerfanos))
}

#[instrument(skip(state, mp))]
async fn subir_foto(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    mut mp: Multipart,
) -> Result<Json<SubirFotoResponse>, ApiError> {
    let mut archivo: Option<ArchivoSubido> = None;
    let mut producto_id: Option<i64> = None;
    let mut es_principal = false;

    while let Ok(Some(field)) = mp.next_field().await {
        match field.name().map(str::to_string).as_deref() {
            Some("foto") => {
                let nombre_archivo = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "foto".into());
                let mimetype = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                archivo = Some(ArchivoSubido {
                    nombre_archivo,
                    bytes,
                    mimetype,
                });
            }
            Some("producto_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                producto_id = text.trim().parse::<i64>().ok();
            }
            Some("es_principal") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                es_principal = text == "true" || text == "1";
            }
            _ => {}
        }
    }

    let archivo = archivo
        .ok_or_else(|| ApiError::Validation("No se proporcionó ningún archivo".into()))?;
    let producto_id =
        producto_id.ok_or_else(|| ApiError::Validation("Falta el ID del producto".into()))?;

    let foto = services::subir_foto(&state, producto_id, archivo, es_principal).await?;

    Ok(Json(SubirFotoResponse {
        success: true,
        message: "Foto subida correctamente".into(),
        data: foto,
    }))
}

#[instrument(skip(state))]
async fn fotos_de_producto(
    State(state): State<AppState>,
    Path(producto_id): Path<i64>,
) -> Result<Json<Vec<Foto>>, ApiError> {
    let fotos = Foto::list_by_producto(&state.db, producto_id).await?;
    Ok(Json(fotos))
}

#[instrument(skip(state))]
async fn foto_principal(
    State(state): State<AppState>,
    Path(producto_id): Path<i64>,
) -> Result<Json<Foto>, ApiError> {
    let foto = Foto::principal(&state.db, producto_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No se encontró foto principal".into()))?;
    Ok(Json(foto))
}

#[instrument(skip(state))]
async fn establecer_principal(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(foto_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    services::establecer_principal(&state, foto_id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Foto establecida como principal" }),
    ))
}

#[instrument(skip(state))]
async fn eliminar_foto(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(foto_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    services::eliminar_foto(&state, foto_id).await?;
    Ok(Json(
        json!({ "success": true, "message": "Foto eliminada correctamente" }),
    ))
}

#[instrument(skip(state, payload))]
async fn reordenar_fotos(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(producto_id): Path<i64>,
    Json(payload): Json<ReordenarRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    services::reordenar(&state, producto_id, &payload.orden).await?;
    Ok(Json(json!({ "success": true, "message": "Orden actualizado" })))
}

#[instrument(skip(state))]
async fn estadisticas(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<FotoEstadisticas>, ApiError> {
    let stats = services::estadisticas(&state).await?;
    Ok(Json(stats))
}

#[instrument(skip(state))]
async fn limpiar_huerfanos(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<LimpiarResponse>, ApiError> {
    let eliminados = services::limpiar_huerfanos(&state).await?;
    Ok(Json(LimpiarResponse {
        success: true,
        message: format!("Eliminados {} archivos", eliminados),
        eliminados,
    }))
}
