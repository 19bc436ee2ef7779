use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::contenido::dto::{
    ActualizarContenido, ContenidoDigital, EtiquetaInput, NuevoContenido, TIPOS_CONTENIDO,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contenido", get(list).post(create))
        .route(
            "/contenido/:id",
            get(get_by_id).put(update).delete(remove),
        )
        .route("/contenido/producto/:producto_id", get(list_by_producto))
        .route("/contenido/etiqueta/:etiqueta", get(list_by_etiqueta))
        .route("/contenido/:id/etiquetas", post(add_etiqueta))
        .route(
            "/contenido/:id/etiquetas/:etiqueta",
            delete(remove_etiqueta),
        )
}

fn validar_tipo(tipo: &str) -> Result<(), ApiError> {
    if !TIPOS_CONTENIDO.contains(&tipo) {
        return Err(ApiError::Validation(format!("Tipo inválido: {}", tipo)));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContenidoDigital>>, ApiError> {
    Ok(Json(state.contenido.list().await?))
}

#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContenidoDigital>, ApiError> {
    let item = state
        .contenido
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Imagen no encontrada".into()))?;
    Ok(Json(item))
}

#[instrument(skip(state))]
async fn list_by_producto(
    State(state): State<AppState>,
    Path(producto_id): Path<i64>,
) -> Result<Json<Vec<ContenidoDigital>>, ApiError> {
    Ok(Json(state.contenido.list_by_producto(producto_id).await?))
}

#[instrument(skip(state))]
async fn list_by_etiqueta(
    State(state): State<AppState>,
    Path(etiqueta): Path<String>,
) -> Result<Json<Vec<ContenidoDigital>>, ApiError> {
    Ok(Json(state.contenido.list_by_etiqueta(&etiqueta).await?))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(payload): Json<NuevoContenido>,
) -> Result<(StatusCode, Json<ContenidoDigital>), ApiError> {
    if payload.titulo.trim().is_empty() {
        return Err(ApiError::Validation("El campo titulo es obligatorio".into()));
    }
    if payload.url.trim().is_empty() {
        return Err(ApiError::Validation("El campo url es obligatorio".into()));
    }
    validar_tipo(&payload.tipo)?;

    let item = state.contenido.insert(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<ActualizarContenido>,
) -> Result<Json<ContenidoDigital>, ApiError> {
    if let Some(tipo) = &payload.tipo {
        validar_tipo(tipo)?;
    }

    let item = state
        .contenido
        .update(id, payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Imagen no encontrada".into()))?;
    Ok(Json(item))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.contenido.delete(id).await? {
        return Err(ApiError::NotFound("Imagen no encontrada".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
async fn add_etiqueta(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<EtiquetaInput>,
) -> Result<Json<ContenidoDigital>, ApiError> {
    if payload.etiqueta.trim().is_empty() {
        return Err(ApiError::Validation("La etiqueta no puede estar vacía".into()));
    }

    let item = state
        .contenido
        .add_etiqueta(id, payload.etiqueta.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Imagen no encontrada".into()))?;
    Ok(Json(item))
}

#[instrument(skip(state))]
async fn remove_etiqueta(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path((id, etiqueta)): Path<(i64, String)>,
) -> Result<Json<ContenidoDigital>, ApiError> {
    let item = state
        .contenido
        .remove_etiqueta(id, &etiqueta)
        .await?
        .ok_or_else(|| ApiError::NotFound("Imagen no encontrada".into()))?;
    Ok(Json(item))
}
