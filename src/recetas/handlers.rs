use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::config::DeleteMode;
use crate::error::ApiError;
use crate::recetas::dto::{CreateReceta, RecetaDetalle, UpdateReceta};
use crate::recetas::repo_types::Receta;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recetas", get(list).post(create))
        .route("/recetas/:id", get(get_by_id).put(update).delete(remove))
}

async fn detalle(state: &AppState, receta: Receta) -> Result<RecetaDetalle, ApiError> {
    let ingredientes = Receta::ingredientes_de(&state.db, receta.id).await?;
    Ok(RecetaDetalle::from_parts(receta, ingredientes))
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Receta>>, ApiError> {
    Ok(Json(Receta::list_active(&state.db).await?))
}

#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecetaDetalle>, ApiError> {
    let receta = Receta::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Receta no encontrada".into()))?;
    Ok(Json(detalle(&state, receta).await?))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(payload): Json<CreateReceta>,
) -> Result<(StatusCode, Json<RecetaDetalle>), ApiError> {
    if payload.nombre.trim().is_empty() {
        return Err(ApiError::Validation("El campo nombre es obligatorio".into()));
    }

    let receta = Receta::create(
        &state.db,
        payload.nombre.trim(),
        payload.descripcion.as_deref(),
        payload.instrucciones.as_deref(),
        payload.tiempo_preparacion,
        payload.porciones,
        &payload.ingredientes,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detalle(&state, receta).await?)))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateReceta>,
) -> Result<Json<RecetaDetalle>, ApiError> {
    let existing = Receta::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Receta no encontrada para actualizar".into()))?;

    let merged = Receta {
        id: existing.id,
        nombre: payload.nombre.unwrap_or(existing.nombre),
        descripcion: payload.descripcion.or(existing.descripcion),
        instrucciones: payload.instrucciones.or(existing.instrucciones),
        tiempo_preparacion: payload.tiempo_preparacion.or(existing.tiempo_preparacion),
        porciones: payload.porciones.or(existing.porciones),
        activo: payload.activo.unwrap_or(existing.activo),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    let receta = Receta::update(&state.db, &merged, payload.ingredientes.as_deref()).await?;
    Ok(Json(detalle(&state, receta).await?))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = match state.config.delete_policy.recetas {
        DeleteMode::Soft => Receta::deactivate(&state.db, id).await?,
        DeleteMode::Hard => Receta::delete_hard(&state.db, id).await?,
    };
    if !removed {
        return Err(ApiError::NotFound("Receta no encontrada para eliminar".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
