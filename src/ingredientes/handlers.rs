use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::config::DeleteMode;
use crate::error::ApiError;
use crate::ingredientes::repo::{Ingrediente, UNIDADES_MEDIDA};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredienteInput {
    #[serde(default)]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[serde(default)]
    pub unidad_medida: String,
    pub costo_unitario: Option<f64>,
    pub activo: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingredientes", get(list).post(create))
        .route(
            "/ingredientes/:id",
            get(get_by_id).put(update).delete(remove),
        )
}

fn validar(payload: &IngredienteInput) -> Result<(), ApiError> {
    if payload.nombre.trim().is_empty() {
        return Err(ApiError::Validation("El campo nombre es obligatorio".into()));
    }
    if !UNIDADES_MEDIDA.contains(&payload.unidad_medida.as_str()) {
        return Err(ApiError::Validation(format!(
            "Unidad de medida inválida: {}",
            payload.unidad_medida
        )));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Ingrediente>>, ApiError> {
    Ok(Json(Ingrediente::list_active(&state.db).await?))
}

#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ingrediente>, ApiError> {
    let ingrediente = Ingrediente::find_active_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingrediente no encontrado".into()))?;
    Ok(Json(ingrediente))
}

/// Create with reactivation: an existing name (even inactive) is updated
/// and reactivated instead of inserted twice.
#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<IngredienteInput>,
) -> Result<(StatusCode, Json<Ingrediente>), ApiError> {
    validar(&payload)?;
    let nombre = payload.nombre.trim().to_string();

    if let Some(existing) = Ingrediente::find_by_nombre(&state.db, &nombre).await? {
        let merged = Ingrediente {
            id: existing.id,
            nombre,
            descripcion: payload.descripcion,
            unidad_medida: payload.unidad_medida,
            costo_unitario: payload.costo_unitario,
            activo: payload.activo.unwrap_or(true),
        };
        let ingrediente = Ingrediente::update(&state.db, &merged)
            .await?
            .ok_or_else(|| ApiError::NotFound("Ingrediente no encontrado".into()))?;
        return Ok((StatusCode::OK, Json(ingrediente)));
    }

    let ingrediente = Ingrediente::insert(
        &state.db,
        &nombre,
        payload.descripcion.as_deref(),
        &payload.unidad_medida,
        payload.costo_unitario,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ingrediente)))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<IngredienteInput>,
) -> Result<Json<Ingrediente>, ApiError> {
    validar(&payload)?;

    let merged = Ingrediente {
        id,
        nombre: payload.nombre.trim().to_string(),
        descripcion: payload.descripcion,
        unidad_medida: payload.unidad_medida,
        costo_unitario: payload.costo_unitario,
        activo: payload.activo.unwrap_or(true),
    };

    let ingrediente = Ingrediente::update(&state.db, &merged)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ingrediente no encontrado".into()))?;
    Ok(Json(ingrediente))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = match state.config.delete_policy.ingredientes {
        DeleteMode::Soft => Ingrediente::deactivate(&state.db, id).await?,
        DeleteMode::Hard => Ingrediente::delete_hard(&state.db, id).await?,
    };
    if !removed {
        return Err(ApiError::NotFound("Ingrediente no encontrado".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
