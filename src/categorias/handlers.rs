use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::categorias::repo::Categoria;
use crate::config::DeleteMode;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoria {
    #[serde(default)]
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoria {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categorias", get(list).post(create))
        .route(
            "/categorias/:id",
            get(get_by_id).put(update).delete(remove),
        )
}

fn map_dup(e: sqlx::Error) -> ApiError {
    if e.as_database_error()
        .is_some_and(|d| d.is_unique_violation())
    {
        ApiError::Conflict("Ya existe una categoría con ese nombre".into())
    } else {
        e.into()
    }
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Categoria>>, ApiError> {
    Ok(Json(Categoria::list(&state.db).await?))
}

#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Categoria>, ApiError> {
    let categoria = Categoria::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Categoría no encontrada".into()))?;
    Ok(Json(categoria))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(payload): Json<CreateCategoria>,
) -> Result<(StatusCode, Json<Categoria>), ApiError> {
    if payload.nombre.trim().is_empty() {
        return Err(ApiError::Validation("El campo nombre es obligatorio".into()));
    }

    let categoria = Categoria::insert(
        &state.db,
        payload.nombre.trim(),
        payload.descripcion.as_deref(),
    )
    .await
    .map_err(map_dup)?;
    Ok((StatusCode::CREATED, Json(categoria)))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCategoria>,
) -> Result<Json<Categoria>, ApiError> {
    let existing = Categoria::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Categoría no encontrada para actualizar".into()))?;

    let merged = Categoria {
        id: existing.id,
        nombre: payload.nombre.unwrap_or(existing.nombre),
        descripcion: payload.descripcion.or(existing.descripcion),
        activo: payload.activo.unwrap_or(existing.activo),
    };

    let categoria = Categoria::update(&state.db, &merged).await.map_err(map_dup)?;
    Ok(Json(categoria))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = match state.config.delete_policy.categorias {
        DeleteMode::Soft => Categoria::deactivate(&state.db, id).await?,
        DeleteMode::Hard => Categoria::delete_hard(&state.db, id).await?,
    };
    if !removed {
        return Err(ApiError::NotFound("Categoría no encontrada para eliminar".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
