use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::config::DeleteMode;
use crate::error::ApiError;
use crate::productos::dto::{CreateProducto, UpdateProducto};
use crate::productos::repo_types::Producto;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/productos", get(list).post(create))
        .route("/productos/admin", get(list_admin))
        .route("/productos/categoria/:categoria_id", get(list_by_categoria))
        .route("/productos/:id", get(get_by_id).put(update).delete(remove))
}

#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<Producto>>, ApiError> {
    Ok(Json(Producto::list_active(&state.db).await?))
}

#[instrument(skip(state))]
async fn list_admin(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<Vec<Producto>>, ApiError> {
    Ok(Json(Producto::list_all(&state.db).await?))
}

#[instrument(skip(state))]
async fn list_by_categoria(
    State(state): State<AppState>,
    Path(categoria_id): Path<i64>,
) -> Result<Json<Vec<Producto>>, ApiError> {
    Ok(Json(Producto::list_by_categoria(&state.db, categoria_id).await?))
}

#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Producto>, ApiError> {
    let producto = Producto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Producto no encontrado".into()))?;
    Ok(Json(producto))
}

#[instrument(skip(state, payload))]
async fn create(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Json(payload): Json<CreateProducto>,
) -> Result<(StatusCode, Json<Producto>), ApiError> {
    if payload.nombre.trim().is_empty() {
        return Err(ApiError::Validation("El campo nombre es obligatorio".into()));
    }
    if payload.precio < 0.0 {
        return Err(ApiError::Validation("El precio no puede ser negativo".into()));
    }

    let producto = Producto::insert(
        &state.db,
        payload.categoria_id,
        payload.nombre.trim(),
        payload.descripcion.as_deref(),
        payload.precio,
        payload.costo,
        payload.sku.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(producto)))
}

#[instrument(skip(state, payload))]
async fn update(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProducto>,
) -> Result<Json<Producto>, ApiError> {
    let existing = Producto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Producto no encontrado para actualizar".into()))?;

    let producto = Producto::update(&state.db, &payload.merged(existing)).await?;
    Ok(Json(producto))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = match state.config.delete_policy.productos {
        DeleteMode::Soft => Producto::deactivate(&state.db, id).await?,
        DeleteMode::Hard => Producto::delete_hard(&state.db, id).await?,
    };
    if !removed {
        return Err(ApiError::NotFound("Producto no encontrado para eliminar".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
