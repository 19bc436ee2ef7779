use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::{
    dto::{AuthResponse, LoginRequest, MeResponse, RefreshRequest, RefreshResponse, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    repo_types::Usuario,
    services,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() || payload.nombre.is_empty() {
        return Err(ApiError::Validation(
            "Email, contraseña y nombre son requeridos".into(),
        ));
    }
    if !services::is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Formato de email inválido".into()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "La contraseña debe tener al menos 6 caracteres".into(),
        ));
    }

    let keys = JwtKeys::from_ref(&state);
    let (usuario, tokens) = services::register(
        &state.db,
        &keys,
        &payload.email,
        &payload.password,
        &payload.nombre,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            usuario,
            tokens,
            message: "Usuario registrado exitosamente".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Email y contraseña son requeridos".into(),
        ));
    }

    let keys = JwtKeys::from_ref(&state);
    let (usuario, tokens) =
        services::login(&state.db, &keys, &payload.email, &payload.password).await?;

    Ok(Json(AuthResponse {
        success: true,
        usuario,
        tokens,
        message: "Login exitoso".into(),
    }))
}

#[instrument(skip(state, payload))]
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    if payload.refresh_token.is_empty() {
        return Err(ApiError::Validation("Refresh token es requerido".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token =
        services::refresh_access_token(&state.db, &keys, &payload.refresh_token).await?;

    Ok(Json(RefreshResponse {
        success: true,
        access_token,
        message: "Token refrescado exitosamente".into(),
    }))
}

#[instrument(skip(state, payload))]
async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.refresh_token.is_empty() {
        return Err(ApiError::Validation("Refresh token es requerido".into()));
    }

    services::logout(&state.db, &payload.refresh_token).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "message": "Logout exitoso" }),
    ))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let usuario = Usuario::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("Usuario no encontrado".into()))?;

    Ok(Json(MeResponse {
        success: true,
        usuario,
    }))
}
