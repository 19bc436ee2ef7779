use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::{macros::format_description, Date};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::ventas::dto::{calcular_total, RegistrarVenta, TotalVentas, VentaConDetalle};
use crate::ventas::repo_types::Venta;

#[derive(Debug, Deserialize)]
struct RangoFechas {
    desde: Option<String>,
    hasta: Option<String>,
}

fn parse_fecha(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ApiError::Validation(format!("Fecha inválida: {}", s)))
}

impl RangoFechas {
    fn parse(&self) -> Result<Option<(Date, Date)>, ApiError> {
        match (&self.desde, &self.hasta) {
            (Some(d), Some(h)) => Ok(Some((parse_fecha(d)?, parse_fecha(h)?))),
            (None, None) => Ok(None),
            _ => Err(ApiError::Validation(
                "desde y hasta deben indicarse juntos".into(),
            )),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ventas", get(list).post(registrar))
        .route("/ventas/total", get(total))
        .route("/ventas/:id", get(get_by_id))
}

#[instrument(skip(state, payload))]
async fn registrar(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<RegistrarVenta>,
) -> Result<(StatusCode, Json<VentaConDetalle>), ApiError> {
    if payload.productos.is_empty() {
        return Err(ApiError::Validation(
            "La venta debe incluir al menos un producto".into(),
        ));
    }
    for p in &payload.productos {
        if p.cantidad <= 0 {
            return Err(ApiError::Validation(
                "La cantidad debe ser mayor a cero".into(),
            ));
        }
    }

    let total = calcular_total(&payload.productos);
    let (venta, productos) = Venta::registrar(&state.db, total, &payload.productos).await?;

    Ok((
        StatusCode::CREATED,
        Json(VentaConDetalle { venta, productos }),
    ))
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(rango): Query<RangoFechas>,
) -> Result<Json<Vec<Venta>>, ApiError> {
    let ventas = match rango.parse()? {
        Some((desde, hasta)) => Venta::list_between(&state.db, desde, hasta).await?,
        None => Venta::list(&state.db).await?,
    };
    Ok(Json(ventas))
}

#[instrument(skip(state))]
async fn get_by_id(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<VentaConDetalle>, ApiError> {
    let venta = Venta::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Venta no encontrada".into()))?;
    let productos = Venta::detalles_de(&state.db, venta.id).await?;
    Ok(Json(VentaConDetalle { venta, productos }))
}

#[instrument(skip(state))]
async fn total(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(rango): Query<RangoFechas>,
) -> Result<Json<TotalVentas>, ApiError> {
    let (desde, hasta) = rango
        .parse()?
        .ok_or_else(|| ApiError::Validation("desde y hasta son requeridos".into()))?;
    let total = Venta::total_between(&state.db, desde, hasta).await?;
    Ok(Json(TotalVentas { total }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fecha_valida() {
        let fecha = parse_fecha("2026-08-06").unwrap();
        assert_eq!(fecha.to_string(), "2026-08-06");
    }

    #[test]
    fn parse_fecha_invalida() {
        assert!(parse_fecha("06/08/2026").is_err());
        assert!(parse_fecha("no-fecha").is_err());
    }

    #[test]
    fn rango_requiere_ambos_extremos() {
        let rango = RangoFechas {
            desde: Some("2026-01-01".into()),
            hasta: None,
        };
        assert!(rango.parse().is_err());

        let vacio = RangoFechas {
            desde: None,
            hasta: None,
        };
        assert!(vacio.parse().unwrap().is_none());
    }
}
