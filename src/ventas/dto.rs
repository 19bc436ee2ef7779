use serde::{Deserialize, Serialize};

use crate::ventas::repo_types::{Venta, VentaDetalle};

/// Line item in a sale registration request.
#[derive(Debug, Deserialize)]
pub struct VentaItem {
    pub id: i64, // producto id
    pub nombre: String,
    pub cantidad: i32,
    pub precio: f64,
}

#[derive(Debug, Deserialize)]
pub struct RegistrarVenta {
    #[serde(default)]
    pub productos: Vec<VentaItem>,
}

/// The stored total always comes from the line items, never the client.
pub fn calcular_total(productos: &[VentaItem]) -> f64 {
    productos
        .iter()
        .map(|p| f64::from(p.cantidad) * p.precio)
        .sum()
}

#[derive(Debug, Serialize)]
pub struct VentaConDetalle {
    #[serde(flatten)]
    pub venta: Venta,
    pub productos: Vec<VentaDetalle>,
}

#[derive(Debug, Serialize)]
pub struct TotalVentas {
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, cantidad: i32, precio: f64) -> VentaItem {
        VentaItem {
            id,
            nombre: format!("Producto {}", id),
            cantidad,
            precio,
        }
    }

    #[test]
    fn total_suma_lineas() {
        let items = vec![item(1, 2, 500.0), item(2, 3, 100.0)];
        assert_eq!(calcular_total(&items), 1300.0);
    }

    #[test]
    fn total_de_lista_vacia_es_cero() {
        assert_eq!(calcular_total(&[]), 0.0);
    }

    #[test]
    fn total_ignora_el_total_del_cliente() {
        // The request carries no total field at all; only lines count.
        let items = vec![item(1, 1, 100.0)];
        assert_eq!(calcular_total(&items), 100.0);
    }
}
