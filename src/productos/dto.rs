use serde::Deserialize;

use crate::productos::repo_types::Producto;

#[derive(Debug, Deserialize)]
pub struct CreateProducto {
    pub categoria_id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub costo: Option<f64>,
    pub sku: Option<String>,
}

/// Partial update; absent fields keep the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProducto {
    pub categoria_id: Option<i64>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub costo: Option<f64>,
    pub sku: Option<String>,
    pub activo: Option<bool>,
}

impl UpdateProducto {
    pub fn merged(self, existing: Producto) -> Producto {
        Producto {
            id: existing.id,
            categoria_id: self.categoria_id.unwrap_or(existing.categoria_id),
            nombre: self.nombre.unwrap_or(existing.nombre),
            descripcion: self.descripcion.or(existing.descripcion),
            precio: self.precio.unwrap_or(existing.precio),
            costo: self.costo.or(existing.costo),
            sku: self.sku.or(existing.sku),
            activo: self.activo.unwrap_or(existing.activo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producto() -> Producto {
        Producto {
            id: 1,
            categoria_id: 2,
            nombre: "Torta".into(),
            descripcion: Some("Chocolate".into()),
            precio: 500.0,
            costo: Some(200.0),
            sku: None,
            activo: true,
        }
    }

    #[test]
    fn merged_keeps_existing_when_empty() {
        let merged = UpdateProducto::default().merged(producto());
        assert_eq!(merged.nombre, "Torta");
        assert_eq!(merged.precio, 500.0);
        assert!(merged.activo);
    }

    #[test]
    fn merged_overrides_provided_fields() {
        let update = UpdateProducto {
            precio: Some(650.0),
            activo: Some(false),
            ..Default::default()
        };
        let merged = update.merged(producto());
        assert_eq!(merged.precio, 650.0);
        assert!(!merged.activo);
        // Untouched fields survive.
        assert_eq!(merged.categoria_id, 2);
        assert_eq!(merged.descripcion.as_deref(), Some("Chocolate"));
    }
}
