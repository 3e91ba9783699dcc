use serde::Deserialize;

/// Parámetro `?q=` de los listados con búsqueda
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
