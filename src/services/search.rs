//! Filtros de texto de los listados
//!
//! Un `q` vacío (o solo espacios) no filtra nada. Nombres, emails y demás
//! campos de texto se comparan sin distinguir mayúsculas; el teléfono se
//! busca como subcadena literal.

fn needle(q: &str) -> Option<String> {
    let q = q.trim();
    (!q.is_empty()).then(|| q.to_lowercase())
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Cualquiera de los campos contiene `q` (sin distinguir mayúsculas)
pub fn matches_any(q: &str, fields: &[Option<&str>]) -> bool {
    match needle(q) {
        None => true,
        Some(n) => fields.iter().any(|f| contains_ci(*f, &n)),
    }
}

pub fn customer_matches(q: &str, name: &str, email: Option<&str>, phone: Option<&str>) -> bool {
    let Some(n) = needle(q) else {
        return true;
    };
    contains_ci(Some(name), &n)
        || contains_ci(email, &n)
        || phone.map(|p| p.contains(q.trim())).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(matches_any("", &[None]));
        assert!(matches_any("   ", &[Some("x")]));
        assert!(customer_matches("", "Ana", None, None));
    }

    #[test]
    fn test_case_insensitive_fields() {
        assert!(matches_any("FILT", &[Some("Filtro de aceite"), None]));
        assert!(matches_any("oc-12", &[Some("Pastillas"), Some("OC-123")]));
        assert!(!matches_any("bujía", &[Some("Filtro"), None]));
    }

    #[test]
    fn test_customer_search_by_name_email_or_phone() {
        assert!(customer_matches("ana", "Ana López", None, None));
        assert!(customer_matches("TALLER.ES", "Bea", Some("bea@taller.es"), None));
        assert!(customer_matches("555-12", "Carla", None, Some("555-1234")));
        assert!(!customer_matches("999", "Carla", Some("carla@x.com"), Some("555-1234")));
    }
}
