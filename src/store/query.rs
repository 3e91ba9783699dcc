//! Forma de las consultas del record store
//!
//! Una lectura se describe con un `Select` (columnas + relaciones anidadas
//! por nombre), filtros y orden. Nada de plantillas de texto: cada backend
//! valida la forma contra el esquema de `collection.rs` antes de ejecutar.

use serde_json::Value;

use super::collection::{Collection, RelationKind};
use super::{StoreError, StoreResult};

/// Fila tal como la devuelve el store
pub type Row = serde_json::Map<String, Value>;

/// Columnas y relaciones pedidas en una lectura
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    /// Vacío significa todas las columnas de la colección
    pub fields: Vec<String>,
    pub relations: Vec<RelationSelect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationSelect {
    /// Nombre con el que aparece en la fila resultante
    pub alias: String,
    /// Nombre de la relación en el esquema
    pub relation: String,
    pub select: Select,
}

impl Select {
    /// Todas las columnas, sin relaciones
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            relations: Vec::new(),
        }
    }

    /// Añade una relación usando su propio nombre como alias
    pub fn with(self, relation: &str, select: Select) -> Self {
        self.with_as(relation, relation, select)
    }

    pub fn with_as(mut self, alias: &str, relation: &str, select: Select) -> Self {
        self.relations.push(RelationSelect {
            alias: alias.to_string(),
            relation: relation.to_string(),
            select,
        });
        self
    }

    /// Columnas efectivas de la selección para una colección
    pub fn resolved_fields(&self, collection: Collection) -> Vec<&str> {
        if self.fields.is_empty() {
            collection.columns().iter().map(|c| c.name).collect()
        } else {
            self.fields.iter().map(String::as_str).collect()
        }
    }

    /// Comprueba columnas y relaciones contra el esquema, recursivamente
    pub fn validate(&self, collection: Collection) -> StoreResult<()> {
        for field in &self.fields {
            if collection.column(field).is_none() {
                return Err(StoreError::UnknownColumn {
                    collection,
                    column: field.clone(),
                });
            }
        }
        for rel in &self.relations {
            let relation = collection
                .relation(&rel.relation)
                .ok_or_else(|| StoreError::UnknownRelation {
                    collection,
                    relation: rel.relation.clone(),
                })?;
            rel.select.validate(relation.target)?;
        }
        Ok(())
    }
}

/// Condición sobre columnas de la colección principal
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    In(String, Vec<Value>),
    Gte(String, Value),
    Lt(String, Value),
    /// `left <= right` comparando dos columnas de la misma fila
    ColumnLte(String, String),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(column.to_string(), value.into())
    }

    pub fn is_in(column: &str, values: Vec<Value>) -> Self {
        Filter::In(column.to_string(), values)
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Gte(column.to_string(), value.into())
    }

    pub fn lt(column: &str, value: impl Into<Value>) -> Self {
        Filter::Lt(column.to_string(), value.into())
    }

    pub fn column_lte(left: &str, right: &str) -> Self {
        Filter::ColumnLte(left.to_string(), right.to_string())
    }

    /// Columnas a las que hace referencia el filtro
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Filter::Eq(c, _)
            | Filter::In(c, _)
            | Filter::Gte(c, _)
            | Filter::Lt(c, _) => vec![c.as_str()],
            Filter::ColumnLte(l, r) => vec![l.as_str(), r.as_str()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }
}

/// Parámetros completos de un `list`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub select: Select,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn new(select: Select) -> Self {
        Self {
            select,
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn validate(&self, collection: Collection) -> StoreResult<()> {
        self.select.validate(collection)?;
        validate_filters(collection, &self.filters)?;
        for order in &self.order {
            ensure_column(collection, &order.column)?;
        }
        Ok(())
    }
}

pub fn validate_filters(collection: Collection, filters: &[Filter]) -> StoreResult<()> {
    for filter in filters {
        for column in filter.columns() {
            ensure_column(collection, column)?;
        }
    }
    Ok(())
}

fn ensure_column(collection: Collection, column: &str) -> StoreResult<()> {
    collection
        .column(column)
        .map(|_| ())
        .ok_or_else(|| StoreError::UnknownColumn {
            collection,
            column: column.to_string(),
        })
}

/// Filas hijas escritas en la misma operación atómica que su padre
#[derive(Debug, Clone)]
pub struct ChildInsert {
    pub collection: Collection,
    /// Columna del hijo que recibe el id del padre
    pub foreign_key: String,
    pub rows: Vec<Row>,
}

impl ChildInsert {
    pub fn new(collection: Collection, foreign_key: &str, rows: Vec<Row>) -> Self {
        Self {
            collection,
            foreign_key: foreign_key.to_string(),
            rows,
        }
    }

    /// El hijo debe apuntar al padre mediante una clave foránea declarada
    pub fn validate(&self, parent: Collection) -> StoreResult<()> {
        let declared = self
            .collection
            .foreign_keys()
            .iter()
            .any(|fk| fk.column == self.foreign_key && fk.target == parent);
        if declared {
            Ok(())
        } else {
            Err(StoreError::UnknownColumn {
                collection: self.collection,
                column: self.foreign_key.clone(),
            })
        }
    }
}

/// Devuelve (colección destino, clave foránea, es_belongs_to) para una relación
pub(crate) fn relation_target(
    collection: Collection,
    relation: &str,
) -> StoreResult<(Collection, &'static str, bool)> {
    let rel = collection
        .relation(relation)
        .ok_or_else(|| StoreError::UnknownRelation {
            collection,
            relation: relation.to_string(),
        })?;
    Ok(match rel.kind {
        RelationKind::BelongsTo { foreign_key } => (rel.target, foreign_key, true),
        RelationKind::HasMany { foreign_key } => (rel.target, foreign_key, false),
    })
}
