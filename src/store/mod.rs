//! Record store
//!
//! Capa de persistencia direccionada por nombre de colección: listar,
//! obtener, insertar, actualizar, borrar y contar filas, con lecturas que
//! pueden traer filas relacionadas siguiendo claves foráneas.
//!
//! Hay dos backends: `PgRecordStore` (PostgreSQL vía sqlx) y
//! `MemoryRecordStore` (en proceso, para tests y desarrollo local).

pub mod collection;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod value;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use collection::Collection;
pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
pub use query::{ChildInsert, Filter, ListQuery, Order, Row, Select};

/// Errores del record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown column '{column}' on {collection}")]
    UnknownColumn { collection: Collection, column: String },

    #[error("unknown relation '{relation}' on {collection}")]
    UnknownRelation { collection: Collection, relation: String },

    #[error("missing required column '{column}' on {collection}")]
    MissingColumn { collection: Collection, column: String },

    #[error("invalid value for {collection}.{column}: {reason}")]
    InvalidValue {
        collection: Collection,
        column: String,
        reason: String,
    },

    #[error("column {collection}.{column} is immutable")]
    ImmutableColumn { collection: Collection, column: String },

    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("unique violation: {0}")]
    UniqueViolation(String),

    #[error("{collection} row '{id}' not found")]
    NotFound { collection: Collection, id: Uuid },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed row: {0}")]
    MalformedRow(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Contrato común de los backends de persistencia
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Filas de una colección según filtros, orden y forma de selección
    async fn list(&self, collection: Collection, query: &ListQuery) -> StoreResult<Vec<Row>>;

    /// Una fila por id, o `None` si no existe
    async fn get(&self, collection: Collection, id: Uuid, select: &Select) -> StoreResult<Option<Row>>;

    /// Inserta una fila y devuelve la fila almacenada con sus columnas generadas
    async fn insert(&self, collection: Collection, row: Row) -> StoreResult<Row>;

    /// Inserta una fila y sus hijas de forma atómica: o se escriben todas o ninguna
    async fn insert_with_children(
        &self,
        collection: Collection,
        row: Row,
        children: Vec<ChildInsert>,
    ) -> StoreResult<Row>;

    /// Aplica un parche parcial y devuelve la fila resultante
    async fn update(&self, collection: Collection, id: Uuid, patch: Row) -> StoreResult<Row>;

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<()>;

    async fn count(&self, collection: Collection, filters: &[Filter]) -> StoreResult<i64>;
}
