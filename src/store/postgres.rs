//! Backend PostgreSQL del record store
//!
//! Genera el SQL a partir del esquema de colecciones y de la forma de la
//! consulta. Las filas salen como un único `jsonb` por registro
//! (`jsonb_build_object`), con las relaciones anidadas como subconsultas,
//! así una lectura con joins es una sola ida y vuelta.
//!
//! Todos los parámetros se enlazan como texto y se castean al tipo de la
//! columna en SQL; los nombres de tablas y columnas vienen siempre del
//! esquema, nunca de la entrada del usuario.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::collection::{Collection, ColumnKind};
use super::query::{relation_target, validate_filters, ChildInsert, Filter, ListQuery, Row, Select};
use super::value::{bind_text, prepare_insert, prepare_update};
use super::{RecordStore, StoreError, StoreResult};

/// SQL con sus parámetros posicionales
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<Option<String>>,
}

impl SqlStatement {
    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Añade `$n::cast` y registra el valor
    fn push_bind(&mut self, value: Option<String>, cast: &str) {
        self.binds.push(value);
        self.sql.push_str(&format!("${}::{}", self.binds.len(), cast));
    }
}

/// Contador de alias de tabla (`t0`, `t1`, ...) dentro de una sentencia
struct Aliases(usize);

impl Aliases {
    fn next(&mut self) -> String {
        let alias = format!("t{}", self.0);
        self.0 += 1;
        alias
    }
}

/// `jsonb_build_object(...)` para la selección dada sobre `alias`
fn push_object(
    stmt: &mut SqlStatement,
    collection: Collection,
    alias: &str,
    select: &Select,
    aliases: &mut Aliases,
) -> StoreResult<()> {
    stmt.push("jsonb_build_object(");
    let mut first = true;

    for field in select.resolved_fields(collection) {
        let column = collection.column(field).ok_or_else(|| StoreError::UnknownColumn {
            collection,
            column: field.to_string(),
        })?;
        if !first {
            stmt.push(", ");
        }
        first = false;
        // numeric como texto para no perder precisión al pasar por JSON
        let cast = if column.kind == ColumnKind::Numeric { "::text" } else { "" };
        stmt.push(&format!("'{}', {}.{}{}", column.name, alias, column.name, cast));
    }

    for rel in &select.relations {
        let (target, foreign_key, belongs_to) = relation_target(collection, &rel.relation)?;
        if !first {
            stmt.push(", ");
        }
        first = false;
        let child = aliases.next();
        stmt.push(&format!("'{}', (SELECT ", rel.alias));
        if belongs_to {
            push_object(stmt, target, &child, &rel.select, aliases)?;
            stmt.push(&format!(
                " FROM {} {} WHERE {}.id = {}.{})",
                target.table(),
                child,
                child,
                alias,
                foreign_key
            ));
        } else {
            stmt.push("COALESCE(jsonb_agg(");
            push_object(stmt, target, &child, &rel.select, aliases)?;
            stmt.push(&format!(
                " ORDER BY {}.created_at), '[]'::jsonb) FROM {} {} WHERE {}.{} = {}.id)",
                child,
                target.table(),
                child,
                child,
                foreign_key,
                alias
            ));
        }
    }

    stmt.push(")");
    Ok(())
}

fn column_kind(collection: Collection, column: &str) -> StoreResult<ColumnKind> {
    collection
        .column(column)
        .map(|c| c.kind)
        .ok_or_else(|| StoreError::UnknownColumn {
            collection,
            column: column.to_string(),
        })
}

fn push_where(stmt: &mut SqlStatement, collection: Collection, alias: &str, filters: &[Filter]) -> StoreResult<()> {
    for (i, filter) in filters.iter().enumerate() {
        stmt.push(if i == 0 { " WHERE " } else { " AND " });
        match filter {
            Filter::Eq(column, value) if value.is_null() => {
                stmt.push(&format!("{}.{} IS NULL", alias, column));
            }
            Filter::Eq(column, value) => push_comparison(stmt, collection, alias, column, "=", value)?,
            Filter::Gte(column, value) => push_comparison(stmt, collection, alias, column, ">=", value)?,
            Filter::Lt(column, value) => push_comparison(stmt, collection, alias, column, "<", value)?,
            Filter::In(column, values) => {
                if values.is_empty() {
                    stmt.push("FALSE");
                    continue;
                }
                let cast = column_kind(collection, column)?.sql_cast();
                stmt.push(&format!("{}.{} IN (", alias, column));
                for (j, value) in values.iter().enumerate() {
                    if j > 0 {
                        stmt.push(", ");
                    }
                    stmt.push_bind(bind_text(value), cast);
                }
                stmt.push(")");
            }
            Filter::ColumnLte(left, right) => {
                stmt.push(&format!("{}.{} <= {}.{}", alias, left, alias, right));
            }
        }
    }
    Ok(())
}

fn push_comparison(
    stmt: &mut SqlStatement,
    collection: Collection,
    alias: &str,
    column: &str,
    op: &str,
    value: &Value,
) -> StoreResult<()> {
    let cast = column_kind(collection, column)?.sql_cast();
    stmt.push(&format!("{}.{} {} ", alias, column, op));
    stmt.push_bind(bind_text(value), cast);
    Ok(())
}

/// SELECT para `list`
pub fn select_statement(collection: Collection, query: &ListQuery) -> StoreResult<SqlStatement> {
    query.validate(collection)?;
    let mut stmt = SqlStatement::default();
    let mut aliases = Aliases(0);
    let root = aliases.next();

    stmt.push("SELECT ");
    push_object(&mut stmt, collection, &root, &query.select, &mut aliases)?;
    stmt.push(&format!(" FROM {} {}", collection.table(), root));
    push_where(&mut stmt, collection, &root, &query.filters)?;

    if !query.order.is_empty() {
        let order: Vec<String> = query
            .order
            .iter()
            .map(|o| {
                format!(
                    "{}.{} {} NULLS LAST",
                    root,
                    o.column,
                    if o.ascending { "ASC" } else { "DESC" }
                )
            })
            .collect();
        stmt.push(&format!(" ORDER BY {}", order.join(", ")));
    }
    if let Some(limit) = query.limit {
        stmt.push(&format!(" LIMIT {}", limit.max(0)));
    }
    Ok(stmt)
}

/// SELECT para `get`
pub fn get_statement(collection: Collection, id: Uuid, select: &Select) -> StoreResult<SqlStatement> {
    select.validate(collection)?;
    let mut stmt = SqlStatement::default();
    let mut aliases = Aliases(0);
    let root = aliases.next();

    stmt.push("SELECT ");
    push_object(&mut stmt, collection, &root, select, &mut aliases)?;
    stmt.push(&format!(" FROM {} {} WHERE {}.id = ", collection.table(), root, root));
    stmt.push_bind(Some(id.to_string()), "uuid");
    Ok(stmt)
}

/// INSERT ... RETURNING para una fila ya preparada
pub fn insert_statement(collection: Collection, row: &Row) -> StoreResult<SqlStatement> {
    let mut stmt = SqlStatement::default();
    let mut aliases = Aliases(0);
    let root = aliases.next();

    stmt.push(&format!("INSERT INTO {} AS {}", collection.table(), root));
    if row.is_empty() {
        stmt.push(" DEFAULT VALUES");
    } else {
        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        stmt.push(&format!(" ({}) VALUES (", columns.join(", ")));
        for (i, (name, value)) in row.iter().enumerate() {
            if i > 0 {
                stmt.push(", ");
            }
            let cast = column_kind(collection, name)?.sql_cast();
            stmt.push_bind(bind_text(value), cast);
        }
        stmt.push(")");
    }
    stmt.push(" RETURNING ");
    push_object(&mut stmt, collection, &root, &Select::all(), &mut aliases)?;
    Ok(stmt)
}

/// UPDATE ... RETURNING para un parche ya preparado (no vacío)
pub fn update_statement(collection: Collection, id: Uuid, patch: &Row) -> StoreResult<SqlStatement> {
    let mut stmt = SqlStatement::default();
    let mut aliases = Aliases(0);
    let root = aliases.next();

    stmt.push(&format!("UPDATE {} AS {} SET ", collection.table(), root));
    for (i, (name, value)) in patch.iter().enumerate() {
        if i > 0 {
            stmt.push(", ");
        }
        let cast = column_kind(collection, name)?.sql_cast();
        stmt.push(&format!("{} = ", name));
        stmt.push_bind(bind_text(value), cast);
    }
    if let Some(touch) = collection.touch_column() {
        stmt.push(&format!(", {} = NOW()", touch));
    }
    stmt.push(&format!(" WHERE {}.id = ", root));
    stmt.push_bind(Some(id.to_string()), "uuid");
    stmt.push(" RETURNING ");
    push_object(&mut stmt, collection, &root, &Select::all(), &mut aliases)?;
    Ok(stmt)
}

/// SELECT COUNT(*) para `count`
pub fn count_statement(collection: Collection, filters: &[Filter]) -> StoreResult<SqlStatement> {
    validate_filters(collection, filters)?;
    let mut stmt = SqlStatement::default();
    stmt.push(&format!("SELECT COUNT(*) FROM {} t0", collection.table()));
    push_where(&mut stmt, collection, "t0", filters)?;
    Ok(stmt)
}

/// Traduce códigos SQLSTATE de integridad a errores del store
fn map_db_error(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        let message = db.message().to_string();
        match db.code().as_deref() {
            Some("23503") => return StoreError::ForeignKeyViolation(message),
            Some("23505") => return StoreError::UniqueViolation(message),
            Some("23514") => return StoreError::CheckViolation(message),
            _ => {}
        }
    }
    StoreError::Database(error)
}

fn into_row(value: Value) -> StoreResult<Row> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::MalformedRow(format!("expected JSON object, got {}", other))),
    }
}

fn row_id(collection: Collection, row: &Row) -> StoreResult<Uuid> {
    row.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| StoreError::MalformedRow(format!("{} row without id", collection)))
}

/// Record store sobre PostgreSQL
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_rows(&self, stmt: SqlStatement) -> StoreResult<Vec<Row>> {
        debug!(sql = %stmt.sql, "record store query");
        let mut query = sqlx::query_scalar::<_, Json<Value>>(&stmt.sql);
        for bind in stmt.binds {
            query = query.bind(bind);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        rows.into_iter().map(|Json(v)| into_row(v)).collect()
    }

    async fn fetch_one_row(conn: &mut PgConnection, stmt: SqlStatement) -> StoreResult<Option<Row>> {
        debug!(sql = %stmt.sql, "record store write");
        let mut query = sqlx::query_scalar::<_, Json<Value>>(&stmt.sql);
        for bind in stmt.binds {
            query = query.bind(bind);
        }
        let row = query.fetch_optional(conn).await.map_err(map_db_error)?;
        row.map(|Json(v)| into_row(v)).transpose()
    }

    async fn insert_in(conn: &mut PgConnection, collection: Collection, row: Row) -> StoreResult<Row> {
        let prepared = prepare_insert(collection, row)?;
        let stmt = insert_statement(collection, &prepared)?;
        Self::fetch_one_row(conn, stmt)
            .await?
            .ok_or_else(|| StoreError::MalformedRow(format!("insert into {} returned nothing", collection)))
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(&self, collection: Collection, query: &ListQuery) -> StoreResult<Vec<Row>> {
        let stmt = select_statement(collection, query)?;
        self.fetch_rows(stmt).await
    }

    async fn get(&self, collection: Collection, id: Uuid, select: &Select) -> StoreResult<Option<Row>> {
        let stmt = get_statement(collection, id, select)?;
        Ok(self.fetch_rows(stmt).await?.into_iter().next())
    }

    async fn insert(&self, collection: Collection, row: Row) -> StoreResult<Row> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in(&mut conn, collection, row).await
    }

    async fn insert_with_children(
        &self,
        collection: Collection,
        row: Row,
        children: Vec<ChildInsert>,
    ) -> StoreResult<Row> {
        for child in &children {
            child.validate(collection)?;
        }

        let mut tx = self.pool.begin().await?;
        let parent = Self::insert_in(&mut tx, collection, row).await?;
        let parent_id = row_id(collection, &parent)?;

        for child in children {
            for mut child_row in child.rows {
                child_row.insert(child.foreign_key.clone(), Value::String(parent_id.to_string()));
                Self::insert_in(&mut tx, child.collection, child_row).await?;
            }
        }

        // si algo falla antes de aquí, el drop de `tx` hace rollback
        tx.commit().await?;
        Ok(parent)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Row) -> StoreResult<Row> {
        let prepared = prepare_update(collection, patch)?;
        if prepared.is_empty() {
            return self
                .get(collection, id, &Select::all())
                .await?
                .ok_or(StoreError::NotFound { collection, id });
        }
        let stmt = update_statement(collection, id, &prepared)?;
        let mut conn = self.pool.acquire().await?;
        Self::fetch_one_row(&mut conn, stmt)
            .await?
            .ok_or(StoreError::NotFound { collection, id })
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1::uuid", collection.table());
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { collection, id });
        }
        Ok(())
    }

    async fn count(&self, collection: Collection, filters: &[Filter]) -> StoreResult<i64> {
        let stmt = count_statement(collection, filters)?;
        let mut query = sqlx::query_scalar::<_, i64>(&stmt.sql);
        for bind in stmt.binds {
            query = query.bind(bind);
        }
        query.fetch_one(&self.pool).await.map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::query::Order;
    use serde_json::json;

    #[test]
    fn test_select_with_nested_relations() {
        let query = ListQuery::new(
            Select::columns(&["id", "total_cost"])
                .with("vehicle", Select::columns(&["make"]).with("customer", Select::columns(&["name"])))
                .with("parts", Select::columns(&["quantity"])),
        )
        .filter(Filter::eq("status", "pending"))
        .order_by(Order::desc("created_at"))
        .limit(10);

        let stmt = select_statement(Collection::Jobs, &query).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT jsonb_build_object('id', t0.id, 'total_cost', t0.total_cost::text, \
             'vehicle', (SELECT jsonb_build_object('make', t1.make, \
             'customer', (SELECT jsonb_build_object('name', t2.name) FROM customers t2 WHERE t2.id = t1.customer_id)) \
             FROM vehicles t1 WHERE t1.id = t0.vehicle_id), \
             'parts', (SELECT COALESCE(jsonb_agg(jsonb_build_object('quantity', t3.quantity) ORDER BY t3.created_at), '[]'::jsonb) \
             FROM job_parts t3 WHERE t3.job_id = t0.id)) \
             FROM jobs t0 WHERE t0.status = $1::text ORDER BY t0.created_at DESC NULLS LAST LIMIT 10"
        );
        assert_eq!(stmt.binds, vec![Some("pending".to_string())]);
    }

    #[test]
    fn test_low_stock_count_compares_columns() {
        let stmt = count_statement(
            Collection::PartsInventory,
            &[Filter::column_lte("quantity", "reorder_point")],
        )
        .unwrap();
        assert_eq!(stmt.sql, "SELECT COUNT(*) FROM parts_inventory t0 WHERE t0.quantity <= t0.reorder_point");
        assert!(stmt.binds.is_empty());
    }

    #[test]
    fn test_in_filter_binds_each_value() {
        let stmt = count_statement(
            Collection::Jobs,
            &[Filter::is_in("status", vec![json!("pending"), json!("in_progress")])],
        )
        .unwrap();
        assert_eq!(stmt.sql, "SELECT COUNT(*) FROM jobs t0 WHERE t0.status IN ($1::text, $2::text)");
        assert_eq!(stmt.binds.len(), 2);
    }

    #[test]
    fn test_empty_in_filter_matches_nothing() {
        let stmt = count_statement(Collection::Jobs, &[Filter::is_in("status", vec![])]).unwrap();
        assert!(stmt.sql.ends_with("WHERE FALSE"));
    }

    #[test]
    fn test_insert_statement_casts_binds() {
        let row = prepare_insert(
            Collection::Services,
            json!({ "name": "Cambio de aceite", "estimated_hours": "1.5", "base_price": "49.90" })
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();
        let stmt = insert_statement(Collection::Services, &row).unwrap();
        assert!(stmt.sql.starts_with("INSERT INTO services AS t0 ("));
        assert!(stmt.sql.contains("$1::"));
        assert!(stmt.sql.contains("::numeric"));
        assert!(stmt.sql.contains(" RETURNING jsonb_build_object('id', t0.id"));
        assert_eq!(stmt.binds.len(), row.len());
    }

    #[test]
    fn test_update_statement_touches_updated_at() {
        let patch = prepare_update(
            Collection::PartsInventory,
            json!({ "quantity": 4 }).as_object().cloned().unwrap(),
        )
        .unwrap();
        let id = Uuid::new_v4();
        let stmt = update_statement(Collection::PartsInventory, id, &patch).unwrap();
        assert!(stmt
            .sql
            .starts_with("UPDATE parts_inventory AS t0 SET quantity = $1::integer, updated_at = NOW() WHERE t0.id = $2::uuid"));
        assert_eq!(stmt.binds, vec![Some("4".to_string()), Some(id.to_string())]);
    }

    #[test]
    fn test_update_statement_binds_null_to_clear_column() {
        let patch = prepare_update(Collection::Jobs, json!({ "notes": null }).as_object().cloned().unwrap()).unwrap();
        let id = Uuid::new_v4();
        let stmt = update_statement(Collection::Jobs, id, &patch).unwrap();
        assert!(stmt.sql.starts_with("UPDATE jobs AS t0 SET notes = $1::text"));
        assert_eq!(stmt.binds, vec![None, Some(id.to_string())]);
    }

    #[test]
    fn test_eq_null_becomes_is_null() {
        let stmt = count_statement(Collection::Jobs, &[Filter::eq("completed_at", Value::Null)]).unwrap();
        assert!(stmt.sql.ends_with("WHERE t0.completed_at IS NULL"));
    }

    #[test]
    fn test_unknown_filter_column_is_rejected() {
        let err = count_statement(Collection::Jobs, &[Filter::eq("colour", "red")]).unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn { .. }));
    }
}
