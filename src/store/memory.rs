//! Backend en memoria del record store
//!
//! Mismas reglas que PostgreSQL: NOT NULL, CHECK, UNIQUE, claves foráneas
//! (RESTRICT / CASCADE) y columnas inmutables. Las escrituras de varias
//! filas se aplican sobre una copia de las tablas y solo se publican si
//! todo sale bien.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::collection::{Collection, ColumnKind, OnDelete};
use super::query::{relation_target, validate_filters, ChildInsert, Filter, ListQuery, Row, Select};
use super::value::{compare, prepare_insert, prepare_update};
use super::{RecordStore, StoreError, StoreResult};

type Tables = HashMap<Collection, Vec<Row>>;

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &Row) -> Option<Uuid> {
    row.get("id").and_then(Value::as_str).and_then(|s| Uuid::parse_str(s).ok())
}

fn field<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn same_value(collection: Collection, column: &str, a: &Value, b: &Value) -> bool {
    collection
        .column(column)
        .map(|c| compare(c.kind, a, b) == Some(Ordering::Equal))
        .unwrap_or(false)
}

fn find<'a>(tables: &'a Tables, collection: Collection, id: Uuid) -> Option<&'a Row> {
    tables
        .get(&collection)
        .and_then(|rows| rows.iter().find(|r| row_id(r) == Some(id)))
}

fn matches(collection: Collection, row: &Row, filter: &Filter) -> bool {
    let cmp = |column: &str, value: &Value| {
        collection
            .column(column)
            .and_then(|c| compare(c.kind, field(row, column), value))
    };
    match filter {
        Filter::Eq(column, value) if value.is_null() => field(row, column).is_null(),
        Filter::Eq(column, value) => cmp(column, value) == Some(Ordering::Equal),
        Filter::In(column, values) => values.iter().any(|v| cmp(column, v) == Some(Ordering::Equal)),
        Filter::Gte(column, value) => matches!(cmp(column, value), Some(Ordering::Greater | Ordering::Equal)),
        Filter::Lt(column, value) => cmp(column, value) == Some(Ordering::Less),
        Filter::ColumnLte(left, right) => cmp(left, field(row, right))
            .map(|o| o != Ordering::Greater)
            .unwrap_or(false),
    }
}

/// Proyecta una fila según la selección, resolviendo relaciones
fn project(tables: &Tables, collection: Collection, row: &Row, select: &Select) -> StoreResult<Row> {
    let mut out = Row::new();
    for name in select.resolved_fields(collection) {
        out.insert(name.to_string(), field(row, name).clone());
    }

    for rel in &select.relations {
        let (target, foreign_key, belongs_to) = relation_target(collection, &rel.relation)?;
        let value = if belongs_to {
            let parent = field(row, foreign_key)
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .and_then(|id| find(tables, target, id));
            match parent {
                Some(parent) => Value::Object(project(tables, target, parent, &rel.select)?),
                None => Value::Null,
            }
        } else {
            let id = field(row, "id");
            let mut children: Vec<&Row> = tables
                .get(&target)
                .map(|rows| {
                    rows.iter()
                        .filter(|r| same_value(target, foreign_key, field(r, foreign_key), id))
                        .collect()
                })
                .unwrap_or_default();
            children.sort_by(|a, b| {
                compare(ColumnKind::Timestamp, field(a, "created_at"), field(b, "created_at"))
                    .unwrap_or(Ordering::Equal)
            });
            let projected = children
                .into_iter()
                .map(|child| project(tables, target, child, &rel.select).map(Value::Object))
                .collect::<StoreResult<Vec<Value>>>()?;
            Value::Array(projected)
        };
        out.insert(rel.alias.clone(), value);
    }
    Ok(out)
}

fn check_foreign_keys(tables: &Tables, collection: Collection, row: &Row) -> StoreResult<()> {
    for fk in collection.foreign_keys() {
        let value = field(row, fk.column);
        if value.is_null() {
            continue;
        }
        let exists = value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(|id| find(tables, fk.target, id).is_some())
            .unwrap_or(false);
        if !exists {
            return Err(StoreError::ForeignKeyViolation(format!(
                "{}.{} references missing {} row {}",
                collection, fk.column, fk.target, value
            )));
        }
    }
    Ok(())
}

fn check_unique(tables: &Tables, collection: Collection, row: &Row, except: Option<Uuid>) -> StoreResult<()> {
    let Some(rows) = tables.get(&collection) else {
        return Ok(());
    };
    for column in collection.columns().iter().filter(|c| c.unique) {
        let value = field(row, column.name);
        if value.is_null() {
            continue;
        }
        let taken = rows
            .iter()
            .filter(|r| except.is_none() || row_id(r) != except)
            .any(|r| compare(column.kind, field(r, column.name), value) == Some(Ordering::Equal));
        if taken {
            return Err(StoreError::UniqueViolation(format!(
                "{}.{} already contains {}",
                collection, column.name, value
            )));
        }
    }
    Ok(())
}

fn insert_into(tables: &mut Tables, collection: Collection, row: Row) -> StoreResult<Row> {
    let mut prepared = prepare_insert(collection, row)?;
    check_foreign_keys(tables, collection, &prepared)?;
    check_unique(tables, collection, &prepared, None)?;

    let now = Value::String(Utc::now().to_rfc3339());
    prepared.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    for column in collection.columns().iter().filter(|c| c.generated && c.name != "id") {
        prepared.insert(column.name.to_string(), now.clone());
    }

    tables.entry(collection).or_default().push(prepared.clone());
    Ok(prepared)
}

fn delete_from(tables: &mut Tables, collection: Collection, id: Uuid) -> StoreResult<()> {
    if find(tables, collection, id).is_none() {
        return Err(StoreError::NotFound { collection, id });
    }

    let id_value = Value::String(id.to_string());
    for (source, fk) in collection.referencing() {
        let dependants: Vec<Uuid> = tables
            .get(&source)
            .map(|rows| {
                rows.iter()
                    .filter(|r| same_value(source, fk.column, field(r, fk.column), &id_value))
                    .filter_map(row_id)
                    .collect()
            })
            .unwrap_or_default();
        if dependants.is_empty() {
            continue;
        }
        match fk.on_delete {
            OnDelete::Restrict => {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "{} row {} is still referenced by {}.{}",
                    collection, id, source, fk.column
                )))
            }
            OnDelete::Cascade => {
                for dependant in dependants {
                    delete_from(tables, source, dependant)?;
                }
            }
        }
    }

    if let Some(rows) = tables.get_mut(&collection) {
        rows.retain(|r| row_id(r) != Some(id));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, collection: Collection, query: &ListQuery) -> StoreResult<Vec<Row>> {
        query.validate(collection)?;
        let tables = self.tables.read().await;

        let mut rows: Vec<&Row> = tables
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|r| query.filters.iter().all(|f| matches(collection, r, f)))
                    .collect()
            })
            .unwrap_or_default();

        // los nulos van al final en ambos sentidos, como NULLS LAST
        rows.sort_by(|a, b| {
            for order in &query.order {
                let Some(column) = collection.column(&order.column) else {
                    continue;
                };
                let (va, vb) = (field(a, column.name), field(b, column.name));
                let ordering = match (va.is_null(), vb.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => {
                        let o = compare(column.kind, va, vb).unwrap_or(Ordering::Equal);
                        if order.ascending {
                            o
                        } else {
                            o.reverse()
                        }
                    }
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }

        rows.into_iter()
            .map(|row| project(&tables, collection, row, &query.select))
            .collect()
    }

    async fn get(&self, collection: Collection, id: Uuid, select: &Select) -> StoreResult<Option<Row>> {
        select.validate(collection)?;
        let tables = self.tables.read().await;
        find(&tables, collection, id)
            .map(|row| project(&tables, collection, row, select))
            .transpose()
    }

    async fn insert(&self, collection: Collection, row: Row) -> StoreResult<Row> {
        let mut tables = self.tables.write().await;
        insert_into(&mut tables, collection, row)
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

        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();

        let parent = insert_into(&mut staged, collection, row)?;
        let parent_id = field(&parent, "id").clone();
        for child in children {
            for mut child_row in child.rows {
                child_row.insert(child.foreign_key.clone(), parent_id.clone());
                insert_into(&mut staged, child.collection, child_row)?;
            }
        }

        *tables = staged;
        Ok(parent)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Row) -> StoreResult<Row> {
        let prepared = prepare_update(collection, patch)?;
        let mut tables = self.tables.write().await;

        let mut updated = find(&tables, collection, id)
            .cloned()
            .ok_or(StoreError::NotFound { collection, id })?;
        if prepared.is_empty() {
            return Ok(updated);
        }
        for (name, value) in prepared {
            updated.insert(name, value);
        }
        if let Some(touch) = collection.touch_column() {
            updated.insert(touch.to_string(), Value::String(Utc::now().to_rfc3339()));
        }

        check_foreign_keys(&tables, collection, &updated)?;
        check_unique(&tables, collection, &updated, Some(id))?;

        if let Some(slot) = tables
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
        {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        delete_from(&mut staged, collection, id)?;
        *tables = staged;
        Ok(())
    }

    async fn count(&self, collection: Collection, filters: &[Filter]) -> StoreResult<i64> {
        validate_filters(collection, filters)?;
        let tables = self.tables.read().await;
        let count = tables
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|r| filters.iter().all(|f| matches(collection, r, f)))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::query::Order;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().expect("objeto JSON")
    }

    fn id_of(row: &Row) -> Uuid {
        row_id(row).expect("fila con id")
    }

    async fn seed_customer(store: &MemoryRecordStore, name: &str) -> Row {
        store
            .insert(Collection::Customers, row(json!({ "name": name })))
            .await
            .unwrap()
    }

    async fn seed_vehicle(store: &MemoryRecordStore, customer_id: Uuid, plate: &str) -> Row {
        store
            .insert(
                Collection::Vehicles,
                row(json!({
                    "customer_id": customer_id.to_string(),
                    "make": "Toyota",
                    "model": "Corolla",
                    "year": 2019,
                    "license_plate": plate,
                })),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_generates_id_and_created_at() {
        let store = MemoryRecordStore::new();
        let customer = seed_customer(&store, "Ana").await;
        assert!(row_id(&customer).is_some());
        assert!(customer["created_at"].is_string());
        assert_eq!(customer["email"], Value::Null);
    }

    #[tokio::test]
    async fn test_vehicle_requires_existing_customer() {
        let store = MemoryRecordStore::new();
        let err = store
            .insert(
                Collection::Vehicles,
                row(json!({
                    "customer_id": Uuid::new_v4().to_string(),
                    "make": "Seat",
                    "model": "Ibiza",
                    "year": 2015,
                    "license_plate": "1234ABC",
                })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_license_plate_is_unique() {
        let store = MemoryRecordStore::new();
        let customer = seed_customer(&store, "Ana").await;
        seed_vehicle(&store, id_of(&customer), "1234ABC").await;
        let err = store
            .insert(
                Collection::Vehicles,
                row(json!({
                    "customer_id": id_of(&customer).to_string(),
                    "make": "Seat",
                    "model": "Ibiza",
                    "year": 2015,
                    "license_plate": "1234ABC",
                })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_list_with_relations_order_and_filters() {
        let store = MemoryRecordStore::new();
        let bea = seed_customer(&store, "Bea").await;
        let ana = seed_customer(&store, "Ana").await;
        seed_vehicle(&store, id_of(&ana), "AAA111").await;
        seed_vehicle(&store, id_of(&ana), "AAA222").await;

        let query = ListQuery::new(Select::columns(&["name"]).with("vehicles", Select::columns(&["license_plate"])))
            .order_by(Order::asc("name"));
        let rows = store.list(Collection::Customers, &query).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], json!("Ana"));
        assert_eq!(rows[0]["vehicles"].as_array().unwrap().len(), 2);
        assert_eq!(rows[1]["vehicles"], json!([]));

        let only_bea = ListQuery::new(Select::all()).filter(Filter::eq("id", id_of(&bea).to_string()));
        let rows = store.list(Collection::Customers, &only_bea).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("Bea"));
    }

    #[tokio::test]
    async fn test_belongs_to_relation_is_an_object() {
        let store = MemoryRecordStore::new();
        let ana = seed_customer(&store, "Ana").await;
        let vehicle = seed_vehicle(&store, id_of(&ana), "AAA111").await;

        let got = store
            .get(
                Collection::Vehicles,
                id_of(&vehicle),
                &Select::columns(&["make"]).with("customer", Select::columns(&["name"])),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got["customer"], json!({ "name": "Ana" }));
    }

    #[tokio::test]
    async fn test_delete_customer_with_vehicles_is_restricted() {
        let store = MemoryRecordStore::new();
        let ana = seed_customer(&store, "Ana").await;
        seed_vehicle(&store, id_of(&ana), "AAA111").await;

        let err = store.delete(Collection::Customers, id_of(&ana)).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
        assert_eq!(store.count(Collection::Customers, &[]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let store = MemoryRecordStore::new();
        let err = store.delete(Collection::PartsInventory, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_insert_with_children_is_atomic() {
        let store = MemoryRecordStore::new();
        let ana = seed_customer(&store, "Ana").await;
        seed_vehicle(&store, id_of(&ana), "TAKEN1").await;

        // la matrícula repetida hace fallar al hijo: el padre no debe quedar
        let err = store
            .insert_with_children(
                Collection::Customers,
                row(json!({ "name": "Huérfano" })),
                vec![ChildInsert::new(
                    Collection::Vehicles,
                    "customer_id",
                    vec![row(json!({ "make": "Ford", "model": "Focus", "year": 2012, "license_plate": "TAKEN1" }))],
                )],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
        assert_eq!(store.count(Collection::Customers, &[]).await.unwrap(), 1);

        let created = store
            .insert_with_children(
                Collection::Customers,
                row(json!({ "name": "Carla" })),
                vec![ChildInsert::new(
                    Collection::Vehicles,
                    "customer_id",
                    vec![row(json!({ "make": "Ford", "model": "Focus", "year": 2012, "license_plate": "NEW001" }))],
                )],
            )
            .await
            .unwrap();
        let vehicles = store
            .count(Collection::Vehicles, &[Filter::eq("customer_id", id_of(&created).to_string())])
            .await
            .unwrap();
        assert_eq!(vehicles, 1);
    }

    #[tokio::test]
    async fn test_update_touches_updated_at_and_keeps_checks() {
        let store = MemoryRecordStore::new();
        let part = store
            .insert(
                Collection::PartsInventory,
                row(json!({ "name": "Filtro", "quantity": 5, "unit_price": "7.50", "reorder_point": 2 })),
            )
            .await
            .unwrap();

        let updated = store
            .update(Collection::PartsInventory, id_of(&part), row(json!({ "quantity": 1 })))
            .await
            .unwrap();
        assert_eq!(updated["quantity"], json!(1));
        assert!(updated["updated_at"].is_string());

        let err = store
            .update(Collection::PartsInventory, id_of(&part), row(json!({ "quantity": -3 })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::CheckViolation(_)));
    }

    #[tokio::test]
    async fn test_column_lte_filter_compares_each_row() {
        let store = MemoryRecordStore::new();
        for (name, quantity, reorder) in [("a", 5, 10), ("b", 10, 10), ("c", 11, 10), ("d", 300, 200)] {
            store
                .insert(
                    Collection::PartsInventory,
                    row(json!({ "name": name, "quantity": quantity, "unit_price": "1", "reorder_point": reorder })),
                )
                .await
                .unwrap();
        }
        let low = store
            .count(Collection::PartsInventory, &[Filter::column_lte("quantity", "reorder_point")])
            .await
            .unwrap();
        assert_eq!(low, 2);
    }

    async fn seed_job_part(store: &MemoryRecordStore) -> (Row, Row) {
        let customer = seed_customer(store, "Ana").await;
        let vehicle = seed_vehicle(store, id_of(&customer), "7777XYZ").await;
        let service = store
            .insert(
                Collection::Services,
                row(json!({ "name": "Aceite", "estimated_hours": "1", "base_price": "40" })),
            )
            .await
            .unwrap();
        let mechanic = store
            .insert(Collection::Mechanics, row(json!({ "name": "Luis", "specialization": "Motor" })))
            .await
            .unwrap();
        let part = store
            .insert(
                Collection::PartsInventory,
                row(json!({ "name": "Filtro", "quantity": 5, "unit_price": "7.50", "reorder_point": 2 })),
            )
            .await
            .unwrap();
        let job = store
            .insert(
                Collection::Jobs,
                row(json!({
                    "vehicle_id": id_of(&vehicle).to_string(),
                    "service_id": id_of(&service).to_string(),
                    "mechanic_id": id_of(&mechanic).to_string(),
                    "status": "pending",
                    "scheduled_date": "2024-05-15T09:00:00Z",
                    "total_cost": "0",
                })),
            )
            .await
            .unwrap();
        let line = store
            .insert(
                Collection::JobParts,
                row(json!({
                    "job_id": id_of(&job).to_string(),
                    "part_id": id_of(&part).to_string(),
                    "quantity": 2,
                    "price_at_time": "7.50",
                })),
            )
            .await
            .unwrap();
        (job, line)
    }

    #[tokio::test]
    async fn test_price_at_time_is_immutable() {
        let store = MemoryRecordStore::new();
        let (_, line) = seed_job_part(&store).await;

        let err = store
            .update(Collection::JobParts, id_of(&line), row(json!({ "price_at_time": "1.00" })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableColumn { .. }));

        let stored = store
            .get(Collection::JobParts, id_of(&line), &Select::all())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["price_at_time"], line["price_at_time"]);
    }

    #[tokio::test]
    async fn test_delete_job_cascades_to_job_parts() {
        let store = MemoryRecordStore::new();
        let (job, line) = seed_job_part(&store).await;

        store.delete(Collection::Jobs, id_of(&job)).await.unwrap();

        let remaining = store
            .get(Collection::JobParts, id_of(&line), &Select::all())
            .await
            .unwrap();
        assert!(remaining.is_none());
    }
}
