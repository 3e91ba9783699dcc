//! Normalización de valores de escritura
//!
//! Antes de escribir, cada backend pasa la fila por `prepare_insert` o
//! `prepare_update`: se rechazan columnas desconocidas o generadas, se
//! comprueban tipos y CHECKs, y se deja cada valor en su forma canónica
//! (decimales como texto, timestamps RFC 3339, uuids en minúscula).

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;
use uuid::Uuid;

use super::collection::{Check, Collection, Column, ColumnKind, NUMERIC_SCALE};
use super::query::Row;
use super::{StoreError, StoreResult};

/// Valida y normaliza una fila para `insert`
pub fn prepare_insert(collection: Collection, row: Row) -> StoreResult<Row> {
    let mut prepared = prepare_columns(collection, row, false)?;

    for column in collection.columns() {
        if column.generated || column.nullable {
            continue;
        }
        match prepared.get(column.name) {
            Some(v) if !v.is_null() => {}
            _ => {
                return Err(StoreError::MissingColumn {
                    collection,
                    column: column.name.to_string(),
                })
            }
        }
    }
    for column in collection.columns().iter().filter(|c| c.nullable && !c.generated) {
        prepared.entry(column.name.to_string()).or_insert(Value::Null);
    }
    Ok(prepared)
}

/// Valida y normaliza un parche parcial para `update`
pub fn prepare_update(collection: Collection, patch: Row) -> StoreResult<Row> {
    prepare_columns(collection, patch, true)
}

fn prepare_columns(collection: Collection, row: Row, is_update: bool) -> StoreResult<Row> {
    let mut prepared = Row::new();
    for (name, value) in row {
        let column = collection
            .column(&name)
            .ok_or_else(|| StoreError::UnknownColumn {
                collection,
                column: name.clone(),
            })?;
        if column.generated {
            return Err(StoreError::InvalidValue {
                collection,
                column: name,
                reason: "column is generated by the store".to_string(),
            });
        }
        if is_update && collection.immutable_columns().contains(&column.name) {
            return Err(StoreError::ImmutableColumn { collection, column: name });
        }
        let value = normalize(collection, column, value)?;
        prepared.insert(name, value);
    }
    Ok(prepared)
}

/// Comprueba tipo, nulabilidad y CHECK de un valor
pub fn normalize(collection: Collection, column: &Column, value: Value) -> StoreResult<Value> {
    let invalid = |reason: &str| StoreError::InvalidValue {
        collection,
        column: column.name.to_string(),
        reason: reason.to_string(),
    };

    if value.is_null() {
        return if column.nullable {
            Ok(Value::Null)
        } else {
            Err(StoreError::MissingColumn {
                collection,
                column: column.name.to_string(),
            })
        };
    }

    let normalized = match column.kind {
        ColumnKind::Uuid => {
            let text = value.as_str().ok_or_else(|| invalid("expected uuid string"))?;
            let id = Uuid::parse_str(text).map_err(|_| invalid("malformed uuid"))?;
            Value::String(id.to_string())
        }
        ColumnKind::Text => match value {
            Value::String(s) => Value::String(s),
            _ => return Err(invalid("expected string")),
        },
        ColumnKind::Integer => {
            let n = value.as_i64().ok_or_else(|| invalid("expected integer"))?;
            i32::try_from(n).map_err(|_| invalid("integer out of range"))?;
            Value::from(n)
        }
        ColumnKind::Numeric => {
            let d = decimal_of(&value).ok_or_else(|| invalid("expected decimal"))?;
            Value::String(to_numeric_scale(d).to_string())
        }
        ColumnKind::Timestamp => {
            let text = value.as_str().ok_or_else(|| invalid("expected timestamp string"))?;
            let ts = DateTime::parse_from_rfc3339(text)
                .map_err(|_| invalid("expected RFC 3339 timestamp"))?
                .with_timezone(&Utc);
            Value::String(ts.to_rfc3339())
        }
    };

    check(collection, column, &normalized)?;
    Ok(normalized)
}

/// Redondeo al escribir, igual que PostgreSQL con NUMERIC(p, 2)
fn to_numeric_scale(value: Decimal) -> Decimal {
    let mut scaled = value.round_dp_with_strategy(NUMERIC_SCALE, RoundingStrategy::MidpointAwayFromZero);
    scaled.rescale(NUMERIC_SCALE);
    scaled
}

fn check(collection: Collection, column: &Column, value: &Value) -> StoreResult<()> {
    let violated = match column.check {
        Check::None => false,
        Check::NonNegative => decimal_of(value).map(|d| d < Decimal::ZERO).unwrap_or(false),
        Check::Positive => decimal_of(value).map(|d| d <= Decimal::ZERO).unwrap_or(false),
        Check::OneOf(allowed) => value.as_str().map(|s| !allowed.contains(&s)).unwrap_or(true),
    };
    if violated {
        Err(StoreError::CheckViolation(format!(
            "{}.{} rejects value {}",
            collection, column.name, value
        )))
    } else {
        Ok(())
    }
}

/// Lee un decimal desde texto o número JSON
pub fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                Decimal::from_str(&n.to_string()).ok()
            }
        }
        _ => None,
    }
}

/// Representación textual usada al enlazar parámetros en SQL
pub fn bind_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Orden entre dos valores de una columna de tipo `kind`
pub fn compare(kind: ColumnKind, a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_null() || b.is_null() {
        return None;
    }
    match kind {
        ColumnKind::Integer | ColumnKind::Numeric => decimal_of(a)?.partial_cmp(&decimal_of(b)?),
        ColumnKind::Timestamp => {
            let a = DateTime::parse_from_rfc3339(a.as_str()?).ok()?;
            let b = DateTime::parse_from_rfc3339(b.as_str()?).ok()?;
            Some(a.cmp(&b))
        }
        ColumnKind::Uuid => {
            let a = Uuid::parse_str(a.as_str()?).ok()?;
            let b = Uuid::parse_str(b.as_str()?).ok()?;
            Some(a.cmp(&b))
        }
        ColumnKind::Text => Some(a.as_str()?.cmp(b.as_str()?)),
    }
}
