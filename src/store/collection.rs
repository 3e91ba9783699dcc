//! Esquema de colecciones
//!
//! Describe las tablas que expone el record store: columnas, tipos,
//! restricciones, claves foráneas y relaciones navegables. Ambos backends
//! (PostgreSQL y memoria) leen de aquí, así que las reglas de integridad
//! son las mismas en los dos.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Colecciones disponibles en el store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Customers,
    Vehicles,
    Services,
    Mechanics,
    PartsInventory,
    Jobs,
    JobParts,
}

/// Decimales de las columnas `Numeric` (NUMERIC(p, 2) en la migración)
pub const NUMERIC_SCALE: u32 = 2;

/// Tipo lógico de una columna
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    Text,
    Integer,
    Numeric,
    Timestamp,
}

impl ColumnKind {
    /// Cast SQL usado al enlazar parámetros como texto
    pub fn sql_cast(&self) -> &'static str {
        match self {
            ColumnKind::Uuid => "uuid",
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Timestamp => "timestamptz",
        }
    }
}

/// Restricción CHECK sobre el valor de una columna
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    None,
    NonNegative,
    Positive,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// Generada por el store (id, timestamps); no se acepta en escrituras
    pub generated: bool,
    pub unique: bool,
    pub check: Check,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column {
        name,
        kind,
        nullable: false,
        generated: false,
        unique: false,
        check: Check::None,
    }
}

const fn opt(name: &'static str, kind: ColumnKind) -> Column {
    Column {
        nullable: true,
        ..col(name, kind)
    }
}

const fn generated(name: &'static str, kind: ColumnKind) -> Column {
    Column {
        generated: true,
        ..col(name, kind)
    }
}

const fn checked(column: Column, check: Check) -> Column {
    Column { check, ..column }
}

const fn unique(column: Column) -> Column {
    Column {
        unique: true,
        ..column
    }
}

/// Valores válidos de jobs.status
pub const JOB_STATUSES: &[&str] = &["pending", "in_progress", "completed", "cancelled"];

const CUSTOMER_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("name", ColumnKind::Text),
    opt("email", ColumnKind::Text),
    opt("phone", ColumnKind::Text),
    opt("address", ColumnKind::Text),
    generated("created_at", ColumnKind::Timestamp),
];

const VEHICLE_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("customer_id", ColumnKind::Uuid),
    col("make", ColumnKind::Text),
    col("model", ColumnKind::Text),
    col("year", ColumnKind::Integer),
    unique(col("license_plate", ColumnKind::Text)),
    opt("vin", ColumnKind::Text),
    generated("created_at", ColumnKind::Timestamp),
];

const SERVICE_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("name", ColumnKind::Text),
    opt("description", ColumnKind::Text),
    checked(col("estimated_hours", ColumnKind::Numeric), Check::NonNegative),
    checked(col("base_price", ColumnKind::Numeric), Check::NonNegative),
    generated("created_at", ColumnKind::Timestamp),
];

const MECHANIC_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("name", ColumnKind::Text),
    col("specialization", ColumnKind::Text),
    checked(opt("hourly_rate", ColumnKind::Numeric), Check::NonNegative),
    generated("created_at", ColumnKind::Timestamp),
];

const PART_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("name", ColumnKind::Text),
    unique(opt("part_number", ColumnKind::Text)),
    opt("description", ColumnKind::Text),
    checked(col("quantity", ColumnKind::Integer), Check::NonNegative),
    checked(col("unit_price", ColumnKind::Numeric), Check::NonNegative),
    checked(col("reorder_point", ColumnKind::Integer), Check::NonNegative),
    generated("created_at", ColumnKind::Timestamp),
    generated("updated_at", ColumnKind::Timestamp),
];

const JOB_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("vehicle_id", ColumnKind::Uuid),
    col("service_id", ColumnKind::Uuid),
    col("mechanic_id", ColumnKind::Uuid),
    checked(col("status", ColumnKind::Text), Check::OneOf(JOB_STATUSES)),
    col("scheduled_date", ColumnKind::Timestamp),
    opt("completed_at", ColumnKind::Timestamp),
    checked(col("total_cost", ColumnKind::Numeric), Check::NonNegative),
    opt("notes", ColumnKind::Text),
    generated("created_at", ColumnKind::Timestamp),
];

const JOB_PART_COLUMNS: &[Column] = &[
    generated("id", ColumnKind::Uuid),
    col("job_id", ColumnKind::Uuid),
    col("part_id", ColumnKind::Uuid),
    checked(col("quantity", ColumnKind::Integer), Check::Positive),
    checked(col("price_at_time", ColumnKind::Numeric), Check::NonNegative),
    generated("created_at", ColumnKind::Timestamp),
];

/// Qué ocurre con las filas hijas al borrar la fila referenciada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Restrict,
    Cascade,
}

#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub column: &'static str,
    pub target: Collection,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// La fila actual guarda la clave foránea (`self.fk = target.id`)
    BelongsTo { foreign_key: &'static str },
    /// La colección destino guarda la clave foránea (`target.fk = self.id`)
    HasMany { foreign_key: &'static str },
}

/// Relación navegable en lecturas con join
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub name: &'static str,
    pub target: Collection,
    pub kind: RelationKind,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Customers,
        Collection::Vehicles,
        Collection::Services,
        Collection::Mechanics,
        Collection::PartsInventory,
        Collection::Jobs,
        Collection::JobParts,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Customers => "customers",
            Collection::Vehicles => "vehicles",
            Collection::Services => "services",
            Collection::Mechanics => "mechanics",
            Collection::PartsInventory => "parts_inventory",
            Collection::Jobs => "jobs",
            Collection::JobParts => "job_parts",
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Collection::Customers => CUSTOMER_COLUMNS,
            Collection::Vehicles => VEHICLE_COLUMNS,
            Collection::Services => SERVICE_COLUMNS,
            Collection::Mechanics => MECHANIC_COLUMNS,
            Collection::PartsInventory => PART_COLUMNS,
            Collection::Jobs => JOB_COLUMNS,
            Collection::JobParts => JOB_PART_COLUMNS,
        }
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// Columnas que no pueden cambiar una vez escritas
    pub fn immutable_columns(&self) -> &'static [&'static str] {
        match self {
            Collection::JobParts => &["job_id", "part_id", "price_at_time"],
            _ => &[],
        }
    }

    /// Columna que el store refresca en cada update
    pub fn touch_column(&self) -> Option<&'static str> {
        match self {
            Collection::PartsInventory => Some("updated_at"),
            _ => None,
        }
    }

    pub fn foreign_keys(&self) -> &'static [ForeignKey] {
        const VEHICLE_FKS: &[ForeignKey] = &[ForeignKey {
            column: "customer_id",
            target: Collection::Customers,
            on_delete: OnDelete::Restrict,
        }];
        const JOB_FKS: &[ForeignKey] = &[
            ForeignKey {
                column: "vehicle_id",
                target: Collection::Vehicles,
                on_delete: OnDelete::Restrict,
            },
            ForeignKey {
                column: "service_id",
                target: Collection::Services,
                on_delete: OnDelete::Restrict,
            },
            ForeignKey {
                column: "mechanic_id",
                target: Collection::Mechanics,
                on_delete: OnDelete::Restrict,
            },
        ];
        const JOB_PART_FKS: &[ForeignKey] = &[
            ForeignKey {
                column: "job_id",
                target: Collection::Jobs,
                on_delete: OnDelete::Cascade,
            },
            ForeignKey {
                column: "part_id",
                target: Collection::PartsInventory,
                on_delete: OnDelete::Restrict,
            },
        ];

        match self {
            Collection::Vehicles => VEHICLE_FKS,
            Collection::Jobs => JOB_FKS,
            Collection::JobParts => JOB_PART_FKS,
            _ => &[],
        }
    }

    pub fn relations(&self) -> &'static [Relation] {
        const CUSTOMER_RELATIONS: &[Relation] = &[Relation {
            name: "vehicles",
            target: Collection::Vehicles,
            kind: RelationKind::HasMany { foreign_key: "customer_id" },
        }];
        const VEHICLE_RELATIONS: &[Relation] = &[
            Relation {
                name: "customer",
                target: Collection::Customers,
                kind: RelationKind::BelongsTo { foreign_key: "customer_id" },
            },
            Relation {
                name: "jobs",
                target: Collection::Jobs,
                kind: RelationKind::HasMany { foreign_key: "vehicle_id" },
            },
        ];
        const JOB_RELATIONS: &[Relation] = &[
            Relation {
                name: "vehicle",
                target: Collection::Vehicles,
                kind: RelationKind::BelongsTo { foreign_key: "vehicle_id" },
            },
            Relation {
                name: "service",
                target: Collection::Services,
                kind: RelationKind::BelongsTo { foreign_key: "service_id" },
            },
            Relation {
                name: "mechanic",
                target: Collection::Mechanics,
                kind: RelationKind::BelongsTo { foreign_key: "mechanic_id" },
            },
            Relation {
                name: "parts",
                target: Collection::JobParts,
                kind: RelationKind::HasMany { foreign_key: "job_id" },
            },
        ];
        const JOB_PART_RELATIONS: &[Relation] = &[
            Relation {
                name: "part",
                target: Collection::PartsInventory,
                kind: RelationKind::BelongsTo { foreign_key: "part_id" },
            },
            Relation {
                name: "job",
                target: Collection::Jobs,
                kind: RelationKind::BelongsTo { foreign_key: "job_id" },
            },
        ];
        const SERVICE_RELATIONS: &[Relation] = &[Relation {
            name: "jobs",
            target: Collection::Jobs,
            kind: RelationKind::HasMany { foreign_key: "service_id" },
        }];
        const MECHANIC_RELATIONS: &[Relation] = &[Relation {
            name: "jobs",
            target: Collection::Jobs,
            kind: RelationKind::HasMany { foreign_key: "mechanic_id" },
        }];

        match self {
            Collection::Customers => CUSTOMER_RELATIONS,
            Collection::Vehicles => VEHICLE_RELATIONS,
            Collection::Jobs => JOB_RELATIONS,
            Collection::JobParts => JOB_PART_RELATIONS,
            Collection::Services => SERVICE_RELATIONS,
            Collection::Mechanics => MECHANIC_RELATIONS,
            Collection::PartsInventory => &[],
        }
    }

    pub fn relation(&self, name: &str) -> Option<&'static Relation> {
        self.relations().iter().find(|r| r.name == name)
    }

    /// Claves foráneas de otras colecciones que apuntan a esta
    pub fn referencing(&self) -> impl Iterator<Item = (Collection, &'static ForeignKey)> + '_ {
        Collection::ALL.into_iter().flat_map(move |source| {
            source
                .foreign_keys()
                .iter()
                .filter(move |fk| fk.target == *self)
                .map(move |fk| (source, fk))
        })
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_relation_points_to_existing_columns() {
        for collection in Collection::ALL {
            for relation in collection.relations() {
                match relation.kind {
                    RelationKind::BelongsTo { foreign_key } => {
                        assert!(collection.column(foreign_key).is_some(), "{}.{}", collection, foreign_key);
                    }
                    RelationKind::HasMany { foreign_key } => {
                        assert!(relation.target.column(foreign_key).is_some(), "{}.{}", relation.target, foreign_key);
                    }
                }
            }
        }
    }

    #[test]
    fn test_referencing_customers() {
        let refs: Vec<_> = Collection::Customers.referencing().collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0, Collection::Vehicles);
        assert_eq!(refs[0].1.column, "customer_id");
    }

    #[test]
    fn test_job_parts_cascade_with_job() {
        let (_, fk) = Collection::Jobs
            .referencing()
            .find(|(source, _)| *source == Collection::JobParts)
            .expect("job_parts referencia jobs");
        assert_eq!(fk.on_delete, OnDelete::Cascade);
    }

    #[test]
    fn test_price_at_time_is_immutable() {
        assert!(Collection::JobParts.immutable_columns().contains(&"price_at_time"));
    }
}
