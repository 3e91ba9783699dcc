//! Máquina de estados de los trabajos
//!
//! Cuatro estados, cualquier transición permitida y ninguno terminal.
//! Cambiar de estado no toca el inventario; solo ajusta `completed_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Estados que cuentan como trabajo abierto en el dashboard
    pub fn is_open(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("estado de trabajo desconocido: '{}'", s))
    }
}

/// Resultado de aplicar una transición
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: JobStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Todas las transiciones están permitidas
pub fn can_transition(_from: JobStatus, _to: JobStatus) -> bool {
    true
}

/// Aplica `to` sobre un trabajo con fecha de finalización `completed_at`
pub fn transition(
    to: JobStatus,
    completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Transition {
    let completed_at = match to {
        JobStatus::Completed => completed_at.or(Some(now)),
        JobStatus::Pending | JobStatus::InProgress => None,
        JobStatus::Cancelled => completed_at,
    };
    Transition { status: to, completed_at }
}
