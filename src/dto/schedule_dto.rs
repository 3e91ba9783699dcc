use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::job::JobSummary;
use crate::services::week_schedule::DayBucket;

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    /// Fecha de referencia `YYYY-MM-DD`; por defecto hoy (UTC)
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeekScheduleResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub previous_week: NaiveDate,
    pub next_week: NaiveDate,
    pub days: Vec<DayBucket<JobSummary>>,
}
