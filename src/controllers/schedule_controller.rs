use chrono::{Utc, Weekday};
use std::sync::Arc;

use crate::dto::schedule_dto::WeekScheduleResponse;
use crate::repositories::JobRepository;
use crate::services::week_schedule::{bucket_by_day, WeekWindow};
use crate::store::RecordStore;
use crate::utils::errors::AppResult;
use crate::utils::validation::parse_date;

pub struct ScheduleController {
    jobs: JobRepository,
    week_starts_on: Weekday,
}

impl ScheduleController {
    pub fn new(store: Arc<dyn RecordStore>, week_starts_on: Weekday) -> Self {
        Self {
            jobs: JobRepository::new(store),
            week_starts_on,
        }
    }

    /// Semana que contiene `date` (hoy por defecto) con sus trabajos por día
    pub async fn week(&self, date: Option<String>) -> AppResult<WeekScheduleResponse> {
        let reference = match date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => parse_date(d)?,
            None => Utc::now().date_naive(),
        };
        let window = WeekWindow::containing(reference, self.week_starts_on);
        let (from, to) = window.utc_range();

        let jobs = self.jobs.scheduled_between(from, to).await?;
        let days = bucket_by_day(&window, jobs, |job| job.job.scheduled_date.date_naive());

        Ok(WeekScheduleResponse {
            week_start: window.start,
            week_end: window.end(),
            previous_week: window.previous().start,
            next_week: window.next().start,
            days,
        })
    }
}
