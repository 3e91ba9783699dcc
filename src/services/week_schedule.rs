//! Agenda semanal: ventana de 7 días y reparto de trabajos por día

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
}

impl WeekWindow {
    /// Semana que contiene `reference`, empezando en `week_starts_on`
    pub fn containing(reference: NaiveDate, week_starts_on: Weekday) -> Self {
        let offset = (reference.weekday().num_days_from_sunday() + 7
            - week_starts_on.num_days_from_sunday())
            % 7;
        Self {
            start: reference - Duration::days(offset as i64),
        }
    }

    /// Último día incluido
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7).map(|i| self.start + Duration::days(i)).collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    /// Rango semiabierto [inicio, inicio + 7 días) en UTC
    pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self.start.and_time(NaiveTime::MIN).and_utc();
        (from, from + Duration::days(7))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBucket<T> {
    pub date: NaiveDate,
    pub items: Vec<T>,
}

/// Reparte `items` en los 7 días de la ventana; lo que cae fuera se descarta
pub fn bucket_by_day<T, F>(window: &WeekWindow, items: Vec<T>, date_of: F) -> Vec<DayBucket<T>>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut buckets: Vec<DayBucket<T>> = window
        .days()
        .into_iter()
        .map(|date| DayBucket { date, items: Vec::new() })
        .collect();

    for item in items {
        let date = date_of(&item);
        if !window.contains(date) {
            continue;
        }
        let index = (date - window.start).num_days() as usize;
        buckets[index].items.push(item);
    }
    buckets
}

/// Lee el día de inicio de semana desde configuración ("sunday", "mon", ...)
pub fn parse_week_start(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}
