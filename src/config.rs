//! Process configuration, read once at startup from the environment.

use chrono::{Datelike, Local, NaiveDate};

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    /// Base URL of the university schedule API; `None` disables
    /// schedule lookups (the dialog apologizes instead of crashing).
    pub schedule_api_url: Option<String>,
    pub semester_start: NaiveDate,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = std::env::var("SKILL_DB_PATH").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            format!("{home}/.timetable-skill/skill.db")
        });

        let port: u16 = std::env::var("SKILL_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let schedule_api_url = std::env::var("SCHEDULE_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let today = Local::now().date_naive();
        let semester_start = std::env::var("SEMESTER_START")
            .ok()
            .and_then(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|e| tracing::warn!(raw, error = %e, "bad SEMESTER_START, using default"))
                    .ok()
            })
            .unwrap_or_else(|| default_semester_start(today));

        Self {
            db_path,
            port,
            schedule_api_url,
            semester_start,
        }
    }
}

/// September 1st of the current academic year: the one that started
/// this autumn, or last autumn when we are in the spring term.
fn default_semester_start(today: NaiveDate) -> NaiveDate {
    let year = if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    };
    NaiveDate::from_ymd_opt(year, 9, 1).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autumn_dates_use_the_same_year() {
        let today = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        assert_eq!(
            default_semester_start(today),
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
        );
    }

    #[test]
    fn spring_dates_reach_back_to_last_autumn() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            default_semester_start(today),
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
        );
    }
}
