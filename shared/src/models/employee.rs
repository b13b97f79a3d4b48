//! Employee and time-tracking models

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// An employee record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub fiscal_code: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub id_card_number: Option<String>,
    pub id_card_expiry: Option<NaiveDate>,
    pub licence_number: Option<String>,
    pub licence_expiry: Option<NaiveDate>,
    pub licence_categories: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn initials(&self) -> String {
        let mut initials = String::new();
        if let Some(c) = self.first_name.chars().next() {
            initials.extend(c.to_uppercase());
        }
        if let Some(c) = self.last_name.chars().next() {
            initials.extend(c.to_uppercase());
        }
        initials
    }
}

/// Absence categories for a work day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    #[default]
    None,
    Vacation,
    Sick,
    Leave,
    Other,
}

impl AbsenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceKind::None => "none",
            AbsenceKind::Vacation => "vacation",
            AbsenceKind::Sick => "sick",
            AbsenceKind::Leave => "leave",
            AbsenceKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(AbsenceKind::None),
            "vacation" => Some(AbsenceKind::Vacation),
            "sick" => Some(AbsenceKind::Sick),
            "leave" => Some(AbsenceKind::Leave),
            "other" => Some(AbsenceKind::Other),
            _ => None,
        }
    }
}

/// One tracked work day; unique per (employee, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkDay {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub work_date: NaiveDate,
    pub morning_start: Option<NaiveTime>,
    pub morning_end: Option<NaiveTime>,
    pub afternoon_start: Option<NaiveTime>,
    pub afternoon_end: Option<NaiveTime>,
    pub absence: AbsenceKind,
    pub absence_note: Option<String>,
    pub is_closed: bool,
    pub is_confirmed: bool,
    pub confirmed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkDay {
    pub fn worked_hours(&self) -> Duration {
        daily_hours(
            self.morning_start,
            self.morning_end,
            self.afternoon_start,
            self.afternoon_end,
        )
    }
}

/// Hours worked in a day: morning span plus afternoon span.
///
/// A lone morning-start paired with an afternoon-end counts as one
/// continuous span. Spans whose end does not follow the start contribute
/// nothing.
pub fn daily_hours(
    morning_start: Option<NaiveTime>,
    morning_end: Option<NaiveTime>,
    afternoon_start: Option<NaiveTime>,
    afternoon_end: Option<NaiveTime>,
) -> Duration {
    // Continuous day: clocked in at morning, out at evening, no break times
    if let (Some(start), None, None, Some(end)) =
        (morning_start, morning_end, afternoon_start, afternoon_end)
    {
        if end > start {
            return end - start;
        }
        return Duration::zero();
    }

    let mut total = Duration::zero();
    if let (Some(start), Some(end)) = (morning_start, morning_end) {
        if end > start {
            total = total + (end - start);
        }
    }
    if let (Some(start), Some(end)) = (afternoon_start, afternoon_end) {
        if end > start {
            total = total + (end - start);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_daily_hours_two_spans() {
        let hours = daily_hours(time(8, 0), time(12, 0), time(14, 0), time(18, 30));
        assert_eq!(hours, Duration::minutes(8 * 60 + 30));
    }

    #[test]
    fn test_daily_hours_continuous_day() {
        let hours = daily_hours(time(8, 0), None, None, time(17, 0));
        assert_eq!(hours, Duration::hours(9));
    }

    #[test]
    fn test_daily_hours_morning_only() {
        let hours = daily_hours(time(8, 0), time(12, 0), None, None);
        assert_eq!(hours, Duration::hours(4));
    }

    #[test]
    fn test_daily_hours_malformed_span_contributes_nothing() {
        let hours = daily_hours(time(12, 0), time(8, 0), time(14, 0), time(18, 0));
        assert_eq!(hours, Duration::hours(4));
    }

    #[test]
    fn test_daily_hours_empty() {
        assert_eq!(daily_hours(None, None, None, None), Duration::zero());
    }
}
