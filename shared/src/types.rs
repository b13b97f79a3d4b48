//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Italian,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Italian => "it",
            Language::English => "en",
        }
    }
}

/// Format a date for presentation in the given language.
///
/// The language is always an explicit parameter; no process-global locale
/// state is involved.
pub fn format_date(date: NaiveDate, language: Language) -> String {
    match language {
        Language::Italian => date.format("%d/%m/%Y").to_string(),
        Language::English => date.format("%Y-%m-%d").to_string(),
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_italian() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        assert_eq!(format_date(date, Language::Italian), "20/04/2025");
    }

    #[test]
    fn test_format_date_english() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        assert_eq!(format_date(date, Language::English), "2025-04-20");
    }
}
