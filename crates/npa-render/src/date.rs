//! Cover-page date format: `DD MMM YYYY` with Portuguese month abbreviations

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// Abbreviation for a one-based month number
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// `15 JAN 2025`; an unset date prints as an empty string
pub fn format_issue_date(date: Option<NaiveDate>) -> String {
    let Some(date) = date else {
        return String::new();
    };
    let month = month_abbreviation(date.month()).unwrap_or_default();
    format!("{:02} {} {}", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_issue_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15);
        assert_eq!(format_issue_date(date), "15 JAN 2025");
        let date = NaiveDate::from_ymd_opt(2024, 12, 3);
        assert_eq!(format_issue_date(date), "03 DEZ 2024");
    }

    #[test]
    fn test_missing_date_is_blank() {
        assert_eq!(format_issue_date(None), "");
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_abbreviation(0), None);
        assert_eq!(month_abbreviation(2), Some("FEV"));
        assert_eq!(month_abbreviation(13), None);
    }
}
