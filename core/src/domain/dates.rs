//! Date helpers for due-date entry and display.
//!
//! Due dates are typed as free-form digit strings and shown in DD/MM/YYYY
//! display form; they are stored as YYYY-MM-DD so that string comparison
//! matches chronological order.

use chrono::Datelike;

/// Rendered in place of a date that could not be parsed.
pub const INVALID_DATE_LABEL: &str = "invalid date";

/// Re-format raw input as DD/MM/YYYY while the user types.
///
/// Strips every non-digit character, re-inserts the separators after the
/// day and month groups, and caps the result at 10 characters. Applying
/// the function to its own output returns the same string.
pub fn format_for_display(raw: &str) -> String {
    let mut formatted = String::new();
    for (i, c) in raw.chars().filter(|c| c.is_ascii_digit()).enumerate() {
        if i == 2 || i == 4 {
            formatted.push('/');
        }
        formatted.push(c);
    }
    formatted.truncate(10);
    formatted
}

/// Check whether a DD/MM/YYYY display string is a real calendar date.
///
/// Separators are ignored; exactly 8 digits must remain. Years are
/// accepted in the 1900-2100 window.
pub fn is_valid_calendar_date(display: &str) -> bool {
    let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 8 {
        return false;
    }

    let day: u32 = digits[0..2].parse().unwrap_or(0);
    let month: u32 = digits[2..4].parse().unwrap_or(0);
    let year: u32 = digits[4..8].parse().unwrap_or(0);

    if !(1..=31).contains(&day) {
        return false;
    }
    if !(1..=12).contains(&month) {
        return false;
    }
    if !(1900..=2100).contains(&year) {
        return false;
    }

    day <= days_in_month(year, month)
}

/// Rearrange a validated DD/MM/YYYY display string into YYYY-MM-DD.
///
/// Callers must run [`is_valid_calendar_date`] first; the output for an
/// unvalidated string is unspecified (the input is returned unchanged
/// when fewer than 8 digits are present).
pub fn to_storage_form(display: &str) -> String {
    let digits: String = display
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(8)
        .collect();
    if digits.len() != 8 {
        return display.to_string();
    }
    format!("{}-{}-{}", &digits[4..8], &digits[2..4], &digits[0..2])
}

/// Render a stored date for display as DD/MM/YYYY.
///
/// Accepts plain YYYY-MM-DD values as well as full RFC 3339 timestamps
/// (only the date part is used). Returns [`INVALID_DATE_LABEL`] when the
/// value cannot be parsed.
pub fn to_display_form(stored: &str) -> String {
    let date_part = stored.split('T').next().unwrap_or(stored);
    match chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => format!("{:02}/{:02}/{:04}", date.day(), date.month(), date.year()),
        Err(_) => INVALID_DATE_LABEL.to_string(),
    }
}

/// Get days in a month (accounting for leap years).
pub fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Check if a year is a leap year.
pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
