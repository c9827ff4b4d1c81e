// Tryout registrations: typed player records and raw-row normalization.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Registration sheet column indices (Google Forms response layout)
// ---------------------------------------------------------------------------

pub const COL_EMAIL: usize = 1;
pub const COL_NAME: usize = 2;
pub const COL_PHONE: usize = 3;
pub const COL_BIRTH_DATE: usize = 4;
pub const COL_GENDER: usize = 5;
pub const COL_STUDENT: usize = 6;
pub const COL_PREVIOUS_TEAM: usize = 7;
pub const COL_DESIRED_POSITIONS: usize = 8;
pub const COL_DESIRED_LEVEL: usize = 9;
pub const COL_REGISTRATION_NUMBER: usize = 10;

/// Spreadsheet rows are 1-based and row 1 is the header.
const ROW_NUMBER_OFFSET: u32 = 2;

/// Earliest birth year accepted from the form.
const MIN_BIRTH_YEAR: i32 = 1900;

/// One tryout registration. `name` is the key used everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Start number handed out at the tryout, if any.
    pub registration_number: Option<String>,
    /// Position in the feed, used when no registration number exists.
    pub row_number: u32,
    pub gender: String,
    pub birth_date: String,
    /// Birth year, parsed from `birth_date` when possible.
    pub year: Option<i32>,
    pub is_student: String,
    pub previous_team: String,
    pub desired_positions: String,
    pub desired_level: String,
    pub email: String,
    pub phone: String,
}

impl Player {
    /// A player with only a name set. Handy for tests and manual entries.
    pub fn named(name: &str) -> Self {
        Player {
            name: name.to_string(),
            registration_number: None,
            row_number: 0,
            gender: String::new(),
            birth_date: String::new(),
            year: None,
            is_student: String::new(),
            previous_team: String::new(),
            desired_positions: String::new(),
            desired_level: String::new(),
            email: String::new(),
            phone: String::new(),
        }
    }

    /// Label shown in lists: the registration number when present, else the
    /// feed row number.
    pub fn display_number(&self) -> String {
        match &self.registration_number {
            Some(n) => n.clone(),
            None => format!("r{}", self.row_number),
        }
    }
}

/// Read a cell, trimmed, defaulting to empty for short rows.
fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Convert the raw feed into player records.
///
/// Row 0 is the header and is skipped. Rows with an empty name cell are
/// dropped; every other field falls back to an empty string. Row numbers are
/// assigned to the surviving rows in feed order. Duplicate names are kept.
pub fn normalize_rows(rows: &[Vec<String>]) -> Vec<Player> {
    rows.iter()
        .skip(1)
        .filter(|row| !cell(row, COL_NAME).is_empty())
        .enumerate()
        .map(|(idx, row)| {
            let birth_date = cell(row, COL_BIRTH_DATE);
            let registration_number = cell(row, COL_REGISTRATION_NUMBER);
            Player {
                name: cell(row, COL_NAME),
                registration_number: if registration_number.is_empty() {
                    None
                } else {
                    Some(registration_number)
                },
                row_number: idx as u32 + ROW_NUMBER_OFFSET,
                gender: cell(row, COL_GENDER),
                year: parse_birth_year(&birth_date),
                birth_date,
                is_student: cell(row, COL_STUDENT),
                previous_team: cell(row, COL_PREVIOUS_TEAM),
                desired_positions: cell(row, COL_DESIRED_POSITIONS),
                desired_level: cell(row, COL_DESIRED_LEVEL),
                email: cell(row, COL_EMAIL),
                phone: cell(row, COL_PHONE),
            }
        })
        .collect()
}

/// Extract a birth year from the date formats seen on the registration form.
///
/// Accepts `dd.mm.yyyy`, `dd/mm/yyyy`, `yyyy-mm-dd` and a bare four-digit
/// year. Years before 1900 or after the current year are rejected, which
/// also catches two-digit years like `03.04.05`. Anything else yields `None`.
pub fn parse_birth_year(text: &str) -> Option<i32> {
    parse_birth_year_at(text, Local::now().year())
}

/// [`parse_birth_year`] with an explicit current year.
pub fn parse_birth_year_at(text: &str, current_year: i32) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let year = if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().ok()
    } else {
        ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
            .map(|date| date.year())
    }?;

    (MIN_BIRTH_YEAR..=current_year).contains(&year).then_some(year)
}
