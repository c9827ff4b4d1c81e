// Spreadsheet export: name, e-mail and a "played last year" lookup formula.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::info;

use uttak_core::config::ExportConfig;
use uttak_core::player::Player;

pub const HEADER: [&str; 3] = ["Navn", "E-post", "Spilte i fjor"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Which list is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// The selected team, in position order.
    Team,
    /// The available list as currently filtered and sorted.
    Filtered,
}

impl ExportScope {
    pub fn slug(&self) -> &'static str {
        match self {
            ExportScope::Team => "lag",
            ExportScope::Filtered => "utvalg",
        }
    }
}

/// Formula that reports whether the name in column A of `row` appears in
/// `column` of `sheet`. `;` separates arguments, as in Norwegian-locale
/// spreadsheets.
pub fn played_last_year_formula(sheet: &str, column: &str, row: usize) -> String {
    let sheet = sheet.replace('\'', "''");
    let column = column.trim().to_uppercase();
    format!("=IF(COUNTIF('{sheet}'!{column}:{column};A{row})>0;\"Ja\";\"Nei\")")
}

/// Leading characters a spreadsheet reads as the start of a formula.
const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Quote form-supplied text so a spreadsheet shows it as text instead of
/// evaluating it.
pub fn neutralize_cell(text: &str) -> Cow<'_, str> {
    if text.starts_with(FORMULA_TRIGGERS) {
        Cow::Owned(format!("'{text}"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Write the export table for `players` to any writer. Name and e-mail are
/// neutralized; the lookup formula is written as is.
pub fn write_csv<W: Write>(
    writer: W,
    players: &[&Player],
    config: &ExportConfig,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for (idx, player) in players.iter().enumerate() {
        // Row 1 holds the header.
        let formula = played_last_year_formula(&config.lookup_sheet, &config.lookup_column, idx + 2);
        let name = neutralize_cell(&player.name);
        let email = neutralize_cell(&player.email);
        wtr.write_record([name.as_ref(), email.as_ref(), formula.as_str()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// File name for an export made at `now`.
pub fn export_file_name(scope: ExportScope, now: DateTime<Local>) -> String {
    format!("uttak_{}_{}.csv", scope.slug(), now.format("%Y%m%d_%H%M%S"))
}

/// Write `players` to a timestamped CSV under `config.directory`, relative to
/// `base_dir` unless absolute. Returns the file written.
pub fn export_players(
    players: &[&Player],
    scope: ExportScope,
    config: &ExportConfig,
    base_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    if players.is_empty() {
        return Err(ExportError::Empty);
    }

    let dir = base_dir.join(&config.directory);
    std::fs::create_dir_all(&dir).map_err(|e| ExportError::Io {
        path: dir.clone(),
        source: e,
    })?;

    let path = dir.join(export_file_name(scope, now));
    let file = std::fs::File::create(&path).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    write_csv(file, players, config)?;

    info!("exported {} players to {}", players.len(), path.display());
    Ok(path)
}
