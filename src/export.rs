//! Export of one evaluation as a tabular record
//!
//! The record is written to a temporary sibling file and renamed into place
//! once complete, so a failed export never leaves a partial file behind.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rusqlite::Connection;

use crate::calculator::Evaluation;
use crate::error::Result;

/// Column order of the exported record
pub const COLUMNS: [&str; 8] = [
    "steam_pressure",
    "steam_time",
    "fixed_side_temp",
    "mobile_side_temp",
    "bead_density",
    "weight_g",
    "length_mm",
    "width_mm",
];

const TABLE: &str = "molding_result";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// SQLite database with a single `molding_result` table
    Sqlite,
    /// Comma-separated text with a header row
    Csv,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Sqlite => "molding_result.sqlite",
            ExportFormat::Csv => "molding_result.csv",
        }
    }
}

/// Inputs followed by outputs, exactly as displayed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRecord {
    pub values: [f64; 8],
}

impl ExportRecord {
    pub fn from_evaluation(eval: &Evaluation) -> Self {
        let inputs = eval.params.values();
        let out = &eval.output;
        Self {
            values: [
                inputs[0],
                inputs[1],
                inputs[2],
                inputs[3],
                inputs[4],
                out.weight_g,
                out.length_mm,
                out.width_mm,
            ],
        }
    }
}

/// Write the record into `out_dir` under the fixed file name for `format`
pub fn write_record(eval: &Evaluation, format: ExportFormat, out_dir: &Path) -> Result<PathBuf> {
    let record = ExportRecord::from_evaluation(eval);
    let target = out_dir.join(format.file_name());
    let partial = out_dir.join(format!(".{}.partial", format.file_name()));

    // Stale leftovers from an interrupted run
    if partial.exists() {
        fs::remove_file(&partial)?;
    }

    let written = match format {
        ExportFormat::Sqlite => write_sqlite(&partial, &record),
        ExportFormat::Csv => write_csv(&partial, &record),
    };

    let finished = written.and_then(|()| fs::rename(&partial, &target).map_err(Into::into));
    if let Err(e) = finished {
        if partial.exists() {
            if let Err(cleanup) = fs::remove_file(&partial) {
                eprintln!("  Could not remove {}: {}", partial.display(), cleanup);
            }
        }
        return Err(e);
    }

    Ok(target)
}

/// Create the record table
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS molding_result (
            steam_pressure REAL NOT NULL,
            steam_time REAL NOT NULL,
            fixed_side_temp REAL NOT NULL,
            mobile_side_temp REAL NOT NULL,
            bead_density REAL NOT NULL,
            weight_g REAL NOT NULL,
            length_mm REAL NOT NULL,
            width_mm REAL NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Insert a record row
pub fn insert_record(conn: &Connection, record: &ExportRecord) -> Result<()> {
    let v = &record.values;
    conn.execute(
        "INSERT INTO molding_result (steam_pressure, steam_time, fixed_side_temp, mobile_side_temp,
                                     bead_density, weight_g, length_mm, width_mm)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7]),
    )?;
    Ok(())
}

/// Read back every record stored in a database file
pub fn read_records(path: &Path) -> Result<Vec<ExportRecord>> {
    let conn = Connection::open(path)?;
    let mut stmt = conn.prepare(&format!("SELECT {} FROM {}", COLUMNS.join(", "), TABLE))?;

    let rows = stmt.query_map([], |row| {
        let mut values = [0.0; 8];
        for (i, value) in values.iter_mut().enumerate() {
            *value = row.get(i)?;
        }
        Ok(ExportRecord { values })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

fn write_sqlite(path: &Path, record: &ExportRecord) -> Result<()> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    insert_record(&conn, record)?;
    conn.close().map_err(|(_, e)| e)?;
    Ok(())
}

/// Render the record as CSV; `{}` on f64 is the shortest exact round-trip form
pub fn to_csv(record: &ExportRecord) -> String {
    let row: Vec<String> = record.values.iter().map(|v| v.to_string()).collect();
    format!("{}\n{}\n", COLUMNS.join(","), row.join(","))
}

fn write_csv(path: &Path, record: &ExportRecord) -> Result<()> {
    fs::write(path, to_csv(record))?;
    Ok(())
}
