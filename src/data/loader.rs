use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, trace};

use super::model::{Measurement, WorkingSet};
use crate::error::{CleanupError, Result};

/// Rows with fewer fields than this are skipped (blank lines, footers).
pub const MIN_FIELDS: usize = 13;

/// Field positions of the channels we keep. Fields 6–9 and 11 are ignored.
const ROP: usize = 1;
const TG: usize = 2;
const C1: usize = 3;
const C2: usize = 4;
const C3: usize = 5;
const C4: usize = 10;
const GAMMA: usize = 12;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a Bloodhound export from disk.
///
/// Despite the `.xls` extension these exports are plain text: fixed-width
/// columns separated by spaces and tabs, one depth per row.
pub fn load_file(path: &Path) -> Result<WorkingSet> {
    let file = File::open(path).map_err(|source| CleanupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ws = parse_export(BufReader::new(file)).map_err(|err| match err {
        CleanupError::Io { source, .. } => CleanupError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!("loaded {} rows from {}", ws.len(), path.display());
    Ok(ws)
}

/// Parse an export from any buffered reader.
///
/// Short rows and rows whose first field is not an integer (the header) are
/// skipped. Once a row is accepted every channel must parse, otherwise the
/// whole load fails with [`CleanupError::MalformedRow`].
pub fn parse_export<R: BufRead>(reader: R) -> Result<WorkingSet> {
    let mut ws = WorkingSet::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| CleanupError::Io {
            path: "<input>".into(),
            source,
        })?;

        match parse_row(&line, line_no)? {
            Some(m) => ws.add(m),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("skipped {skipped} header, blank or short rows");
    }
    Ok(ws)
}

/// Parse an export held in memory.
pub fn parse_str(text: &str) -> Result<WorkingSet> {
    parse_export(text.as_bytes())
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Split a line into fields. Every tab is a field boundary, so two tabs in a
/// row leave an empty field; within a tab-delimited cell, runs of spaces
/// separate fields and padding around a cell is ignored.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    for cell in line.trim_end_matches(['\r', '\n']).split('\t') {
        let cell = cell.trim_matches(' ');
        if cell.is_empty() {
            fields.push(cell);
        } else {
            fields.extend(cell.split(' ').filter(|f| !f.is_empty()));
        }
    }
    // A blank line is a single empty cell, not one empty field.
    if fields.len() == 1 && fields[0].is_empty() {
        fields.clear();
    }
    fields
}

/// `Ok(None)` for rows that are not data; `Err` for data rows with a bad channel.
fn parse_row(line: &str, line_no: usize) -> Result<Option<Measurement>> {
    let fields = split_fields(line);
    if fields.len() < MIN_FIELDS {
        trace!("line {line_no}: {} fields, skipping", fields.len());
        return Ok(None);
    }

    let Ok(depth) = fields[0].parse::<i64>() else {
        trace!("line {line_no}: '{}' is not a depth, skipping", fields[0]);
        return Ok(None);
    };

    let channel = |field: usize| -> Result<f64> {
        let raw = fields[field];
        raw.parse::<f64>()
            .map_err(|source| CleanupError::MalformedRow {
                line: line_no,
                field,
                value: raw.to_string(),
                source,
            })
    };

    Ok(Some(Measurement::new(
        depth,
        channel(ROP)?,
        channel(TG)?,
        channel(C1)?,
        channel(C2)?,
        channel(C3)?,
        channel(C4)?,
        channel(GAMMA)?,
    )))
}
