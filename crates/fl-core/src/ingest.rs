//! Session export ingest.
//!
//! The export is the CSV rendition of the analytics sheet: a banner line,
//! then the header row, then data rows in the fixed 12-column layout of
//! [`fl_common::schema`]. Every metric appears twice (program scope and
//! totals scope); the two copies are verified equal column-by-column and
//! collapsed to one before the rest of the pipeline sees the data.

use chrono::{NaiveDate, NaiveDateTime};
use fl_common::schema::{ColumnId, COLUMN_COUNT, SCOPE_PAIRS};
use fl_common::{Error, Result, UserType};
use fl_report::ScopeCheck;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// One session row after scope collapse.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    /// Raw `YYYYMMDDHH` value as exported.
    pub date_hour_raw: String,
    /// Parsed hour, when the raw value is well-formed.
    pub date_hour: Option<NaiveDateTime>,
    pub page_path: String,
    pub user_type: UserType,
    pub source: String,
    pub sessions: f64,
    pub eng_rate: f64,
    pub key_events: f64,
    pub eng_time_secs: f64,
}

/// Result of loading an export: the collapsed records plus the outcome of
/// the scope verification (always all-identical, since a mismatch aborts).
#[derive(Debug)]
pub struct Ingest {
    pub records: Vec<SessionRecord>,
    pub scope_checks: Vec<ScopeCheck>,
}

/// Load a session export from `path`.
pub fn load_sessions(path: &Path) -> Result<Ingest> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut raw_rows: Vec<Vec<f64>> = Vec::new();
    let mut records: Vec<SessionRecord> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // Row 0 is the report banner, row 1 the header.
        if idx == 0 {
            continue;
        }
        if idx == 1 {
            if record.len() != COLUMN_COUNT {
                return Err(Error::MissingHeader(format!(
                    "header row has {} fields, expected {}",
                    record.len(),
                    COLUMN_COUNT
                )));
            }
            continue;
        }
        if record.len() != COLUMN_COUNT {
            return Err(Error::ColumnCount {
                row: idx,
                expected: COLUMN_COUNT,
                found: record.len(),
            });
        }

        let number = |col: ColumnId| -> Result<f64> {
            let raw = record.get(col.index()).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| Error::BadNumber {
                row: idx,
                column: col.name(),
                value: raw.to_string(),
            })
        };

        let date_hour_raw = record.get(0).unwrap_or("").trim().to_string();
        let date_hour = parse_date_hour(&date_hour_raw);
        if date_hour.is_none() {
            warn!(row = idx, value = %date_hour_raw, "unparseable DateHour");
        }

        let numerics: Vec<f64> = {
            let mut v = Vec::with_capacity(8);
            for col in [
                ColumnId::Sessions,
                ColumnId::EngRate,
                ColumnId::KeyEvents,
                ColumnId::EngTime,
                ColumnId::SessionsTotal,
                ColumnId::EngRateTotal,
                ColumnId::KeyEventsTotal,
                ColumnId::EngTimeTotal,
            ] {
                v.push(number(col)?);
            }
            v
        };

        records.push(SessionRecord {
            date_hour_raw,
            date_hour,
            page_path: record.get(1).unwrap_or("").trim().to_string(),
            user_type: UserType::parse(record.get(2).unwrap_or("").trim()),
            source: record.get(3).unwrap_or("").trim().to_string(),
            sessions: numerics[0],
            eng_rate: numerics[1],
            key_events: numerics[2],
            eng_time_secs: numerics[3],
        });
        raw_rows.push(numerics);
    }

    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let scope_checks = verify_scopes(&raw_rows)?;
    info!(rows = records.len(), "loaded session export");
    Ok(Ingest {
        records,
        scope_checks,
    })
}

/// Verify the program-scope and totals-scope copies of each metric agree.
///
/// `raw_rows` holds the eight numeric fields per row in schema order
/// (program metrics 0..4, totals metrics 4..8). A disagreement is fatal.
fn verify_scopes(raw_rows: &[Vec<f64>]) -> Result<Vec<ScopeCheck>> {
    let mut checks = Vec::with_capacity(SCOPE_PAIRS.len());
    for (pair_idx, (program, total)) in SCOPE_PAIRS.iter().enumerate() {
        for (row, values) in raw_rows.iter().enumerate() {
            let a = values[pair_idx];
            let b = values[pair_idx + 4];
            // Exact comparison: the scopes are byte-identical copies in a
            // well-formed export, not merely close.
            if a != b && !(a.is_nan() && b.is_nan()) {
                return Err(Error::ScopeMismatch {
                    column: program.name(),
                    row,
                });
            }
        }
        info!(column = program.name(), totals = total.name(), "reporting scopes agree");
        checks.push(ScopeCheck {
            column: program.name().to_string(),
            identical: true,
        });
    }
    Ok(checks)
}

/// Parse `YYYYMMDDHH` into a naive timestamp at minute zero.
fn parse_date_hour(raw: &str) -> Option<NaiveDateTime> {
    if raw.len() != 10 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(&raw[..8], "%Y%m%d").ok()?;
    let hour: u32 = raw[8..].parse().ok()?;
    date.and_hms_opt(hour, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_export(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# exported report").unwrap();
        writeln!(
            file,
            "Date + hour,Page path,User type,Source,Sessions,Eng rate,Key events,Eng time,Sessions,Eng rate,Key events,Eng time"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn loads_and_collapses_scopes() {
        let file = write_export(&[
            "2024010109,/apply,new,google,3,0.5,1,120,3,0.5,1,120",
            "2024010110,/,established,direct,10,0.8,0,60,10,0.8,0,60",
        ]);
        let ingest = load_sessions(file.path()).unwrap();
        assert_eq!(ingest.records.len(), 2);
        assert_eq!(ingest.scope_checks.len(), 4);
        assert!(ingest.scope_checks.iter().all(|c| c.identical));
        let first = &ingest.records[0];
        assert_eq!(first.page_path, "/apply");
        assert_eq!(first.user_type, UserType::New);
        assert_eq!(first.eng_time_secs, 120.0);
        assert_eq!(
            first.date_hour.unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn scope_mismatch_is_fatal() {
        let file = write_export(&[
            "2024010109,/apply,new,google,3,0.5,1,120,3,0.6,1,120",
        ]);
        let err = load_sessions(file.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::ScopeMismatch { column: "EngRate", row: 0 }
        ));
    }

    #[test]
    fn short_row_is_fatal() {
        let file = write_export(&["2024010109,/apply,new,google,3,0.5,1,120"]);
        let err = load_sessions(file.path()).unwrap_err();
        assert!(matches!(err, Error::ColumnCount { .. }));
    }

    #[test]
    fn bad_number_names_row_and_column() {
        let file = write_export(&[
            "2024010109,/apply,new,google,three,0.5,1,120,three,0.5,1,120",
        ]);
        let err = load_sessions(file.path()).unwrap_err();
        match err {
            Error::BadNumber { column, value, .. } => {
                assert_eq!(column, "Sessions");
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_export_is_fatal() {
        let file = write_export(&[]);
        assert!(matches!(load_sessions(file.path()), Err(Error::EmptyInput)));
    }

    #[test]
    fn malformed_date_hour_is_tolerated() {
        let file = write_export(&[
            "not-a-date,/apply,new,google,3,0.5,1,120,3,0.5,1,120",
        ]);
        let ingest = load_sessions(file.path()).unwrap();
        assert!(ingest.records[0].date_hour.is_none());
    }
}
