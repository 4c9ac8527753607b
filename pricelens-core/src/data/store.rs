//! Flat CSV persistence for price tables.
//!
//! Two layouts share one reader:
//! - fetched data: `Date,Close`
//! - augmented export: `Date,Close,Daily Return,SMA_<n>,SMA_<m>,Volatility`
//!
//! The reader only needs `Date` and `Close` columns (case-insensitive, extra
//! columns ignored). Undefined values are written as empty cells.

use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::dates::parse_date;
use super::provider::DataError;
use crate::analysis::AnalysisReport;
use crate::domain::Sample;

/// Cell texts read as missing, matched exactly after trimming. Same set as
/// the pandas `read_csv` defaults.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Closing-price cell as it appeared in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawClose {
    /// Empty cell or one of the NA markers.
    Blank,
    Value(f64),
    /// Present but not coercible to a finite number.
    Malformed(String),
}

impl RawClose {
    /// Coerce a cell. Quotes are stripped by the CSV reader; thousands
    /// separators and a leading currency sign are tolerated.
    pub fn parse(cell: &str) -> Self {
        let s = cell.trim();
        if s.is_empty() || NA_MARKERS.contains(&s) {
            return RawClose::Blank;
        }
        let cleaned: String = s.trim_start_matches('$').chars().filter(|c| *c != ',').collect();
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => RawClose::Value(v),
            _ => RawClose::Malformed(s.to_string()),
        }
    }
}

/// One parsed data row, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub date: NaiveDate,
    pub close: RawClose,
}

/// Row-oriented persistence for price tables.
pub trait TabularStore {
    /// Write fetched samples as `Date,Close`.
    fn write_samples(&self, samples: &[Sample]) -> Result<(), DataError>;

    /// Write the cleaned table with its derived columns.
    fn write_report(&self, report: &AnalysisReport) -> Result<(), DataError>;

    /// Read raw rows back.
    fn read(&self) -> Result<Vec<RawRow>, DataError>;
}

/// CSV file store at a fixed path.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create(&self) -> Result<csv::Writer<File>, DataError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| DataError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::create(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(csv::Writer::from_writer(file))
    }
}

fn format_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl TabularStore for CsvStore {
    fn write_samples(&self, samples: &[Sample]) -> Result<(), DataError> {
        let mut wtr = self.create()?;
        wtr.write_record(["Date", "Close"])?;
        for s in samples {
            wtr.write_record([s.date.to_string(), format_cell(s.close)])?;
        }
        wtr.flush().map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), rows = samples.len(), "wrote samples");
        Ok(())
    }

    fn write_report(&self, report: &AnalysisReport) -> Result<(), DataError> {
        let mut wtr = self.create()?;
        wtr.write_record(report.column_names())?;
        for (i, date) in report.dates.iter().enumerate() {
            let mut record = vec![date.to_string()];
            record.extend(report.row(i).into_iter().map(format_cell));
            wtr.write_record(&record)?;
        }
        wtr.flush().map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), rows = report.len(), "wrote report");
        Ok(())
    }

    fn read(&self) -> Result<Vec<RawRow>, DataError> {
        let file = File::open(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        read_rows(file, &self.path)
    }
}

/// Parse `Date`/`Close` rows from any reader. `path` is only used in errors.
pub fn read_rows<R: Read>(reader: R, path: &Path) -> Result<Vec<RawRow>, DataError> {
    let malformed = |reason: String| DataError::MalformedFile {
        path: path.to_path_buf(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| malformed(format!("unreadable header: {e}")))?
        .clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(malformed("file is empty".into()));
    }

    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let date_idx = find("date").ok_or_else(|| malformed("missing 'Date' column".into()))?;
    let close_idx = find("close").ok_or_else(|| malformed("missing 'Close' column".into()))?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| malformed(format!("unparseable row: {e}")))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let raw_date = record.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date)
            .ok_or_else(|| malformed(format!("line {line}: unparseable date '{raw_date}'")))?;
        let close = RawClose::parse(record.get(close_idx).unwrap_or(""));

        rows.push(RawRow { line, date, close });
    }

    if rows.is_empty() {
        return Err(DataError::EmptyInput(path.display().to_string()));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<RawRow>, DataError> {
        read_rows(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn raw_close_coercion() {
        assert_eq!(RawClose::parse("101.5"), RawClose::Value(101.5));
        assert_eq!(RawClose::parse(" 1,234.5 "), RawClose::Value(1234.5));
        assert_eq!(RawClose::parse("$12"), RawClose::Value(12.0));
        assert_eq!(RawClose::parse(""), RawClose::Blank);
        assert_eq!(RawClose::parse("NaN"), RawClose::Blank);
        assert_eq!(RawClose::parse("null"), RawClose::Blank);
        assert_eq!(RawClose::parse("abc"), RawClose::Malformed("abc".into()));
        assert_eq!(RawClose::parse("inf"), RawClose::Malformed("inf".into()));
    }

    #[test]
    fn spreadsheet_na_markers_are_blank() {
        for marker in [
            "#N/A", "#N/A N/A", "#NA", "<NA>", "-NaN", "-nan", "1.#QNAN", "-1.#IND", "N/A",
            "NULL", "None", " NA ",
        ] {
            assert_eq!(RawClose::parse(marker), RawClose::Blank, "{marker}");
        }
        // Matching is exact, not case-folded.
        assert_eq!(RawClose::parse("none"), RawClose::Malformed("none".into()));
        assert_eq!(RawClose::parse("#VALUE!"), RawClose::Malformed("#VALUE!".into()));
    }

    #[test]
    fn reads_date_and_close_ignoring_extra_columns() {
        let rows = parse("Date,Open,Close,Volume\n2024-01-02,1,10.5,100\n2024-01-03,1,\"11\",100\n")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].close, RawClose::Value(10.5));
        assert_eq!(rows[1].close, RawClose::Value(11.0));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(rows[0].line, 2);
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let rows = parse("date , CLOSE\n2024-01-02,3\n").unwrap();
        assert_eq!(rows[0].close, RawClose::Value(3.0));
    }

    #[test]
    fn empty_file_is_malformed() {
        assert!(matches!(parse(""), Err(DataError::MalformedFile { .. })));
    }

    #[test]
    fn header_only_is_empty_input() {
        assert!(matches!(parse("Date,Close\n"), Err(DataError::EmptyInput(_))));
    }

    #[test]
    fn missing_close_column_is_malformed() {
        let err = parse("Date,Price\n2024-01-02,3\n").unwrap_err();
        assert!(err.to_string().contains("Close"));
    }

    #[test]
    fn unparseable_date_reports_line() {
        let err = parse("Date,Close\n2024-01-02,3\nTicker,AAPL\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("Ticker"), "{msg}");
    }

    #[test]
    fn blank_and_malformed_closes_survive_parsing() {
        let rows = parse("Date,Close\n2024-01-02,\n2024-01-03,oops\n").unwrap();
        assert_eq!(rows[0].close, RawClose::Blank);
        assert_eq!(rows[1].close, RawClose::Malformed("oops".into()));
    }
}
