//! Logger initialisation and export of iteration traces.
//!
//! Every result of the crate can be seen as a table: a header row and one row per recorded
//! iteration (or per run, for comparison reports). [`TraceTable`] exposes that view; it is
//! rendered with tabled in the terminal and written with csv to disk.
use chrono::Local;
use csv::Writer;
use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("loglevel must be debug, info, warn, error or off, got '{0}'")]
    UnknownLevel(String),
    #[error("cannot create log file: {0}")]
    Io(#[from] std::io::Error),
}

pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    match level.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" | "none" => Ok(LevelFilter::Off),
        other => Err(LoggerError::UnknownLevel(other.to_string())),
    }
}

/// Installs a terminal logger and, when `log_to_file` is set, a file logger writing to
/// `log_<date>_<time>.txt`. Returns `Ok(false)` when a logger was already installed.
pub fn init_logger(loglevel: Option<&str>, log_to_file: bool) -> Result<bool, LoggerError> {
    let log_option = match loglevel {
        Some(level) => parse_level(level)?,
        None => LevelFilter::Info,
    };
    if log_option == LevelFilter::Off {
        return Ok(false);
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(
            log_option,
            Config::default(),
            File::create(name)?,
        ));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            info!("logger initialised at level {}", log_option);
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

/// Tabular view of a trace: one header row, then one row per record.
pub trait TraceTable {
    fn headers(&self) -> Vec<String>;

    fn rows(&self) -> Vec<Vec<String>>;

    /// one-paragraph conclusion printed under the table
    fn summary(&self) -> String {
        String::new()
    }

    fn to_table(&self) -> String {
        let table = render_table(&self.headers(), &self.rows());
        let summary = self.summary();
        if summary.is_empty() {
            table
        } else {
            format!("{}\n{}", table, summary)
        }
    }
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

/// Writes the header and every row of the trace into a csv file.
pub fn save_trace_to_csv<P: AsRef<Path>>(trace: &dyn TraceTable, path: P) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(trace.headers())?;
    for row in trace.rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Fixed notation for ordinary magnitudes, scientific notation otherwise.
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || (1e-4..1e6).contains(&magnitude) {
        format!("{:.10}", value)
    } else {
        format!("{:.6e}", value)
    }
}

/// Stopping error of a record, `n/a` when there is none.
pub fn format_error(error: Option<f64>) -> String {
    match error {
        Some(e) => format!("{:.3e}", e),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Squares;

    impl TraceTable for Squares {
        fn headers(&self) -> Vec<String> {
            vec!["n".to_string(), "n^2".to_string()]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            (1..=3).map(|n| vec![n.to_string(), (n * n).to_string()]).collect()
        }

        fn summary(&self) -> String {
            "three squares".to_string()
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("none").unwrap(), LevelFilter::Off);
        assert!(matches!(parse_level("verbose"), Err(LoggerError::UnknownLevel(_))));
    }

    #[test]
    fn test_init_logger_rejects_unknown_level() {
        assert!(init_logger(Some("chatty"), false).is_err());
        assert_eq!(init_logger(Some("off"), false).unwrap(), false);
    }

    #[test]
    fn test_to_table_contains_rows_and_summary() {
        let table = Squares.to_table();
        assert!(table.contains("n^2"));
        assert!(table.contains('9'));
        assert!(table.ends_with("three squares"));
    }

    #[test]
    fn test_save_trace_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("squares.csv");
        save_trace_to_csv(&Squares, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "n,n^2\n1,1\n2,4\n3,9\n");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_value(0.0), "0.0000000000");
        assert_eq!(format_value(2.5), "2.5000000000");
        assert_eq!(format_value(1.5e-9), "1.500000e-9");
        assert_eq!(format_error(None), "n/a");
        assert_eq!(format_error(Some(0.00125)), "1.250e-3");
    }
}
