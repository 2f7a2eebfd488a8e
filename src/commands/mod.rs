pub mod events;
pub mod generate;

use anyhow::{Context, Result};
use calprint_core::{Importer, build_importers};
use chrono::NaiveDate;

use crate::preset::Preset;

/// Build the preset's importers and load each of them once.
///
/// A failed network load logs the full request/response dump before the
/// error is returned.
pub fn load_importers(preset: &Preset) -> Result<Vec<Box<dyn Importer>>> {
    let mut importers = build_importers(&preset.importers)?;

    for importer in &mut importers {
        if let Err(err) = importer.load() {
            if let Some(failure) = err.fetch_failure() {
                log::error!("{}", failure.report());
            }
            return Err(err).with_context(|| format!("Failed to load {}", importer.source()));
        }
        log::info!("Loaded {}", importer.source());
    }

    Ok(importers)
}

/// Parse a date in `format`, naming the argument on failure.
pub fn parse_date(value: &str, format: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, format)
        .with_context(|| format!("Invalid {} '{}'. Expected {}", what, value, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Mode;
    use calprint_core::ImporterConfig;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Keeps every error-level message so tests can inspect what was logged.
    struct CapturedErrors(Mutex<Vec<String>>);

    impl Log for CapturedErrors {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Error
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = self.0.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static CAPTURED: CapturedErrors = CapturedErrors(Mutex::new(Vec::new()));

    fn preset(importers: Vec<ImporterConfig>) -> Preset {
        Preset {
            mode: Mode::Weekly,
            output: PathBuf::from("calendar.txt"),
            importers,
        }
    }

    #[test]
    fn failed_fetch_logs_diagnostic_before_returning_error() {
        // set_logger only succeeds once per process
        let _ = log::set_logger(&CAPTURED);
        log::set_max_level(LevelFilter::Error);

        let url = "http://127.0.0.1:9/calendar.ics";
        let err = match load_importers(&preset(vec![ImporterConfig::ics(url)])) {
            Ok(_) => panic!("Expected load to fail"),
            Err(err) => err,
        };

        assert!(format!("{:#}", err).contains(&format!("Failed to load {}", url)));

        let logged = CAPTURED.0.lock().unwrap();
        let report = logged
            .iter()
            .find(|line| line.contains(&format!("Request URL: {}", url)))
            .expect("fetch diagnostic should be logged");
        assert!(report.starts_with("--- ICS network failure ---"));
        assert!(report.contains("Error summary:"));
    }

    #[test]
    fn empty_preset_loads_nothing() {
        assert!(load_importers(&preset(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn invalid_date_names_the_argument() {
        let err = parse_date("2025-13-01", "%Y-%m-%d", "--from date").unwrap_err();
        assert!(err.to_string().contains("Invalid --from date '2025-13-01'"));
    }
}
