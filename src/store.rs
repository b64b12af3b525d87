//! Appends degree day readings to the cumulative CSV log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat};
use log::info;
use thiserror::Error;

use crate::reading::DegreeDayReading;

/// Every collection run appends to this one file; there is no per-day naming.
pub const LOG_FILE_NAME: &str = "degree_days_data.csv";

const HEADERS: [&str; 17] = [
    "Date",
    "Location ID",
    "Location Name",
    "Max Temp (°C)",
    "Min Temp (°C)",
    "Avg Temp (°C)",
    "Baseline Temp (°C)",
    "Heating Degree Days",
    "Cooling Degree Days",
    "Weather Type",
    "Wind Speed",
    "Wind Gust",
    "Visibility",
    "Humidity (%)",
    "UV Index",
    "Precip Probability (%)",
    "Collected At",
];

/// Value written for optional fields the provider omitted.
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create data directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read data directory '{0}'")]
    DirRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to format CSV row")]
    Format(#[source] csv::Error),

    #[error("Failed to append to CSV file '{0}'")]
    Append(PathBuf, #[source] std::io::Error),

    #[error("Failed to read CSV file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),
}

/// Append-only store for the degree days CSV log.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvStore {
            data_dir: data_dir.into(),
        }
    }

    /// Appends the reading as one CSV row, writing the header line first when
    /// the log does not exist yet. Returns the absolute path written to.
    pub fn save(&self, reading: &DegreeDayReading) -> Result<PathBuf, StoreError> {
        self.ensure_data_dir()?;

        let path = self.data_dir.join(LOG_FILE_NAME);
        let write_header = !path.exists();

        let mut content = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut content);
            if write_header {
                writer.write_record(HEADERS).map_err(StoreError::Format)?;
            }
            writer
                .write_record(format_row(reading))
                .map_err(StoreError::Format)?;
            writer
                .flush()
                .map_err(|e| StoreError::Append(path.clone(), e))?;
        }

        // Single write on an O_APPEND handle, so overlapping scheduled runs
        // cannot interleave within a row. Existing content is never rewritten.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::Append(path.clone(), e))?;
        file.write_all(&content)
            .map_err(|e| StoreError::Append(path.clone(), e))?;

        info!("Appended reading to {}", path.display());

        Ok(fs::canonicalize(&path).unwrap_or(path))
    }

    /// The CSV logs currently in the data directory.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_data_dir()?;

        let entries = fs::read_dir(&self.data_dir)
            .map_err(|e| StoreError::DirRead(self.data_dir.clone(), e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::DirRead(self.data_dir.clone(), e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".csv") {
                files.push(name);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Reads one log back verbatim.
    pub fn read(&self, filename: &str) -> Result<String, StoreError> {
        let path = self.data_dir.join(filename);
        fs::read_to_string(&path).map_err(|e| StoreError::Read(path, e))
    }

    fn ensure_data_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::DirCreation(self.data_dir.clone(), e))
    }
}

fn format_row(reading: &DegreeDayReading) -> Vec<String> {
    vec![
        format_date(&reading.date),
        reading.location_id.clone(),
        reading.location_name.clone(),
        reading.max_temp.to_string(),
        reading.min_temp.to_string(),
        reading.avg_temp.to_string(),
        reading.baseline_temp.to_string(),
        reading.heating_degree_days.to_string(),
        reading.cooling_degree_days.to_string(),
        format_optional(reading.weather_code),
        format_optional(reading.wind_speed),
        format_optional(reading.wind_gust),
        format_optional(reading.visibility),
        format_optional(reading.humidity),
        format_optional(reading.uv_index),
        format_optional(reading.precip_probability),
        reading
            .collected_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    ]
}

/// Truncates a provider timestamp to its calendar date. No timezone
/// conversion: the date is kept as the provider stated it.
fn format_date(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.date_naive().to_string();
    }
    timestamp.split('T').next().unwrap_or(timestamp).to_string()
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use crate::reading::DEFAULT_BASELINE_TEMP;

    use super::*;

    #[test]
    fn should_write_header_on_fresh_file() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let path = store.save(&reading_fixture()).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADERS.join(","));
    }

    #[test]
    fn should_append_without_rewriting_header() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        for _ in 0..3 {
            store.save(&reading_fixture()).unwrap();
        }

        let content = store.read(LOG_FILE_NAME).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        let header_count = lines.iter().filter(|l| l.starts_with("Date,")).count();
        assert_eq!(header_count, 1);
    }

    #[test]
    fn should_emit_numbers_unquoted() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        store.save(&reading_fixture()).unwrap();

        let content = store.read(LOG_FILE_NAME).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains(",10,2,6,15.5,9.5,0,"));
    }

    #[test]
    fn should_emit_sentinel_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let mut reading = reading_fixture();
        reading.wind_gust = None;
        reading.uv_index = None;
        store.save(&reading).unwrap();

        let content = store.read(LOG_FILE_NAME).unwrap();
        let mut rows = csv::ReaderBuilder::new().from_reader(content.as_bytes());
        let record = rows.records().next().unwrap().unwrap();
        assert_eq!(&record[11], "N/A");
        assert_eq!(&record[14], "N/A");
    }

    #[test]
    fn should_round_trip_fields_with_commas_and_quotes() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let mut reading = reading_fixture();
        reading.location_name = r#"St. James's Park, "London""#.to_string();
        let path = store.save(&reading).unwrap();

        let mut rows = csv::Reader::from_path(path).unwrap();
        let record = rows.records().next().unwrap().unwrap();
        assert_eq!(&record[2], r#"St. James's Park, "London""#);
    }

    #[test]
    fn should_quote_only_when_necessary() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let mut reading = reading_fixture();
        reading.location_name = "Westminster, London".to_string();
        store.save(&reading).unwrap();

        let content = store.read(LOG_FILE_NAME).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains(r#""Westminster, London""#));
        // Plain numeric fields stay bare.
        assert!(row.contains(",10,2,6,"));
        assert!(!row.contains(r#""10""#));
    }

    #[test]
    fn should_truncate_observation_timestamp_to_date() {
        assert_eq!(format_date("2024-01-15T00:00Z"), "2024-01-15");
        assert_eq!(format_date("2024-01-15T21:30:00+01:00"), "2024-01-15");
    }

    #[test]
    fn should_keep_bare_date() {
        assert_eq!(format_date("2024-01-15"), "2024-01-15");
    }

    #[test]
    fn should_stamp_collection_time_in_last_column() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        store.save(&reading_fixture()).unwrap();

        let content = store.read(LOG_FILE_NAME).unwrap();
        let mut rows = csv::ReaderBuilder::new().from_reader(content.as_bytes());
        let record = rows.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 17);
        assert_eq!(&record[0], "2024-01-15");
        assert_eq!(&record[16], "2024-01-15T09:30:00.000Z");
    }

    #[test]
    fn should_list_csv_logs() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        store.save(&reading_fixture()).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a log").unwrap();

        let files = store.list().unwrap();
        assert_eq!(files, vec![LOG_FILE_NAME.to_string()]);
    }

    #[test]
    fn should_list_nothing_in_fresh_directory() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data"));

        let files = store.list().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn should_fail_reading_missing_log() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path());

        let err = store.read("missing.csv").unwrap_err();
        assert!(matches!(err, StoreError::Read(_, _)));
    }

    #[test]
    fn should_create_nested_data_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deep").join("data");
        let store = CsvStore::new(&nested);

        store.save(&reading_fixture()).unwrap();

        assert!(nested.join(LOG_FILE_NAME).exists());
    }

    fn reading_fixture() -> DegreeDayReading {
        DegreeDayReading {
            date: "2024-01-15T00:00Z".to_string(),
            location_id: "51.5074,-0.1278".to_string(),
            location_name: "London".to_string(),
            max_temp: 10.0,
            min_temp: 2.0,
            avg_temp: 6.0,
            baseline_temp: DEFAULT_BASELINE_TEMP,
            heating_degree_days: 9.5,
            cooling_degree_days: 0.0,
            weather_code: Some(7.0),
            wind_speed: Some(4.63),
            wind_gust: Some(9.26),
            visibility: Some(21272.0),
            humidity: Some(81.2),
            uv_index: Some(1.0),
            precip_probability: Some(55.0),
            collected_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
        }
    }
}
