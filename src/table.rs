use std::path::Path;

use thiserror::Error;

use crate::core::{AlertRecord, FeatureRecord, RiskRecord};

/// Raw columns every component scorer depends on. The 7-day-average
/// columns are optional (scoring falls back to the raw value).
const REQUIRED_COLUMNS: &[&str] = &[
    "date",
    "city",
    "congestion_level",
    "rainfall_mm",
    "temperature",
    "demand_index",
];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("feature table {path} is missing required column {column:?}")]
    MissingColumn { path: String, column: String },
    #[error("invalid value in feature table for {city} on {date}: {reason}")]
    InvalidValue {
        city: String,
        date: String,
        reason: String,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the per-city-per-day feature table, failing fast on a missing
/// required column or an out-of-domain value.
pub fn read_features(path: &Path) -> Result<Vec<FeatureRecord>, TableError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(TableError::MissingColumn {
                path: path.display().to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: FeatureRecord = row?;
        validate_record(&record)?;
        records.push(record);
    }
    tracing::info!("Loaded {} feature rows from {}", records.len(), path.display());
    Ok(records)
}

/// Defensive boundary check: the scorers assume validated inputs, so reject
/// out-of-domain values here rather than propagate nonsensical scores.
fn validate_record(record: &FeatureRecord) -> Result<(), TableError> {
    let invalid = |reason: String| TableError::InvalidValue {
        city: record.city.clone(),
        date: record.date.to_string(),
        reason,
    };

    let unit_fields = [
        ("congestion_level", Some(record.congestion_level)),
        ("congestion_level_7d_avg", record.congestion_level_7d_avg),
        ("demand_index", Some(record.demand_index)),
        ("demand_index_7d_avg", record.demand_index_7d_avg),
    ];
    for (name, value) in unit_fields {
        if let Some(v) = value {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(invalid(format!("{name} must be in [0, 1], got {v}")));
            }
        }
    }

    for (name, value) in [
        ("rainfall_mm", Some(record.rainfall_mm)),
        ("rainfall_mm_7d_avg", record.rainfall_mm_7d_avg),
    ] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("{name} must be non-negative, got {v}")));
            }
        }
    }

    if !record.temperature.is_finite() {
        return Err(invalid(format!(
            "temperature must be finite, got {}",
            record.temperature
        )));
    }

    Ok(())
}

/// Write the full risk table.
pub fn write_risk_table(path: &Path, records: &[RiskRecord]) -> Result<(), TableError> {
    write_csv(path, records)
}

/// Write the alert table for the selected date.
pub fn write_alerts(path: &Path, records: &[AlertRecord]) -> Result<(), TableError> {
    write_csv(path, records)
}

fn write_csv<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<(), TableError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("cityrisk_table_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const FULL_HEADER: &str = "date,city,congestion_level,congestion_level_7d_avg,rainfall_mm,rainfall_mm_7d_avg,temperature,demand_index,demand_index_7d_avg";

    #[test]
    fn reads_full_schema() {
        let path = write_temp(
            "full.csv",
            &format!("{FULL_HEADER}\n2025-07-14,Mumbai,0.82,0.75,42.5,28.1,31.0,0.91,0.85\n"),
        );
        let records = read_features(&path).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.city, "Mumbai");
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        assert_eq!(r.congestion_level_7d_avg, Some(0.75));
        assert_eq!(r.demand_index_7d_avg, Some(0.85));
    }

    #[test]
    fn tolerates_missing_rolling_average_columns() {
        let path = write_temp(
            "no_avg.csv",
            "date,city,congestion_level,rainfall_mm,temperature,demand_index\n\
             2025-07-14,Delhi,0.4,2.0,38.0,0.6\n",
        );
        let records = read_features(&path).unwrap();
        assert_eq!(records[0].congestion_level_7d_avg, None);
        assert_eq!(records[0].rainfall_mm_7d_avg, None);
    }

    #[test]
    fn missing_raw_column_is_fatal() {
        let path = write_temp(
            "no_rain.csv",
            "date,city,congestion_level,temperature,demand_index\n\
             2025-07-14,Delhi,0.4,38.0,0.6\n",
        );
        match read_features(&path) {
            Err(TableError::MissingColumn { column, .. }) => assert_eq!(column, "rainfall_mm"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn congestion_out_of_unit_range_rejected() {
        let path = write_temp(
            "bad_congestion.csv",
            "date,city,congestion_level,rainfall_mm,temperature,demand_index\n\
             2025-07-14,Delhi,1.4,2.0,38.0,0.6\n",
        );
        match read_features(&path) {
            Err(TableError::InvalidValue { city, reason, .. }) => {
                assert_eq!(city, "Delhi");
                assert!(reason.contains("congestion_level"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn negative_rainfall_rejected() {
        let path = write_temp(
            "bad_rain.csv",
            "date,city,congestion_level,rainfall_mm,temperature,demand_index\n\
             2025-07-14,Delhi,0.4,-3.0,38.0,0.6\n",
        );
        assert!(matches!(
            read_features(&path),
            Err(TableError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unparseable_number_is_fatal() {
        let path = write_temp(
            "bad_number.csv",
            "date,city,congestion_level,rainfall_mm,temperature,demand_index\n\
             2025-07-14,Delhi,abc,2.0,38.0,0.6\n",
        );
        assert!(matches!(read_features(&path), Err(TableError::Csv(_))));
    }

    #[test]
    fn risk_table_round_trips_through_csv() {
        use crate::core::{CityTier, RiskLevel};
        let record = RiskRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            city: "Mumbai".into(),
            city_tier: CityTier::Tier1,
            traffic_risk: 90.0,
            weather_risk: 79.0,
            demand_risk: 50.0,
            risk_score: 76.15,
            risk_classification: RiskLevel::High,
            congestion_level: 0.9,
            rainfall_mm: 40.0,
            temperature: 42.0,
            demand_index: 0.8,
        };
        let dir = std::env::temp_dir().join("cityrisk_table_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("risk_out.csv");
        write_risk_table(&path, &[record]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("date,city,city_tier,traffic_risk"));
        let row = lines.next().unwrap();
        assert!(row.contains("Tier 1"));
        assert!(row.contains("High"));
        assert!(row.contains("76.15"));
    }
}
