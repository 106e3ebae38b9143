use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ClassificationThresholds;

/// One city-day of finalized input features, produced by the upstream
/// ingestion/feature stage. (date, city) is unique within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub date: NaiveDate,
    pub city: String,
    /// Congestion level, 0-1 scale where 1 = gridlock.
    pub congestion_level: f64,
    #[serde(default)]
    pub congestion_level_7d_avg: Option<f64>,
    /// Rainfall in mm for the day.
    pub rainfall_mm: f64,
    #[serde(default)]
    pub rainfall_mm_7d_avg: Option<f64>,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Demand index, normalized 0-1 scale where 1 = peak demand.
    pub demand_index: f64,
    #[serde(default)]
    pub demand_index_7d_avg: Option<f64>,
}

/// A scored city-day ready for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub date: NaiveDate,
    pub city: String,
    pub city_tier: CityTier,
    pub traffic_risk: f64,
    pub weather_risk: f64,
    pub demand_risk: f64,
    pub risk_score: f64,
    pub risk_classification: RiskLevel,
    pub congestion_level: f64,
    pub rainfall_mm: f64,
    pub temperature: f64,
    pub demand_index: f64,
}

/// A high-risk city-day with a human-readable explanation.
/// Fields are kept flat so the record serializes as one CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub date: NaiveDate,
    pub city: String,
    pub city_tier: CityTier,
    pub traffic_risk: f64,
    pub weather_risk: f64,
    pub demand_risk: f64,
    pub risk_score: f64,
    pub risk_classification: RiskLevel,
    pub congestion_level: f64,
    pub rainfall_mm: f64,
    pub temperature: f64,
    pub demand_index: f64,
    pub alert_reason: String,
}

impl AlertRecord {
    pub fn from_risk(risk: RiskRecord, alert_reason: String) -> Self {
        Self {
            date: risk.date,
            city: risk.city,
            city_tier: risk.city_tier,
            traffic_risk: risk.traffic_risk,
            weather_risk: risk.weather_risk,
            demand_risk: risk.demand_risk,
            risk_score: risk.risk_score,
            risk_classification: risk.risk_classification,
            congestion_level: risk.congestion_level,
            rainfall_mm: risk.rainfall_mm,
            temperature: risk.temperature,
            demand_index: risk.demand_index,
            alert_reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a combined risk score. Boundary values fall to the lower
    /// tier: a score of exactly `low` is Low, exactly `medium` is Medium.
    pub fn from_score(score: f64, cuts: &ClassificationThresholds) -> Self {
        if score <= cuts.low {
            RiskLevel::Low
        } else if score <= cuts.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// City market tier, informational only — never an input to scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityTier {
    #[serde(rename = "Tier 1")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
    Unknown,
}

impl std::fmt::Display for CityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CityTier::Tier1 => "Tier 1",
            CityTier::Tier2 => "Tier 2",
            CityTier::Tier3 => "Tier 3",
            CityTier::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}
