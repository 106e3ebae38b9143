pub mod factors;
pub mod score;

use crate::config::Config;
use crate::core::{FeatureRecord, RiskLevel, RiskRecord};
use crate::tiers::TierLookup;

/// The risk engine scores one city-day at a time against an immutable
/// configuration. Rows are independent; scoring is pure and reproducible.
pub struct RiskEngine {
    config: Config,
    tiers: TierLookup,
}

impl RiskEngine {
    pub fn new(config: Config, tiers: TierLookup) -> Self {
        Self { config, tiers }
    }

    /// Score a single feature record.
    pub fn score_record(&self, record: &FeatureRecord) -> RiskRecord {
        let traffic_risk = factors::traffic_risk_score(
            record.congestion_level,
            record.congestion_level_7d_avg,
            &self.config.traffic,
        );
        let weather_risk = factors::weather_risk_score(
            record.rainfall_mm,
            record.rainfall_mm_7d_avg,
            record.temperature,
            &self.config.weather,
            &self.config.temperature,
        );
        let demand_risk = factors::demand_risk_score(
            record.demand_index,
            record.demand_index_7d_avg,
            &self.config.demand,
        );

        let risk_score =
            score::combined_risk_score(traffic_risk, weather_risk, demand_risk, &self.config.weights);
        let risk_classification = RiskLevel::from_score(risk_score, &self.config.classification);

        RiskRecord {
            date: record.date,
            city: record.city.clone(),
            city_tier: self.tiers.get(&record.city),
            traffic_risk,
            weather_risk,
            demand_risk,
            risk_score,
            risk_classification,
            congestion_level: record.congestion_level,
            rainfall_mm: record.rainfall_mm,
            temperature: record.temperature,
            demand_index: record.demand_index,
        }
    }

    /// Score the whole feature table, one output row per input row.
    pub fn score_all(&self, records: &[FeatureRecord]) -> Vec<RiskRecord> {
        records.iter().map(|r| self.score_record(r)).collect()
    }
}
