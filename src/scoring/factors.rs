use crate::config::{FactorThresholds, TemperatureThresholds};

/// Rainfall above `high` is scaled against this practical ceiling (mm beyond
/// the threshold) because rainfall, unlike congestion or demand, is unbounded.
const RAINFALL_EXCESS_CEILING_MM: f64 = 50.0;

/// The signal a scorer actually maps: the higher of the current value and its
/// trailing 7-day average. A day that improves after a bad week still scores
/// as risky. A missing average degrades to the raw value (no smoothing).
pub fn effective_signal(raw: f64, rolling_avg: Option<f64>) -> f64 {
    raw.max(rolling_avg.unwrap_or(raw))
}

/// Traffic risk component (0-100).
///
/// Congestion above `high` (0.8) is critical — severe delivery delays expected.
/// Bands: 0-20 below `low`, 20-50, 50-80, 80-100 above `high`.
pub fn traffic_risk_score(
    congestion_level: f64,
    congestion_7d_avg: Option<f64>,
    thresholds: &FactorThresholds,
) -> f64 {
    let effective = effective_signal(congestion_level, congestion_7d_avg);

    if effective >= thresholds.high {
        let excess = (effective - thresholds.high) / (1.0 - thresholds.high);
        (80.0 + excess * 20.0).min(100.0)
    } else if effective >= thresholds.medium {
        let excess = (effective - thresholds.medium) / (thresholds.high - thresholds.medium);
        50.0 + excess * 30.0
    } else if effective >= thresholds.low {
        let excess = (effective - thresholds.low) / (thresholds.medium - thresholds.low);
        20.0 + excess * 30.0
    } else {
        effective / thresholds.low * 20.0
    }
}

/// Weather risk component (0-100).
///
/// Rainfall maps through bands 0-15 / 15-40 / 40-70 / 70-100; extreme
/// temperature adds on top (up to +10 for cold at -10°C equivalent depth,
/// +15 per 10°C above the heat threshold). Total capped at 100.
pub fn weather_risk_score(
    rainfall_mm: f64,
    rainfall_7d_avg: Option<f64>,
    temperature: f64,
    thresholds: &FactorThresholds,
    temp_thresholds: &TemperatureThresholds,
) -> f64 {
    let effective = effective_signal(rainfall_mm, rainfall_7d_avg);

    let rain_score = if effective >= thresholds.high {
        let excess = (effective - thresholds.high) / RAINFALL_EXCESS_CEILING_MM;
        70.0 + excess.min(1.0) * 30.0
    } else if effective >= thresholds.medium {
        let excess = (effective - thresholds.medium) / (thresholds.high - thresholds.medium);
        40.0 + excess * 30.0
    } else if effective >= thresholds.low {
        let excess = (effective - thresholds.low) / (thresholds.medium - thresholds.low);
        15.0 + excess * 25.0
    } else {
        effective / thresholds.low * 15.0
    };

    let temp_penalty = if temperature <= temp_thresholds.cold_risk {
        (temp_thresholds.cold_risk - temperature) / 10.0 * 10.0
    } else if temperature >= temp_thresholds.hot_risk {
        (temperature - temp_thresholds.hot_risk) / 10.0 * 15.0
    } else {
        0.0
    };

    (rain_score + temp_penalty).min(100.0)
}

/// Demand risk component (0-100).
///
/// Surge demand above `high` (0.85) strains capacity hardest, hence the wide
/// 60-100 top band. Bands: 0-10 / 10-30 / 30-60 / 60-100.
pub fn demand_risk_score(
    demand_index: f64,
    demand_7d_avg: Option<f64>,
    thresholds: &FactorThresholds,
) -> f64 {
    let effective = effective_signal(demand_index, demand_7d_avg);

    if effective >= thresholds.high {
        let excess = (effective - thresholds.high) / (1.0 - thresholds.high);
        (60.0 + excess * 40.0).min(100.0)
    } else if effective >= thresholds.medium {
        let excess = (effective - thresholds.medium) / (thresholds.high - thresholds.medium);
        30.0 + excess * 30.0
    } else if effective >= thresholds.low {
        let excess = (effective - thresholds.low) / (thresholds.medium - thresholds.low);
        10.0 + excess * 20.0
    } else {
        effective / thresholds.low * 10.0
    }
}
