use crate::config::RiskWeights;

/// Compute the combined risk score (0-100) from the three component scores.
pub fn combined_risk_score(
    traffic_score: f64,
    weather_score: f64,
    demand_score: f64,
    weights: &RiskWeights,
) -> f64 {
    let combined = traffic_score * weights.traffic
        + weather_score * weights.weather
        + demand_score * weights.demand;
    combined.clamp(0.0, 100.0)
}
