use chrono::NaiveDate;

use crate::core::{AlertRecord, RiskLevel, RiskRecord};

/// A component score at or above this contributes a named clause to the
/// alert reason. Deliberately independent of the High classification cut:
/// a city can classify High on combined moderate factors with no single
/// component crossing this line.
pub const COMPONENT_ALERT_THRESHOLD: f64 = 60.0;

/// Build the alert list for one date (default: latest date in the table).
///
/// Selects High-classified rows, orders them by risk score descending with
/// city name ascending as the tie-break, and attaches a reason string.
pub fn generate_alerts(risk_table: &[RiskRecord], date: Option<NaiveDate>) -> Vec<AlertRecord> {
    let target = match date.or_else(|| risk_table.iter().map(|r| r.date).max()) {
        Some(d) => d,
        None => return Vec::new(),
    };

    let mut alerts: Vec<AlertRecord> = risk_table
        .iter()
        .filter(|r| r.date == target && r.risk_classification == RiskLevel::High)
        .map(|r| AlertRecord::from_risk(r.clone(), alert_reason(r)))
        .collect();

    alerts.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.city.cmp(&b.city))
    });

    alerts
}

/// One clause per component that breached the explanatory threshold, in
/// fixed traffic/weather/demand order, naming the raw signal that drove it.
fn alert_reason(risk: &RiskRecord) -> String {
    let mut reasons = Vec::new();

    if risk.traffic_risk >= COMPONENT_ALERT_THRESHOLD {
        reasons.push(format!(
            "High traffic congestion ({:.2})",
            risk.congestion_level
        ));
    }
    if risk.weather_risk >= COMPONENT_ALERT_THRESHOLD {
        reasons.push(format!("Heavy rainfall ({:.1}mm)", risk.rainfall_mm));
    }
    if risk.demand_risk >= COMPONENT_ALERT_THRESHOLD {
        reasons.push(format!("Demand surge ({:.2})", risk.demand_index));
    }

    if reasons.is_empty() {
        // No single factor crossed the line; the weighted combination did.
        reasons.push("Multiple risk factors combined".to_string());
    }

    reasons.join("; ")
}
