mod alerts;
mod config;
mod core;
mod scoring;
mod table;
mod tiers;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::core::RiskLevel;
use crate::scoring::RiskEngine;
use crate::tiers::TierLookup;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cityrisk=info".parse().unwrap()),
        )
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".into());
    let config = Config::load(&config_path).context("loading configuration")?;

    // City tier table: built-in list plus optional CSV overrides
    let mut tier_lookup = TierLookup::builtin();
    if let Some(ref csv_path_str) = config.data.city_tiers_csv {
        let csv_path = Path::new(csv_path_str);
        tier_lookup
            .load_csv(csv_path)
            .with_context(|| format!("loading city tiers from {csv_path_str}"))?;
    }

    let features_path = Path::new(&config.data.features_path);
    let features = table::read_features(features_path)
        .with_context(|| format!("reading feature table {}", features_path.display()))?;
    if features.is_empty() {
        tracing::warn!("Feature table {} is empty, nothing to score", features_path.display());
    }

    let output_dir = config.data.output_dir.clone();
    let engine = RiskEngine::new(config, tier_lookup);
    let risk_table = engine.score_all(&features);
    let alert_table = alerts::generate_alerts(&risk_table, None);

    let output_dir = Path::new(&output_dir);
    let risk_path = output_dir.join("daily_city_risk.csv");
    let alerts_path = output_dir.join("alerts_today.csv");
    table::write_risk_table(&risk_path, &risk_table).context("writing risk table")?;
    table::write_alerts(&alerts_path, &alert_table).context("writing alert table")?;
    tracing::info!("Risk scores saved to {}", risk_path.display());
    tracing::info!("Alerts saved to {}", alerts_path.display());

    log_summary(&risk_table, &alert_table);

    Ok(())
}

/// Run summary: coverage, date range, latest-date risk distribution, alerts.
fn log_summary(risk_table: &[crate::core::RiskRecord], alert_table: &[crate::core::AlertRecord]) {
    let cities: BTreeSet<&str> = risk_table.iter().map(|r| r.city.as_str()).collect();
    tracing::info!("Total cities monitored: {}", cities.len());

    let min_date = risk_table.iter().map(|r| r.date).min();
    let max_date = risk_table.iter().map(|r| r.date).max();
    if let (Some(min), Some(max)) = (min_date, max_date) {
        tracing::info!("Date range: {min} to {max}");

        let (mut low, mut medium, mut high) = (0usize, 0usize, 0usize);
        for record in risk_table.iter().filter(|r| r.date == max) {
            match record.risk_classification {
                RiskLevel::Low => low += 1,
                RiskLevel::Medium => medium += 1,
                RiskLevel::High => high += 1,
            }
        }
        tracing::info!("Risk distribution for {max}: low={low} medium={medium} high={high}");
    }

    tracing::info!("High-risk alerts today: {}", alert_table.len());
    for alert in alert_table {
        let sla = tiers::sla_thresholds(alert.city_tier);
        tracing::info!(
            "  {} [{}, SLA {}/{}/{}min] score {:.1}: {}",
            alert.city,
            alert.city_tier,
            sla.target,
            sla.warning,
            sla.critical,
            alert.risk_score,
            alert.alert_reason
        );
    }
}
