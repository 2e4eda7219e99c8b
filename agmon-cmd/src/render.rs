//! Plain-text rendering of reports.
//!
//! Scores and trends come from the analysis, where absent values were
//! counted as 0. NDVI and standard deviation columns are printed from
//! the observations themselves so absent readings show as "N/A".

use agmon_core::{Alert, MissingDataError};
use agmon_data::{alerts::AlertTriage, growth::Trend, DashboardReport, VegetationCategory};
use agmon_utils::format::{format_value, NOT_AVAILABLE};
use clap::ValueEnum;
use std::fmt;

/// Output format for report-style commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn trend_symbol(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "up",
        Trend::Down => "down",
        Trend::Stable => "stable",
    }
}

/// Explanation shown instead of a report when there is nothing to analyze.
pub fn render_empty_state(reason: &MissingDataError) -> String {
    format!("No satellite observations available to analyze ({reason}).\n")
}

pub fn render_alert(alert: &Alert) -> String {
    format!(
        "{}  {:<8} {:<12} value={} threshold={}  {}",
        alert.month,
        alert.severity.as_str(),
        alert.kind,
        format_value(alert.value, 3),
        format_value(alert.threshold, 3),
        alert.message
    )
}

/// Text form of an alert triage.
pub struct TriageText<'a>(pub &'a AlertTriage);

impl fmt::Display for TriageText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let triage = self.0;
        writeln!(
            f,
            "Alerts: {} total, {} high severity",
            triage.total,
            triage.high.len()
        )?;
        for alert in triage.high.iter().chain(triage.other.iter()) {
            writeln!(f, "  {}", render_alert(alert))?;
        }
        Ok(())
    }
}

pub fn render_triage(triage: &AlertTriage) -> String {
    TriageText(triage).to_string()
}

/// Text form of a full dashboard report.
pub struct ReportText<'a>(pub &'a DashboardReport);

impl ReportText<'_> {
    fn write_validation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let validation = &self.0.validation;
        writeln!(f, "Data validation")?;
        writeln!(f, "  Quality score:     {:>3}%", validation.quality_score)?;
        writeln!(f, "  Consistency score: {:>3}%", validation.consistency_score)?;
        writeln!(f, "  Coverage score:    {:>3}%", validation.coverage_score)?;
        writeln!(f, "  Overall score:     {:>3}%", validation.overall_score)?;
        writeln!(
            f,
            "  Growth pattern:    {}",
            if validation.is_realistic {
                "realistic"
            } else {
                "unusual"
            }
        )
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let summary = &report.summary;
        writeln!(
            f,
            "Summary: {} months ({} with NDVI), average NDVI {}, latest {} = {} ({})",
            summary.months,
            summary.months_with_ndvi,
            format_value(summary.average_ndvi, 3),
            summary.latest_month,
            format_value(summary.latest_ndvi, 3),
            summary
                .latest_category
                .map(|c| c.label())
                .unwrap_or(NOT_AVAILABLE)
        )?;
        if let Some(freshness) = &report.freshness {
            writeln!(
                f,
                "Freshness: latest month {} is {} month(s) old{}",
                freshness.latest_month,
                freshness.months_since_latest,
                if freshness.is_current { "" } else { " (stale)" }
            )?;
        }
        if !report.missing_months.is_empty() {
            writeln!(f, "Missing months: {}", report.missing_months.join(", "))?;
        }
        Ok(())
    }

    fn write_series(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "{:<8} {:>6} {:>7} {:>7} {:<7} {:<8} {}",
            "month", "ndvi", "stddev", "change", "trend", "quality", "category"
        )?;
        for (obs, point) in report
            .series
            .iter()
            .zip(report.validation.growth_pattern.iter())
        {
            let category = obs
                .ndvi_value
                .map(VegetationCategory::from_ndvi)
                .map(|c| c.label())
                .unwrap_or(NOT_AVAILABLE);
            writeln!(
                f,
                "{:<8} {:>6} {:>7} {:>+7.3} {:<7} {:<8} {}",
                obs.month,
                format_value(obs.ndvi_value, 3),
                format_value(obs.std_dev, 3),
                point.change,
                trend_symbol(point.trend),
                obs.data_quality.as_str(),
                category
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        self.write_validation(f)?;
        writeln!(f)?;
        self.write_summary(f)?;
        writeln!(f)?;
        self.write_series(f)?;
        writeln!(f)?;
        write!(f, "{}", TriageText(&report.alerts))?;
        if !report.threshold_alerts.is_empty() {
            writeln!(f, "Threshold alerts: {}", report.threshold_alerts.len())?;
            for alert in &report.threshold_alerts {
                writeln!(f, "  {}", render_alert(alert))?;
            }
        }
        Ok(())
    }
}

/// Render a full dashboard report as text.
pub fn render_report(report: &DashboardReport) -> String {
    ReportText(report).to_string()
}
