use crate::aggregate::{is_total_industry, sum_by, top_keys, top_n};
use crate::change::{percent_change, resolve_compare_year};
use crate::classify::{classify_names, partition, Partitions, CLEAN_REGIONS};
use crate::config::AnalysisConfig;
use crate::normalize::Normalized;
use crate::select::{select_periods, SelectionContext};
use crate::types::{
    DatedTotal, EmissionRecord, EntityLabelRow, EntityTotal, PctChangeRow, SummaryStats, TrendRow,
    ViewSummary,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Shown by the sink in place of the percent-change chart when nothing joins.
pub const NO_COMPARISON_DATA: &str = "No data for comparison window";

#[derive(Debug, Clone, PartialEq)]
pub struct TopEntitiesView {
    pub title: String,
    pub entity_label: &'static str,
    pub period: Option<String>,
    pub use_countries: bool,
    pub rows: Vec<EntityTotal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndustryTrendView {
    pub title: String,
    /// Top industries in rank order.
    pub industries: Vec<String>,
    pub rows: Vec<TrendRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GasPivotRow {
    pub date: NaiveDate,
    /// One value per entry of `GasBreakdownView::gases`.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GasBreakdownView {
    pub title: String,
    /// Column order of the pivot; sorted by name.
    pub gases: Vec<String>,
    pub rows: Vec<GasPivotRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentChangeView {
    pub title: String,
    pub entity_label: &'static str,
    pub base_year: i32,
    pub compare_year: i32,
    pub rows: Vec<PctChangeRow>,
}

impl PercentChangeView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityTrendView {
    pub title: String,
    pub period: Option<String>,
    /// Entities followed, in rank order (or the fixed region order).
    pub entities: Vec<String>,
    pub rows: Vec<TrendRow>,
}

#[derive(Debug, Clone)]
pub struct ReportSet {
    pub unit_label: String,
    pub selection: SelectionContext,
    pub global: Vec<DatedTotal>,
    pub top_entities: TopEntitiesView,
    pub industries: IndustryTrendView,
    pub gases: GasBreakdownView,
    pub pct_change: PercentChangeView,
    pub trends: EntityTrendView,
    pub entity_labels: Vec<EntityLabelRow>,
}

pub const GLOBAL_TITLE: &str = "Global GHG Emissions Over Time";

fn period_text(period: Option<&str>) -> &str {
    period.unwrap_or("n/a")
}

fn trend_rows(sums: BTreeMap<(NaiveDate, String), f64>) -> Vec<TrendRow> {
    sums.into_iter()
        .map(|((date, key), emissions)| TrendRow { date, key, emissions })
        .collect()
}

pub fn generate_global_series(records: &[EmissionRecord]) -> Vec<DatedTotal> {
    sum_by(records, |r| r.date)
        .into_iter()
        .map(|(date, emissions)| DatedTotal { date, emissions })
        .collect()
}

pub fn generate_top_entities(
    parts: &Partitions<'_>,
    ctx: &SelectionContext,
    cfg: &AnalysisConfig,
) -> TopEntitiesView {
    let period = ctx.selected_period();
    let snapshot = ctx
        .active(parts)
        .iter()
        .copied()
        .filter(|r| Some(r.period.as_str()) == period);
    let sums = sum_by(snapshot, |r| r.country.clone());
    let (limit, title) = if ctx.use_countries {
        (
            Some(cfg.top_entities),
            format!("Top {} Countries - {}", cfg.top_entities, period_text(period)),
        )
    } else {
        // at most five regions exist, so no cap
        (None, format!("Top Regions - {}", period_text(period)))
    };
    let rows = top_n(sums, limit)
        .into_iter()
        .map(|(entity, emissions)| EntityTotal { entity, emissions })
        .collect();
    TopEntitiesView {
        title,
        entity_label: ctx.entity_label(),
        period: period.map(str::to_string),
        use_countries: ctx.use_countries,
        rows,
    }
}

pub fn generate_industry_trends(records: &[EmissionRecord], cfg: &AnalysisConfig) -> IndustryTrendView {
    let non_total: Vec<&EmissionRecord> = records.iter().filter(|r| !is_total_industry(&r.industry)).collect();
    let industries = top_keys(sum_by(non_total.iter().copied(), |r| r.industry.clone()), cfg.top_categories);
    let wanted: HashSet<&str> = industries.iter().map(String::as_str).collect();
    let sums = sum_by(
        non_total.iter().copied().filter(|r| wanted.contains(r.industry.as_str())),
        |r| (r.date, r.industry.clone()),
    );
    IndustryTrendView {
        title: format!("Emission Trends by Industry (Top {}, excluding Totals)", cfg.top_categories),
        industries,
        rows: trend_rows(sums),
    }
}

pub fn generate_gas_breakdown(records: &[EmissionRecord], cfg: &AnalysisConfig) -> GasBreakdownView {
    let mut gases = top_keys(sum_by(records, |r| r.gas_type.clone()), cfg.top_categories);
    gases.sort();
    let sums = sum_by(
        records.iter().filter(|r| gases.contains(&r.gas_type)),
        |r| (r.date, r.gas_type.clone()),
    );

    let mut pivot: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for ((date, gas), total) in sums {
        let values = pivot.entry(date).or_insert_with(|| vec![0.0; gases.len()]);
        if let Some(col) = gases.iter().position(|g| *g == gas) {
            values[col] = total;
        }
    }
    GasBreakdownView {
        title: format!("Emission Breakdown by Gas Type (Top {})", cfg.top_categories),
        gases,
        rows: pivot
            .into_iter()
            .map(|(date, values)| GasPivotRow { date, values })
            .collect(),
    }
}

pub fn generate_percent_change(
    parts: &Partitions<'_>,
    ctx: &SelectionContext,
    cfg: &AnalysisConfig,
) -> PercentChangeView {
    let yearly = sum_by(ctx.active(parts).iter().copied(), |r| (r.country.clone(), r.year));
    let compare_year = resolve_compare_year(yearly.keys().map(|(_, year)| year), cfg.base_year, cfg.compare_year_cap);
    let rows = percent_change(&yearly, cfg.base_year, compare_year);
    if rows.is_empty() {
        debug!(base = cfg.base_year, compare = compare_year, "percent-change join is empty");
    }
    PercentChangeView {
        title: format!(
            "Percent Change in Emissions by {} ({} -> {})",
            ctx.entity_label(),
            cfg.base_year,
            compare_year
        ),
        entity_label: ctx.entity_label(),
        base_year: cfg.base_year,
        compare_year,
        rows,
    }
}

pub fn generate_entity_trends(
    parts: &Partitions<'_>,
    ctx: &SelectionContext,
    cfg: &AnalysisConfig,
) -> EntityTrendView {
    let period = ctx.selected_period();
    if ctx.use_countries {
        let latest = parts
            .countries_only
            .iter()
            .copied()
            .filter(|r| Some(r.period.as_str()) == period);
        let entities = top_keys(sum_by(latest, |r| r.country.clone()), cfg.trend_entities);
        let wanted: HashSet<&str> = entities.iter().map(String::as_str).collect();
        let sums = sum_by(
            parts.countries_only.iter().copied().filter(|r| wanted.contains(r.country.as_str())),
            |r| (r.date, r.country.clone()),
        );
        EntityTrendView {
            title: format!(
                "Top {} Countries - Emissions Trends (through {})",
                cfg.trend_entities,
                period_text(period)
            ),
            period: period.map(str::to_string),
            entities,
            rows: trend_rows(sums),
        }
    } else {
        let sums = sum_by(parts.regions_only.iter().copied(), |r| (r.date, r.country.clone()));
        EntityTrendView {
            title: format!("Regional Emissions Trends (through {})", period_text(period)),
            period: period.map(str::to_string),
            entities: CLEAN_REGIONS.iter().map(|s| s.to_string()).collect(),
            rows: trend_rows(sums),
        }
    }
}

pub fn generate_entity_labels(records: &[EmissionRecord]) -> Vec<EntityLabelRow> {
    let classes = classify_names(records.iter().map(|r| r.country.as_str()));
    let mut rows: Vec<EntityLabelRow> = classes
        .into_iter()
        .map(|(name, class)| EntityLabelRow {
            entity: name.to_string(),
            label: class.label(),
        })
        .collect();
    rows.sort_by(|a, b| a.entity.cmp(&b.entity));
    rows
}

/// Run every view over one normalized dataset. The selection context is
/// computed here once and passed explicitly to each view.
pub fn build_reports(data: &Normalized, cfg: &AnalysisConfig) -> ReportSet {
    let parts = partition(&data.records);
    let selection = select_periods(&parts, &data.periods_desc());

    let report = ReportSet {
        unit_label: data.unit_label().to_string(),
        global: generate_global_series(&data.records),
        top_entities: generate_top_entities(&parts, &selection, cfg),
        industries: generate_industry_trends(&data.records, cfg),
        gases: generate_gas_breakdown(&data.records, cfg),
        pct_change: generate_percent_change(&parts, &selection, cfg),
        trends: generate_entity_trends(&parts, &selection, cfg),
        entity_labels: generate_entity_labels(&data.records),
        selection,
    };
    info!(
        global = report.global.len(),
        top = report.top_entities.rows.len(),
        industries = report.industries.rows.len(),
        gases = report.gases.rows.len(),
        pct_change = report.pct_change.rows.len(),
        trends = report.trends.rows.len(),
        "built report views"
    );
    report
}

pub fn generate_summary(data: &Normalized, report: &ReportSet, views: Vec<ViewSummary>) -> SummaryStats {
    SummaryStats {
        total_records: data.records.len(),
        unit_label: report.unit_label.clone(),
        use_countries: report.selection.use_countries,
        latest_country_period: report.selection.latest_country_period.clone(),
        latest_region_period: report.selection.latest_region_period.clone(),
        base_year: report.pct_change.base_year,
        compare_year: report.pct_change.compare_year,
        total_emissions: data.records.iter().map(|r| r.emissions).sum(),
        views,
    }
}
