// Percent change per entity between a base year and a comparison year.
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::PctChangeRow;

/// Comparison year: the newest year present, capped. With no data at all the
/// base year is used so the window collapses instead of failing.
pub fn resolve_compare_year<'k, I>(years: I, base_year: i32, cap: i32) -> i32
where
    I: IntoIterator<Item = &'k i32>,
{
    years.into_iter().max().map(|max| (*max).min(cap)).unwrap_or(base_year)
}

/// Inner join of base-year and compare-year sums; entities missing either
/// year or with a non-positive base are left out. Sorted ascending, so the
/// largest decreases come first.
pub fn percent_change(
    yearly: &BTreeMap<(String, i32), f64>,
    base_year: i32,
    compare_year: i32,
) -> Vec<PctChangeRow> {
    let mut rows: Vec<PctChangeRow> = yearly
        .iter()
        .filter(|((_, year), _)| *year == base_year)
        .filter(|(_, base)| **base > 0.0)
        .filter_map(|((entity, _), base)| {
            let comp = yearly.get(&(entity.clone(), compare_year))?;
            Some(PctChangeRow {
                entity: entity.clone(),
                base: *base,
                comp: *comp,
                pct_change: (comp - base) / base * 100.0,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.pct_change.partial_cmp(&b.pct_change).unwrap_or(Ordering::Equal));
    rows
}
