// Latest-usable-period selection with the country -> region fallback.
use serde::Serialize;
use tracing::{info, warn};

use crate::classify::Partitions;
use crate::types::EmissionRecord;

/// Decided once per run and handed to every view that needs "the current
/// snapshot".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionContext {
    pub latest_country_period: Option<String>,
    pub latest_region_period: Option<String>,
    pub use_countries: bool,
}

impl SelectionContext {
    /// Period the snapshot views are computed for.
    pub fn selected_period(&self) -> Option<&str> {
        if self.use_countries {
            self.latest_country_period.as_deref()
        } else {
            self.latest_region_period.as_deref()
        }
    }

    pub fn entity_label(&self) -> &'static str {
        if self.use_countries {
            "Country"
        } else {
            "Region"
        }
    }

    /// The subset matching the fallback decision.
    pub fn active<'p, 'a>(&self, parts: &'p Partitions<'a>) -> &'p [&'a EmissionRecord] {
        if self.use_countries {
            &parts.countries_only
        } else {
            &parts.regions_only
        }
    }
}

fn newest_with_rows(periods_desc: &[String], subset: &[&EmissionRecord]) -> Option<String> {
    periods_desc
        .iter()
        .find(|p| subset.iter().any(|r| &r.period == *p))
        .cloned()
}

pub fn select_periods(parts: &Partitions<'_>, periods_desc: &[String]) -> SelectionContext {
    let latest_country_period = newest_with_rows(periods_desc, &parts.countries_only);
    let latest_region_period = newest_with_rows(periods_desc, &parts.regions_only);
    let use_countries = latest_country_period.is_some() && !parts.countries_only.is_empty();

    let ctx = SelectionContext {
        latest_country_period,
        latest_region_period,
        use_countries,
    };
    if ctx.use_countries {
        info!(period = ?ctx.latest_country_period, "using country-level rows");
    } else if ctx.latest_region_period.is_some() {
        warn!(period = ?ctx.latest_region_period, "no country-level rows, falling back to regions");
    } else {
        warn!("neither country nor region rows found; entity views will be empty");
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::partition;
    use crate::loader::read_wide_table;
    use crate::normalize::normalize;

    fn context(csv: &str) -> SelectionContext {
        let n = normalize(&read_wide_table(csv.as_bytes()).unwrap()).unwrap();
        let parts = partition(&n.records);
        select_periods(&parts, &n.periods_desc())
    }

    #[test]
    fn picks_newest_period_with_country_rows() {
        let ctx = context(
            "Country,2010Q1,2010Q2,2010Q3\n\
             Testland,1,2,\n\
             Europe,1,2,3\n",
        );
        assert!(ctx.use_countries);
        assert_eq!(ctx.latest_country_period.as_deref(), Some("2010Q2"));
        assert_eq!(ctx.latest_region_period.as_deref(), Some("2010Q3"));
        assert_eq!(ctx.selected_period(), Some("2010Q2"));
        assert_eq!(ctx.entity_label(), "Country");
    }

    #[test]
    fn falls_back_to_regions_without_country_rows() {
        let ctx = context(
            "Country,2010Q1,2010Q2\n\
             World,5,6\n\
             Asia,1,2\n\
             Africa,3,\n",
        );
        assert!(!ctx.use_countries);
        assert_eq!(ctx.latest_country_period, None);
        assert_eq!(ctx.latest_region_period.as_deref(), Some("2010Q2"));
        assert_eq!(ctx.selected_period(), Some("2010Q2"));
        assert_eq!(ctx.entity_label(), "Region");
    }

    #[test]
    fn newest_period_without_countries_still_uses_older_country_period() {
        // country rows exist, just not in the newest column
        let ctx = context(
            "Country,2010Q1,2010Q2\n\
             Testland,1,\n\
             Oceania,1,2\n",
        );
        assert!(ctx.use_countries);
        assert_eq!(ctx.selected_period(), Some("2010Q1"));
    }

    #[test]
    fn empty_subsets_yield_no_periods() {
        let ctx = context("Country,2010Q1\nWorld,1\n");
        assert!(!ctx.use_countries);
        assert_eq!(ctx.selected_period(), None);
    }
}
