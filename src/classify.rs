// Entity classification: is a name a single country, and is it one of the
// five canonical regions?
//
// The two questions are answered by independent predicates. All five region
// names also contain an aggregate keyword, so a region is "not a country" and
// "a clean region" at the same time.
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::types::EmissionRecord;

/// Matched case-insensitively as unanchored substrings, so a country whose
/// name merely contains e.g. "Union" is treated as an aggregate too.
pub const AGGREGATE_KEYWORDS: [&str; 26] = [
    "World",
    "G20",
    "G7",
    "EU",
    "Europe",
    "European Union",
    "Americas",
    "Northern America",
    "Latin America",
    "Asia",
    "Eastern Asia",
    "South-eastern Asia",
    "Southern Asia",
    "Western Asia",
    "Oceania",
    "Africa",
    "Northern Africa",
    "Sub-Saharan Africa",
    "Australia and New Zealand",
    "Advanced Economies",
    "Emerging and Developing Economies",
    "Other Oceania sub-regions",
    "Middle East",
    "Caribbean",
    "Union",
    "Community",
];

pub const CLEAN_REGIONS: [&str; 5] = ["Africa", "Americas", "Asia", "Europe", "Oceania"];

/// A blank name stands in for a missing one and is never a country.
pub fn is_aggregate(name: &str) -> bool {
    if name.trim().is_empty() {
        return true;
    }
    let lower = name.to_lowercase();
    AGGREGATE_KEYWORDS.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// Exact, case-sensitive membership in the five-region allow-list.
pub fn is_clean_region(name: &str) -> bool {
    CLEAN_REGIONS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityLabel {
    Aggregate,
    #[serde(rename = "Clean Region")]
    CleanRegion,
    Country,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityLabel::Aggregate => "Aggregate",
            EntityLabel::CleanRegion => "Clean Region",
            EntityLabel::Country => "Country",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub aggregate: bool,
    pub clean_region: bool,
}

impl Classification {
    pub fn of(name: &str) -> Self {
        Classification {
            aggregate: is_aggregate(name),
            clean_region: is_clean_region(name),
        }
    }

    /// Single label for display. Anything passing the aggregate test is a
    /// country regardless of the region list.
    pub fn label(self) -> EntityLabel {
        match (self.aggregate, self.clean_region) {
            (false, _) => EntityLabel::Country,
            (true, true) => EntityLabel::CleanRegion,
            (true, false) => EntityLabel::Aggregate,
        }
    }
}

/// The two record subsets every entity-level view works from.
#[derive(Debug, Clone, Default)]
pub struct Partitions<'a> {
    pub countries_only: Vec<&'a EmissionRecord>,
    pub regions_only: Vec<&'a EmissionRecord>,
}

pub fn classify_names<'a, I>(names: I) -> HashMap<&'a str, Classification>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = HashMap::new();
    for name in names {
        out.entry(name).or_insert_with(|| Classification::of(name));
    }
    out
}

pub fn partition(records: &[EmissionRecord]) -> Partitions<'_> {
    let classes = classify_names(records.iter().map(|r| r.country.as_str()));
    let mut parts = Partitions::default();
    for r in records {
        let class = classes[r.country.as_str()];
        if !class.aggregate {
            parts.countries_only.push(r);
        }
        if class.clean_region {
            parts.regions_only.push(r);
        }
    }
    debug!(
        entities = classes.len(),
        country_rows = parts.countries_only.len(),
        region_rows = parts.regions_only.len(),
        "classified entities"
    );
    parts
}
