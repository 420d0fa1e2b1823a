/// Tunables for the analytical views.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub base_year: i32,
    /// Upper bound for the comparison year of the percent-change view.
    pub compare_year_cap: i32,
    /// Entities shown in the latest-period ranking (countries only).
    pub top_entities: usize,
    /// Industries and gas types kept in their breakdowns.
    pub top_categories: usize,
    /// Entities followed in the trend view (countries only).
    pub trend_entities: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            base_year: 2010,
            compare_year_cap: 2024,
            top_entities: 10,
            top_categories: 4,
            trend_entities: 5,
        }
    }
}
