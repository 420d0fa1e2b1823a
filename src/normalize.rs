// Wide-to-long reshaping of the quarterly table.
//
// Every column whose header is a period label becomes one record per row;
// every other column is a descriptor. Cells without a usable number are
// dropped individually.
use crate::error::{PipelineError, Result};
use crate::period::{is_period_label, parse_period, PeriodStamp};
use crate::types::{EmissionRecord, WideTable};
use crate::util::parse_f64_safe;
use tracing::{debug, info};

/// Descriptor columns the pipeline relies on, with the value used for every
/// record when the column is absent from the source.
pub const DESCRIPTOR_SCHEMA: [(&str, &str); 4] = [
    ("Country", "Unknown Country"),
    ("Industry", "Unknown Industry"),
    ("Gas Type", "Unknown Gas"),
    ("Unit", "Units"),
];

pub const DEFAULT_UNIT: &str = "Units";

#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub period_columns: usize,
    pub records: usize,
    pub dropped_cells: usize,
    pub defaulted_columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<EmissionRecord>,
    /// Period column headers as they appear in the source.
    pub periods: Vec<String>,
    pub report: NormalizeReport,
}

impl Normalized {
    /// Unit of the first record; every view is labelled with it.
    pub fn unit_label(&self) -> &str {
        self.records.first().map(|r| r.unit.as_str()).unwrap_or(DEFAULT_UNIT)
    }

    pub fn periods_desc(&self) -> Vec<String> {
        let mut periods = self.periods.clone();
        periods.sort_unstable_by(|a, b| b.cmp(a));
        periods
    }
}

/// Where a descriptor value comes from: a source column or a fixed default.
enum Descriptor<'a> {
    Column(usize),
    Default(&'a str),
}

impl Descriptor<'_> {
    fn value(&self, row: &[String]) -> String {
        match self {
            Descriptor::Column(idx) => row.get(*idx).cloned().unwrap_or_default(),
            Descriptor::Default(v) => v.to_string(),
        }
    }
}

pub fn normalize(table: &WideTable) -> Result<Normalized> {
    let period_cols: Vec<(usize, &str, PeriodStamp)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_period_label(h))
        .filter_map(|(idx, h)| parse_period(h).map(|stamp| (idx, h.as_str(), stamp)))
        .collect();
    if period_cols.is_empty() {
        return Err(PipelineError::Schema("No columns like '2010Q1' found in the CSV.".to_string()));
    }

    let mut defaulted_columns = Vec::new();
    let descriptors: Vec<Descriptor> = DESCRIPTOR_SCHEMA
        .iter()
        .map(|(name, default)| match table.headers.iter().position(|h| h == name) {
            Some(idx) => Descriptor::Column(idx),
            None => {
                debug!(column = *name, default = *default, "descriptor column missing, using default");
                defaulted_columns.push(name.to_string());
                Descriptor::Default(*default)
            }
        })
        .collect();

    let mut records = Vec::new();
    let mut dropped_cells = 0usize;
    for row in &table.rows {
        let [country, industry, gas_type, unit] =
            [0, 1, 2, 3].map(|i| descriptors[i].value(row));
        for (idx, label, stamp) in &period_cols {
            let Some(emissions) = parse_f64_safe(row.get(*idx).map(String::as_str)) else {
                dropped_cells += 1;
                continue;
            };
            records.push(EmissionRecord {
                country: country.clone(),
                industry: industry.clone(),
                gas_type: gas_type.clone(),
                unit: unit.clone(),
                period: label.to_string(),
                emissions,
                year: stamp.year,
                quarter: stamp.quarter,
                date: stamp.date,
            });
        }
    }

    let report = NormalizeReport {
        total_rows: table.rows.len(),
        period_columns: period_cols.len(),
        records: records.len(),
        dropped_cells,
        defaulted_columns,
    };
    info!(
        rows = report.total_rows,
        periods = report.period_columns,
        records = report.records,
        dropped = report.dropped_cells,
        "normalized wide table"
    );
    let periods = period_cols.iter().map(|(_, label, _)| label.to_string()).collect();
    Ok(Normalized { records, periods, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_wide_table;
    use chrono::NaiveDate;

    fn table(csv: &str) -> WideTable {
        read_wide_table(csv.as_bytes()).unwrap()
    }

    #[test]
    fn no_period_columns_is_a_schema_error() {
        let err = normalize(&table("Country,Industry,2010\nA,B,1\n")).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn melts_rows_and_drops_missing_cells() {
        let t = table(
            "Country,Industry,Gas Type,Unit,2010Q1,2010Q2,Notes\n\
             Testland,Energy,CO2,Mt,10,,x\n\
             Otherland,Waste,CH4,Mt,n/a,2.5,y\n",
        );
        let n = normalize(&t).unwrap();
        assert_eq!(n.records.len(), 2);
        assert_eq!(n.report.dropped_cells, 2);
        assert_eq!(n.report.period_columns, 2);
        assert!(n.report.defaulted_columns.is_empty());

        let first = &n.records[0];
        assert_eq!(first.country, "Testland");
        assert_eq!(first.gas_type, "CO2");
        assert_eq!(first.period, "2010Q1");
        assert_eq!(first.emissions, 10.0);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2010, 3, 1).unwrap());
        assert_eq!(n.records[1].period, "2010Q2");
        assert_eq!(n.records[1].year, 2010);
    }

    #[test]
    fn reshape_conserves_total() {
        let t = table(
            "Country,2010Q1,2010Q2,2011Q1\n\
             A,1.5,2,\n\
             B,,4,8\n\
             C,16,,32\n",
        );
        let n = normalize(&t).unwrap();
        let total: f64 = n.records.iter().map(|r| r.emissions).sum();
        assert_eq!(total, 1.5 + 2.0 + 4.0 + 8.0 + 16.0 + 32.0);
        assert_eq!(n.report.dropped_cells, 3);
    }

    #[test]
    fn padded_headers_and_names_are_not_trimmed() {
        let n = normalize(&table("Country,2010Q1 ,2010Q2\n Europe,1,2\n")).unwrap();
        assert_eq!(n.periods, vec!["2010Q2"]);
        assert_eq!(n.records.len(), 1);
        assert_eq!(n.records[0].country, " Europe");
        assert!(!crate::classify::is_clean_region(&n.records[0].country));

        let err = normalize(&table("Country,2010Q1 \nTestland,1\n")).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn exponent_notation_cells_are_kept() {
        let n = normalize(&table("Country,2010Q1,2010Q2,2010Q3
Testland,1.5e3,2E-1,NaN
")).unwrap();
        assert_eq!(n.records.len(), 2);
        assert_eq!(n.report.dropped_cells, 1);
        assert_eq!(n.records[0].emissions, 1500.0);
        assert_eq!(n.records[1].emissions, 0.2);
    }

    #[test]
    fn missing_descriptors_get_defaults() {
        let n = normalize(&table("Country,2010Q1\nTestland,3\n")).unwrap();
        let r = &n.records[0];
        assert_eq!(r.country, "Testland");
        assert_eq!(r.industry, "Unknown Industry");
        assert_eq!(r.gas_type, "Unknown Gas");
        assert_eq!(r.unit, "Units");
        assert_eq!(n.report.defaulted_columns, vec!["Industry", "Gas Type", "Unit"]);

        let n = normalize(&table("2010Q1\n3\n")).unwrap();
        assert_eq!(n.records[0].country, "Unknown Country");
    }

    #[test]
    fn unit_label_and_period_order() {
        let n = normalize(&table("Unit,2010Q2,2011Q1,2010Q4\nkt,1,2,3\n")).unwrap();
        assert_eq!(n.unit_label(), "kt");
        assert_eq!(n.periods_desc(), vec!["2011Q1", "2010Q4", "2010Q2"]);

        let empty = normalize(&table("Unit,2010Q1\nkt,\n")).unwrap();
        assert!(empty.records.is_empty());
        assert_eq!(empty.unit_label(), "Units");
    }
}
