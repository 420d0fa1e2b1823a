use crate::error::Result;
use crate::reports::GasBreakdownView;
use crate::util::format_number;
use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

/// The gas pivot has one column per gas, so it is written record by record.
pub fn write_gas_pivot(path: &Path, view: &GasBreakdownView) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["Date".to_string()];
    header.extend(view.gases.iter().cloned());
    wtr.write_record(&header)?;
    for row in &view.rows {
        let mut record = vec![row.date.to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = view.rows.len(), "wrote gas pivot");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn preview_gas_pivot(view: &GasBreakdownView, max_rows: usize) {
    if view.rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    let mut header = vec!["Date".to_string()];
    header.extend(view.gases.iter().cloned());
    builder.push_record(header);
    for row in view.rows.iter().take(max_rows) {
        let mut record = vec![row.date.to_string()];
        record.extend(row.values.iter().map(|v| format_number(*v, 2)));
        builder.push_record(record);
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::GasPivotRow;
    use crate::classify::EntityLabel;
    use crate::types::{EntityLabelRow, EntityTotal};
    use chrono::NaiveDate;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("emissions_report_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn writes_serialized_rows_with_renamed_headers() {
        let path = scratch("top.csv");
        let rows = vec![EntityTotal { entity: "Testland".to_string(), emissions: 12.5 }];
        write_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Entity,Emissions\nTestland,12.5\n");
    }

    #[test]
    fn entity_labels_use_display_names() {
        let path = scratch("labels.csv");
        let rows = vec![
            EntityLabelRow { entity: "Europe".to_string(), label: EntityLabel::CleanRegion },
            EntityLabelRow { entity: "Testland".to_string(), label: EntityLabel::Country },
        ];
        write_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Entity,Label\nEurope,Clean Region\nTestland,Country\n");
        assert_eq!(EntityLabel::CleanRegion.to_string(), "Clean Region");
    }

    #[test]
    fn writes_gas_pivot_with_dynamic_columns() {
        let path = scratch("gas.csv");
        let view = GasBreakdownView {
            title: "gas".to_string(),
            gases: vec!["CH4".to_string(), "CO2".to_string()],
            rows: vec![GasPivotRow {
                date: NaiveDate::from_ymd_opt(2010, 3, 1).unwrap(),
                values: vec![0.0, 10.0],
            }],
        };
        write_gas_pivot(&path, &view).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Date,CH4,CO2\n2010-03-01,0,10\n");
    }
}
