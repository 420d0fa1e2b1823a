use crate::error::Result;
use crate::types::WideTable;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub fn load_wide_table(path: &Path) -> Result<WideTable> {
    info!("Loading CSV: {}", path.display());
    let file = File::open(path)?;
    read_wide_table(file)
}

/// Read a header row plus string cells. Period columns are only known once the
/// header is inspected, so rows stay untyped here.
pub fn read_wide_table<R: Read>(reader: R) -> Result<WideTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // flexible() lets short rows through; pad them so column lookups stay valid
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    debug!(columns = headers.len(), rows = rows.len(), "read wide table");
    Ok(WideTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_rows_and_keeps_headers_verbatim() {
        let csv = "Country,2010Q1 ,2010Q2\nTestland,1\n";
        let table = read_wide_table(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Country", "2010Q1 ", "2010Q2"]);
        assert_eq!(table.rows, vec![vec!["Testland".to_string(), "1".to_string(), String::new()]]);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let table = read_wide_table("Country,2010Q1\n".as_bytes()).unwrap();
        assert!(table.rows.is_empty());
    }
}
