// Entry point and high-level CLI flow.
//
// - Option [1] loads and normalizes the quarterly CSV, printing diagnostics.
// - Option [2] builds the six emissions views, writes each one to CSV plus a
//   JSON summary, and previews them on the console.
// - After generating reports, the user can go back to the menu or exit.
mod aggregate;
mod change;
mod classify;
mod config;
mod error;
mod loader;
mod normalize;
mod output;
mod period;
mod reports;
mod select;
mod types;
mod util;

use clap::Parser;
use config::AnalysisConfig;
use normalize::Normalized;
use once_cell::sync::Lazy;
use reports::ReportSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use types::ViewSummary;

#[derive(Parser, Debug)]
#[command(author, version, about = "Quarterly greenhouse-gas emissions report", long_about = None)]
struct Args {
    /// Wide-format CSV with one column per quarter (e.g. 2010Q1)
    #[arg(short, long, default_value = "emissions.csv")]
    input: PathBuf,

    /// Directory the report tables are written to
    #[arg(short, long, default_value = "reports")]
    out_dir: PathBuf,

    /// Base year of the percent-change view
    #[arg(long, default_value_t = 2010)]
    base_year: i32,

    /// Latest year the percent-change view may compare against
    #[arg(long, default_value_t = 2024)]
    compare_cap: i32,

    /// Rows shown per table preview
    #[arg(long, default_value_t = 3)]
    preview_rows: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            base_year: self.base_year,
            compare_year_cap: self.compare_cap,
            ..AnalysisConfig::default()
        }
    }
}

// Load once, generate reports as many times as the user asks for them.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Normalized>,
}

/// `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and normalize the CSV file.
fn handle_load(args: &Args) {
    let loaded = loader::load_wide_table(&args.input).and_then(|table| normalize::normalize(&table));
    match loaded {
        Ok(data) => {
            let r = &data.report;
            println!(
                "Processing dataset... ({} rows loaded, {} quarterly records across {} periods)",
                util::format_int(r.total_rows),
                util::format_int(r.records),
                util::format_int(r.period_columns)
            );
            println!("Note: {} empty or non-numeric cells skipped.", util::format_int(r.dropped_cells));
            if !r.defaulted_columns.is_empty() {
                println!("Info: Filled missing columns with defaults: {}", r.defaulted_columns.join(", "));
            }
            println!();
            let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.data = Some(data);
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn write_views(args: &Args, report: &ReportSet) -> error::Result<Vec<ViewSummary>> {
    std::fs::create_dir_all(&args.out_dir)?;
    let dir = &args.out_dir;
    let mut views = Vec::new();
    let mut record = |title: &str, file: &str, rows: usize| {
        views.push(ViewSummary {
            title: title.to_string(),
            file: file.to_string(),
            rows,
        })
    };

    let file = "fig1_global_emissions_over_time.csv";
    output::write_csv(&dir.join(file), &report.global)?;
    record(reports::GLOBAL_TITLE, file, report.global.len());

    let file = "fig2_top_entities_latest_period.csv";
    output::write_csv(&dir.join(file), &report.top_entities.rows)?;
    record(&report.top_entities.title, file, report.top_entities.rows.len());

    let file = "fig3_industry_trends_excl_total.csv";
    output::write_csv(&dir.join(file), &report.industries.rows)?;
    record(&report.industries.title, file, report.industries.rows.len());

    let file = "fig4_gas_type_stacked_area.csv";
    output::write_gas_pivot(&dir.join(file), &report.gases)?;
    record(&report.gases.title, file, report.gases.rows.len());

    let file = "fig5_percent_change.csv";
    output::write_csv(&dir.join(file), &report.pct_change.rows)?;
    record(&report.pct_change.title, file, report.pct_change.rows.len());

    let file = "fig6_top_entity_trends.csv";
    output::write_csv(&dir.join(file), &report.trends.rows)?;
    record(&report.trends.title, file, report.trends.rows.len());

    let file = "entity_labels.csv";
    output::write_csv(&dir.join(file), &report.entity_labels)?;
    record("Entity Classification", file, report.entity_labels.len());

    Ok(views)
}

fn print_previews(args: &Args, report: &ReportSet) {
    let n = args.preview_rows;
    println!("Unit: {}\n", report.unit_label);

    println!("View 1: {}\n", reports::GLOBAL_TITLE);
    output::preview_table_rows(&report.global, n);

    println!("View 2: {}", report.top_entities.title);
    println!("(by {})\n", report.top_entities.entity_label);
    output::preview_table_rows(&report.top_entities.rows, n);

    println!("View 3: {}", report.industries.title);
    println!("(Industries: {})\n", report.industries.industries.join(", "));
    output::preview_table_rows(&report.industries.rows, n);

    println!("View 4: {}\n", report.gases.title);
    output::preview_gas_pivot(&report.gases, n);

    println!("View 5: {}\n", report.pct_change.title);
    if report.pct_change.is_empty() {
        println!("({})\n", reports::NO_COMPARISON_DATA);
    } else {
        output::preview_table_rows(&report.pct_change.rows, n);
    }

    println!("View 6: {}", report.trends.title);
    println!("(Entities: {})\n", report.trends.entities.join(", "));
    output::preview_table_rows(&report.trends.rows, n);
}

/// Handle option [2]: build all views, write them out and preview them.
fn handle_generate_reports(args: &Args) {
    let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    let Some(data) = state.data.as_ref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    println!("Generating reports...");
    let report = reports::build_reports(data, &args.analysis_config());
    print_previews(args, &report);

    let written = write_views(args, &report).and_then(|views| {
        let summary = reports::generate_summary(data, &report, views);
        output::write_json(&args.out_dir.join("summary.json"), &summary)?;
        Ok(summary)
    });
    match written {
        Ok(summary) => {
            println!("Outputs saved to {}", args.out_dir.display());
            println!(
                "Summary: {} records, total {} {}, {} view(s) written.\n",
                util::format_int(summary.total_records),
                util::format_number(summary.total_emissions, 2),
                summary.unit_label,
                summary.views.len()
            );
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Write error: {}\n", e);
        }
    }
}

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    loop {
        println!("Select an option:");
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        let Some(choice) = read_choice() else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&args),
            "2" => {
                println!();
                handle_generate_reports(&args);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
