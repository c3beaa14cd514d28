//! CLI command for the financial report

use chrono::Utc;
use std::io::{self, Write};

use crate::config::settings::Settings;
use crate::error::PocketResult;
use crate::services::ReportService;
use crate::storage::Storage;

/// Print the report, or its monthly table as CSV
pub fn handle_report_command(storage: &Storage, settings: &Settings, csv: bool) -> PocketResult<()> {
    let Some(report) = ReportService::new(storage).generate(Utc::now())? else {
        println!("No transactions yet. Add some with 'pocket tx add' to get a report.");
        return Ok(());
    };

    if csv {
        let mut stdout = io::stdout().lock();
        report.export_csv(&mut stdout)?;
        stdout.flush()?;
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}
