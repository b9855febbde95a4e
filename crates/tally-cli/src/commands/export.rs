//! CSV export command

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::models::ExpenseCategory;
use tally_core::period::parse_date;
use tally_core::ExpenseExportOptions;

use super::parse_arg;

pub fn cmd_export_expenses(
    db: &Database,
    owner: i64,
    output: Option<PathBuf>,
    from: Option<String>,
    to: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let opts = ExpenseExportOptions {
        from: from
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid --from date")?,
        to: to
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid --to date")?,
        category: parse_arg::<ExpenseCategory>(category.as_deref(), "category")?,
    };

    let csv = db.export_expenses_csv(owner, &opts)?;

    match output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(csv.as_bytes())?;

            let lines = csv.lines().count().saturating_sub(1);
            println!("✅ Exported {} expenses to {}", lines, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
