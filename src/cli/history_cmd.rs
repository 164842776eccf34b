//! Show or clear the recorded request history.

use anyhow::{Context, Result};

use crate::cli::HistoryArgs;
use crate::config::ProbeConfig;
use crate::storage;
use crate::ui::console::Console;

pub fn run(config: &ProbeConfig, args: &HistoryArgs) -> Result<()> {
    let path = config.history_db_path();
    let mut console = Console::stdout(config.color);

    if !path.exists() {
        console.line("No recorded requests.")?;
        console.line("Run with --record to keep a history of requests.")?;
        return Ok(());
    }

    let conn = storage::open_db(&path)
        .with_context(|| format!("Failed to open history database `{}`", path.display()))?;

    if args.clear {
        let removed = storage::clear_history(&conn)?;
        console.line(&format!("Removed {removed} recorded requests."))?;
        return Ok(());
    }

    let entries = storage::load_history(&conn, args.limit)?;
    console.print_history(&entries)?;
    Ok(())
}
