//! Stats command implementation.

use crate::cli::ProjectRef;
use crate::error::Result;
use crate::state::AppState;

/// Execute the stats command.
pub fn execute_stats(args: ProjectRef, state: &AppState) -> Result<()> {
    let project = state.open(&args.project)?;
    let stats = project.data().stats();
    println!("{}", state.formatter.format_stats(project.name(), &stats)?);
    Ok(())
}
