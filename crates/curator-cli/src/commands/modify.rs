//! Modify command implementation.

use crate::cli::ModifyArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::state::AppState;
use curator_domain::{Changes, Split};

/// Execute the modify command.
///
/// The project is saved only when every assignment applies.
pub fn execute_modify(args: ModifyArgs, state: &AppState) -> Result<()> {
    let changes = Changes::from_assignments(&args.set)?;
    let mut project = state.open(&args.project.project)?;
    let split = Split::from(args.split);

    let updated = project.data_mut().modify(split, args.id, &changes)?.clone();
    project.save_data()?;

    let formatter = &state.formatter;
    if formatter.format() != OutputFormat::Quiet {
        println!("{}", formatter.format_record(&updated)?);
    }
    eprintln!(
        "{}",
        formatter.success(&format!("Applied {} change(s) to {} record {}", changes.len(), split, args.id))
    );
    Ok(())
}
