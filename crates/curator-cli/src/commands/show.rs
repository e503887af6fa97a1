//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::Result;
use crate::state::AppState;
use curator_domain::Split;
use curator_store::StoreError;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, state: &AppState) -> Result<()> {
    let project = state.open(&args.project.project)?;
    let split = Split::from(args.split);

    if let Some(id) = args.id {
        let record = project
            .data()
            .get(split, id)
            .ok_or(StoreError::RecordNotFound { split, id })?;
        println!("{}", state.formatter.format_record(record)?);
        return Ok(());
    }

    let records = project.data().records(split);
    let shown = &records[..args.limit.unwrap_or(records.len()).min(records.len())];
    println!(
        "{}",
        state
            .formatter
            .format_records(shown, &project.config.candidates())?
    );
    Ok(())
}
