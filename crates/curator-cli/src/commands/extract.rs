//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::review::review_interactive;
use crate::state::AppState;
use curator_domain::FieldCandidates;
use curator_extractor::{extract_pairs_with_strategy, PairStrategy};

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, state: &AppState) -> Result<()> {
    if args.file.is_none() && !args.stdin {
        return Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ));
    }
    let text = super::read_text(args.file.as_deref())?;
    let extraction = extract_pairs_with_strategy(&text);
    let formatter = &state.formatter;

    match extraction.strategy {
        None => {
            eprintln!("{}", formatter.warning("No Input/Result pairs found"));
            return Ok(());
        }
        Some(PairStrategy::Positional) => eprintln!(
            "{}",
            formatter.warning("Pairs were matched by position only; check them before keeping")
        ),
        Some(strategy) => eprintln!(
            "{}",
            formatter.info(&format!("Found {} pair(s) via {:?}", extraction.records.len(), strategy))
        ),
    }

    let Some(name) = args.project.filter(|_| args.review) else {
        println!(
            "{}",
            formatter.format_records(&extraction.records, &FieldCandidates::default())?
        );
        return Ok(());
    };

    let mut project = state.open(&name)?;
    let reviewed = review_interactive(extraction.records, formatter)?;
    let skipped = reviewed.skipped;
    let (train, validation) = reviewed.save(&mut project)?;
    println!("{}", formatter.ids_assigned("train", &train));
    println!("{}", formatter.ids_assigned("val", &validation));
    eprintln!("{}", formatter.info(&format!("{} candidate(s) skipped", skipped)));
    Ok(())
}
