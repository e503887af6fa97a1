//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::{CliError, Result};
use crate::state::AppState;
use curator_domain::{Record, Split};
use serde_json::Value;

/// Execute the import command.
pub fn execute_import(args: ImportArgs, state: &AppState) -> Result<()> {
    let records = parse_records(&std::fs::read_to_string(&args.file)?)?;
    let mut project = state.open(&args.project.project)?;
    let split = Split::from(args.split);

    let ids = project.data_mut().import(split, records)?;
    project.save_data()?;
    println!("{}", state.formatter.ids_assigned(split.as_str(), &ids));
    Ok(())
}

/// Parse a JSON array of `{Input, Result}` records, rejecting the whole
/// batch if any entry is malformed.
pub(crate) fn parse_records(text: &str) -> Result<Vec<Record>> {
    let Value::Array(items) = serde_json::from_str::<Value>(text)? else {
        return Err(CliError::InvalidInput("expected a JSON array of records".into()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Record::try_from_value(item)
                .map_err(|e| CliError::InvalidInput(format!("entry {}: {}", index, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let records = parse_records(r#"[{"Input": {"q": 1}, "Result": {"id": 99}}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some(99));
    }

    #[test]
    fn test_parse_records_rejects_bad_entries() {
        let err = parse_records(r#"[{"Input": {}, "Result": {}}, {"Input": []}]"#).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
        assert!(matches!(parse_records("{}"), Err(CliError::InvalidInput(_))));
        assert!(matches!(parse_records("nope"), Err(CliError::Serialization(_))));
    }
}
