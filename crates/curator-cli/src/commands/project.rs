//! Project command implementation.

use crate::cli::{ProjectAction, ProjectArgs};
use crate::error::{CliError, Result};
use crate::state::AppState;
use curator_store::ProjectConfig;
use serde_json::Value;
use std::path::Path;

/// Execute a project management action.
pub fn execute_project(args: ProjectArgs, state: &AppState) -> Result<()> {
    let store = state.store();
    let formatter = &state.formatter;

    match args.action {
        ProjectAction::Create {
            name,
            input_schema,
            result_schema,
        } => {
            let config = ProjectConfig::new(
                read_schema(input_schema.as_deref())?,
                read_schema(result_schema.as_deref())?,
            );
            let project = store.create(&name, config)?;
            println!(
                "{}",
                formatter.success(&format!("Created project '{}' in {}", name, project.dir().display()))
            );
        }
        ProjectAction::List => {
            println!("{}", formatter.format_projects(&store.list()?)?);
        }
        ProjectAction::Show { name } => {
            let project = store.open(&name)?;
            println!("{}", formatter.format_project(&project)?);
        }
        ProjectAction::Edit {
            name,
            input_schema,
            result_schema,
        } => {
            // Both files are read before the config changes
            let input = input_schema.as_deref().map(read_schema_file).transpose()?;
            let result = result_schema.as_deref().map(read_schema_file).transpose()?;

            let mut project = store.open(&name)?;
            if let Some(schema) = input {
                project.config.input_schema = schema;
            }
            if let Some(schema) = result {
                project.config.result_schema = schema;
            }
            project.save_config()?;
            println!("{}", formatter.success(&format!("Updated schemas of '{}'", name)));
        }
        ProjectAction::Delete { name, yes } => {
            if !yes {
                return Err(CliError::NotPermitted(format!(
                    "deleting '{}' removes all its data; pass --yes to confirm",
                    name
                )));
            }
            store.delete(&name)?;
            println!("{}", formatter.success(&format!("Deleted project '{}'", name)));
        }
    }

    Ok(())
}

/// Read a JSON Schema file; no file means an empty schema.
fn read_schema(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => read_schema_file(path),
        None => Ok(Value::Object(Default::default())),
    }
}

/// Read a JSON Schema file that must hold an object.
fn read_schema_file(path: &Path) -> Result<Value> {
    let schema: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    if !schema.is_object() {
        return Err(CliError::InvalidInput(format!(
            "{} does not hold a JSON object",
            path.display()
        )));
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_schema() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_schema(None).unwrap(), serde_json::json!({}));

        let good = dir.path().join("input.json");
        std::fs::write(&good, r#"{"type": "object", "properties": {}}"#).unwrap();
        assert_eq!(read_schema(Some(&good)).unwrap()["type"], "object");

        let bad = dir.path().join("list.json");
        std::fs::write(&bad, "[1, 2]").unwrap();
        assert!(matches!(read_schema(Some(&bad)), Err(CliError::InvalidInput(_))));
    }
}
