//! Prompt command implementation.

use crate::cli::{PromptAction, PromptArgs};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::state::AppState;
use curator_extractor::PromptBuilder;

/// Execute a prompt management action.
pub fn execute_prompt(args: PromptArgs, state: &AppState) -> Result<()> {
    let project = state.open(&args.project.project)?;
    let library = project.prompts();
    let formatter = &state.formatter;

    match args.action {
        PromptAction::Save { name, file } => {
            let text = super::read_text(file.as_deref())?;
            library.save(&name, &text)?;
            println!("{}", formatter.success(&format!("Saved prompt '{}'", name)));
        }
        PromptAction::List => {
            let names = library.list()?;
            match formatter.format() {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
                _ if names.is_empty() => println!("{}", formatter.warning("No prompts saved")),
                _ => println!("{}", names.join("\n")),
            }
        }
        PromptAction::Show { name } => {
            println!("{}", library.load(&name)?);
        }
        PromptAction::Delete { name } => {
            library.delete(&name)?;
            println!("{}", formatter.success(&format!("Deleted prompt '{}'", name)));
        }
        PromptAction::Scaffold { name, count } => {
            let count = match count {
                Some(count) => count,
                None => state.generator_config()?.pairs_per_prompt,
            };
            let text = PromptBuilder::self_instruct(
                &project.config.input_schema,
                &project.config.result_schema,
                count,
            );
            library.save(&name, &text)?;
            println!("{}", formatter.success(&format!("Saved self-instruct prompt '{}'", name)));
        }
    }

    Ok(())
}
