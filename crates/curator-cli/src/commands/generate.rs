//! Generate command implementation.

use crate::cli::{GenerateArgs, GenerateMode};
use crate::error::{CliError, Result};
use crate::review::review_interactive;
use crate::state::AppState;
use curator_domain::traits::LlmProvider;
use curator_domain::{Record, Split};
use curator_extractor::Generator;
use std::fmt::Display;

/// Execute the generate command.
pub fn execute_generate(args: GenerateArgs, state: &AppState) -> Result<()> {
    let mut project = state.open(&args.project.project)?;
    let system_prompt = match (&args.prompt, &args.prompt_file) {
        (Some(name), _) => project.prompts().load(name)?,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            return Err(CliError::InvalidInput(
                "Must specify either --prompt or --prompt-file".to_string(),
            ))
        }
    };

    let generator = Generator::new(state.provider()?, state.generator_config()?);

    let records = generate_records(&generator, &args, &system_prompt)?;
    let formatter = &state.formatter;
    if records.is_empty() {
        eprintln!("{}", formatter.warning("The model produced no usable records"));
        return Ok(());
    }

    if args.review {
        let reviewed = review_interactive(records, formatter)?;
        let (train, validation) = reviewed.save(&mut project)?;
        println!("{}", formatter.ids_assigned("train", &train));
        println!("{}", formatter.ids_assigned("val", &validation));
    } else {
        let split = Split::from(args.split);
        let ids = project.data_mut().append(split, records)?;
        project.save_data()?;
        println!("{}", formatter.ids_assigned(split.as_str(), &ids));
    }
    Ok(())
}

/// Run the requested generation mode.
pub(crate) fn generate_records<L>(
    generator: &Generator<L>,
    args: &GenerateArgs,
    system_prompt: &str,
) -> Result<Vec<Record>>
where
    L: LlmProvider,
    L::Error: Display,
{
    let model = args.model.as_deref();
    match args.mode {
        GenerateMode::SelfInstruct => {
            let rounds = args.rounds.unwrap_or(generator.config().rounds);
            if rounds == 0 {
                return Err(CliError::InvalidInput("--rounds must be at least 1".into()));
            }
            Ok(generator.generate_batch(system_prompt, rounds, model))
        }
        GenerateMode::Forward => {
            let input = required_input(args)?;
            Ok(vec![generator.forward(system_prompt, input, model)?])
        }
        GenerateMode::Backward => {
            let expected = required_input(args)?;
            Ok(vec![generator.backward(system_prompt, expected, model)?])
        }
    }
}

fn required_input(args: &GenerateArgs) -> Result<&str> {
    args.input
        .as_deref()
        .ok_or_else(|| CliError::InvalidInput("--input is required for this mode".into()))
}
