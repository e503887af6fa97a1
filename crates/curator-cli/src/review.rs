//! Interactive review of candidate records.
//!
//! Each candidate is printed and the user picks where it goes. Accepted
//! records are only collected here; the caller saves them in one go.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_domain::{Record, Split};
use curator_store::Project;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;

/// What to do with one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Add to the training split
    Train,
    /// Add to the validation split
    Validation,
    /// Drop this candidate
    Skip,
    /// Drop this and every remaining candidate
    Quit,
}

/// Parse a reply to the review prompt.
pub fn parse_choice(line: &str) -> Option<Choice> {
    match line.trim().to_lowercase().as_str() {
        "t" | "train" => Some(Choice::Train),
        "v" | "val" | "validation" => Some(Choice::Validation),
        "s" | "skip" | "" => Some(Choice::Skip),
        "q" | "quit" => Some(Choice::Quit),
        _ => None,
    }
}

/// Somewhere review answers come from.
pub trait LineSource {
    /// Read one line; `None` when input is closed or interrupted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(CliError::Readline(err)),
        }
    }
}

/// Candidates sorted by the user's choices.
#[derive(Debug, Default, PartialEq)]
pub struct Reviewed {
    /// Accepted for training
    pub train: Vec<Record>,
    /// Accepted for validation
    pub validation: Vec<Record>,
    /// Skipped, including everything left after a quit
    pub skipped: usize,
}

impl Reviewed {
    /// Whether nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.validation.is_empty()
    }

    /// Append the accepted records and save the project once.
    ///
    /// Returns the ids assigned in each split.
    pub fn save(self, project: &mut Project) -> Result<(Vec<i64>, Vec<i64>)> {
        if self.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let data = project.data_mut();
        let train = data.append(Split::Train, self.train)?;
        let validation = data.append(Split::Validation, self.validation)?;
        project.save_data()?;
        Ok((train, validation))
    }
}

/// Walk through `candidates`, asking for a choice on each.
pub fn review<S: LineSource>(
    candidates: Vec<Record>,
    source: &mut S,
    formatter: &Formatter,
    out: &mut dyn Write,
) -> Result<Reviewed> {
    let total = candidates.len();
    let mut reviewed = Reviewed::default();
    let mut pending = candidates.into_iter().enumerate();

    while let Some((index, record)) = pending.next() {
        writeln!(out, "{}", formatter.info(&format!("Candidate {}/{}", index + 1, total)))?;
        writeln!(out, "{}", formatter.format_record(&record)?)?;

        let choice = loop {
            let Some(line) = source.read_line("[t]rain / [v]al / [s]kip / [q]uit > ")? else {
                break Choice::Quit;
            };
            match parse_choice(&line) {
                Some(choice) => break choice,
                None => writeln!(out, "{}", formatter.warning("Please answer t, v, s or q"))?,
            }
        };

        match choice {
            Choice::Train => reviewed.train.push(record),
            Choice::Validation => reviewed.validation.push(record),
            Choice::Skip => reviewed.skipped += 1,
            Choice::Quit => {
                reviewed.skipped += 1 + pending.len();
                break;
            }
        }
    }

    Ok(reviewed)
}

/// Review on the terminal with a line editor.
pub fn review_interactive(candidates: Vec<Record>, formatter: &Formatter) -> Result<Reviewed> {
    let mut editor = DefaultEditor::new()?;
    review(candidates, &mut editor, formatter, &mut std::io::stdout())
}
