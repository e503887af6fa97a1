//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use curator_domain::{FieldCandidates, Record};
use curator_store::{DatasetStats, Project};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const SUMMARY_WIDTH: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of records.
    pub fn format_records(&self, records: &[Record], candidates: &FieldCandidates) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => Ok(self.format_records_table(records, candidates)),
            OutputFormat::Quiet => Ok(format_records_quiet(records)),
        }
    }

    /// Format a single record as indented JSON.
    pub fn format_record(&self, record: &Record) -> Result<String> {
        Ok(serde_json::to_string_pretty(record)?)
    }

    fn format_records_table(&self, records: &[Record], candidates: &FieldCandidates) -> String {
        if records.is_empty() {
            return self.colorize("No records found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Summary"]);

        for record in records {
            let id = record.id().map(|id| id.to_string()).unwrap_or_else(|| "-".into());
            builder.push_record([id, truncate(&record.summary(candidates), SUMMARY_WIDTH)]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format project names.
    pub fn format_projects(&self, names: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(names)?),
            OutputFormat::Quiet => Ok(names.join("\n")),
            OutputFormat::Table if names.is_empty() => Ok(self.colorize("No projects found.", "yellow")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Project"]);
                for name in names {
                    builder.push_record([name.as_str()]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format per-split record counts.
    pub fn format_stats(&self, project: &str, stats: &DatasetStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "project": project,
                "train": stats.train,
                "validation": stats.validation,
                "total": stats.total(),
            }))?),
            OutputFormat::Quiet => Ok(format!("{}\n{}", stats.train, stats.validation)),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Split", "Records"]);
                builder.push_record(["train".to_string(), stats.train.to_string()]);
                builder.push_record(["val".to_string(), stats.validation.to_string()]);
                builder.push_record(["total".to_string(), stats.total().to_string()]);
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(format!("{}\n{}", self.colorize(project, "cyan"), table))
            }
        }
    }

    /// Format a project's configuration and counts.
    pub fn format_project(&self, project: &Project) -> Result<String> {
        let stats = project.data().stats();
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "name": project.name(),
                "dir": project.dir(),
                "config": project.config,
                "train": stats.train,
                "validation": stats.validation,
            }))?),
            OutputFormat::Quiet => Ok(project.name().to_string()),
            OutputFormat::Table => Ok(format!(
                "{}\n{}\nInput schema:\n{}\nResult schema:\n{}",
                self.format_stats(project.name(), &stats)?,
                project.dir().display(),
                serde_json::to_string_pretty(&project.config.input_schema)?,
                serde_json::to_string_pretty(&project.config.result_schema)?,
            )),
        }
    }

    /// Format assigned ids after an import or save.
    pub fn ids_assigned(&self, split: &str, ids: &[i64]) -> String {
        match (self.format, ids.first(), ids.last()) {
            (OutputFormat::Quiet, _, _) => ids.iter().map(i64::to_string).collect::<Vec<_>>().join("\n"),
            (_, Some(first), Some(last)) => {
                self.success(&format!("Added {} record(s) to {} (ids {}-{})", ids.len(), split, first, last))
            }
            _ => self.warning("No records added"),
        }
    }

    /// Format a progress line.
    pub fn progress(&self, message: &str, fraction: f64) -> String {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;
        format!("{} {}", self.colorize(&format!("[{:>3}%]", percent), "cyan"), message)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn format_records_quiet(records: &[Record]) -> String {
    records
        .iter()
        .filter_map(Record::id)
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
