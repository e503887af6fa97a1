//! Command implementations.

pub mod extract;
pub mod filter;
pub mod generate;
pub mod import;
pub mod modify;
pub mod project;
pub mod prompt;
pub mod show;
pub mod stats;

pub use self::extract::execute_extract;
pub use self::filter::execute_filter;
pub use self::generate::execute_generate;
pub use self::import::execute_import;
pub use self::modify::execute_modify;
pub use self::project::execute_project;
pub use self::prompt::execute_prompt;
pub use self::show::execute_show;
pub use self::stats::execute_stats;

use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when `path` is `None`.
pub(crate) fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
