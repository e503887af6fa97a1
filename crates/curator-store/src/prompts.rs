//! Named system prompts kept as `<name>.txt` files

use crate::error::StoreError;
use crate::fs::{check_name, write_atomic};
use std::path::{Path, PathBuf};
use tracing::info;

const EXTENSION: &str = "txt";

/// The `system_prompts/` directory of a project
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    dir: PathBuf,
}

impl PromptLibrary {
    /// Library over `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the prompt files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        check_name(name)?;
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    /// Save (or overwrite) a prompt
    pub fn save(&self, name: &str, text: &str) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        std::fs::create_dir_all(&self.dir).map_err(StoreError::io(&self.dir))?;
        write_atomic(&path, text.as_bytes())?;
        info!(name, "System prompt saved");
        Ok(())
    }

    /// Text of a prompt
    pub fn load(&self, name: &str) -> Result<String, StoreError> {
        let path = self.path_of(name)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::PromptNotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    /// Prompt names, sorted, without the extension
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io { path: self.dir.clone(), source: e }),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(StoreError::io(&self.dir))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove a prompt
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!(name, "System prompt deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::PromptNotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }
}
