//! YAML board loader.

use std::fs;
use std::path::Path;

use crate::config::types::BoardConfig;
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};

/// Loads and validates board files.
pub struct ConfigLoader {
    validator: ConfigValidator,
}

impl ConfigLoader {
    /// Creates a new board loader.
    pub fn new() -> Self {
        Self {
            validator: ConfigValidator::new(),
        }
    }

    /// Loads a board from a YAML file, setting the source_path field.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<BoardConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(path.display().to_string(), e.to_string()))?;

        let mut board = self.parse(&content, &path.display().to_string())?;
        board.source_path = Some(path.to_path_buf());
        tracing::info!(
            "Loaded board '{}' with {} buttons from {}",
            board.name,
            board.buttons.len(),
            path.display()
        );
        Ok(board)
    }

    /// Parses and validates a board from YAML text. `origin` names the source in errors.
    pub fn parse(&self, content: &str, origin: &str) -> Result<BoardConfig> {
        let board: BoardConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(origin.to_string(), e.to_string()))?;

        self.validator.validate(&board)?;
        Ok(board)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
