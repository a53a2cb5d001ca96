//! Board validation.

use std::collections::HashSet;

use crate::config::types::{single_char, BoardConfig, ButtonConfig};
use crate::error::{Error, Result};

/// Validator for board configurations.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Creates a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a board configuration.
    pub fn validate(&self, board: &BoardConfig) -> Result<()> {
        self.validate_name(board)?;

        if board.buttons.is_empty() {
            return Err(Error::ConfigValidation(
                "buttons".to_string(),
                "Board must define at least one button".to_string(),
            ));
        }

        let mut labels = HashSet::new();
        let mut keys = HashSet::new();

        if let Some(ref stop_key) = board.stop_key {
            let key = self.validate_key("stop_key", stop_key)?;
            keys.insert(key);
        }

        for (index, button) in board.buttons.iter().enumerate() {
            self.validate_button(index, button, &board.extension)?;

            let label = button.label.trim().to_lowercase();
            if !labels.insert(label) {
                return Err(Error::ConfigValidation(
                    format!("buttons[{}].label", index),
                    format!("Duplicate label '{}'", button.label.trim()),
                ));
            }

            if let Some(ref key) = button.key {
                let field = format!("buttons[{}].key", index);
                let key = self.validate_key(&field, key)?;
                if !keys.insert(key) {
                    return Err(Error::ConfigValidation(
                        field,
                        format!("Key '{}' is already bound", key),
                    ));
                }
            }
        }

        Ok(())
    }

    fn validate_name(&self, board: &BoardConfig) -> Result<()> {
        if board.name.trim().is_empty() {
            return Err(Error::ConfigValidation(
                "name".to_string(),
                "Name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_button(&self, index: usize, button: &ButtonConfig, extension: &str) -> Result<()> {
        if button.label.trim().is_empty() {
            return Err(Error::ConfigValidation(
                format!("buttons[{}].label", index),
                "Label cannot be empty".to_string(),
            ));
        }

        if button.sound_id(extension).is_err() {
            return Err(Error::ConfigValidation(
                format!("buttons[{}].label", index),
                format!(
                    "Label '{}' has no characters usable in a file name; add a 'file' override",
                    button.label
                ),
            ));
        }

        Ok(())
    }

    fn validate_key(&self, field: &str, key: &str) -> Result<char> {
        single_char(key).ok_or_else(|| {
            Error::ConfigValidation(
                field.to_string(),
                format!("Invalid key '{}'. Must be exactly one character", key),
            )
        })
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn button(label: &str, key: Option<&str>) -> ButtonConfig {
        ButtonConfig {
            label: label.to_string(),
            file: None,
            key: key.map(str::to_string),
        }
    }

    fn minimal_board() -> BoardConfig {
        BoardConfig {
            name: "Test".to_string(),
            sounds_dir: PathBuf::from("sounds"),
            extension: "mp3".to_string(),
            stop_key: None,
            buttons: vec![button("Applause", Some("a"))],
            source_path: None,
        }
    }

    #[test]
    fn test_validate_minimal_board() {
        assert!(ConfigValidator::new().validate(&minimal_board()).is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let mut board = minimal_board();
        board.name = "  ".to_string();
        assert!(ConfigValidator::new().validate(&board).is_err());
    }

    #[test]
    fn test_validate_unusable_label_without_override() {
        let mut board = minimal_board();
        board.buttons.push(button("???", None));
        assert!(ConfigValidator::new().validate(&board).is_err());

        board.buttons[1].file = Some("question.mp3".to_string());
        assert!(ConfigValidator::new().validate(&board).is_ok());
    }

    #[test]
    fn test_validate_duplicate_key() {
        let mut board = minimal_board();
        board.buttons.push(button("Boo", Some("A")));
        let result = ConfigValidator::new().validate(&board);
        assert!(matches!(result, Err(Error::ConfigValidation(field, _)) if field == "buttons[1].key"));
    }

    #[test]
    fn test_validate_stop_key_clash() {
        let mut board = minimal_board();
        board.stop_key = Some("a".to_string());
        assert!(ConfigValidator::new().validate(&board).is_err());
    }

    #[test]
    fn test_validate_multi_char_key() {
        let mut board = minimal_board();
        board.buttons[0].key = Some("ctrl+a".to_string());
        assert!(ConfigValidator::new().validate(&board).is_err());
    }

    #[test]
    fn test_validate_duplicate_label() {
        let mut board = minimal_board();
        board.buttons.push(button(" applause ", None));
        assert!(ConfigValidator::new().validate(&board).is_err());
    }
}
