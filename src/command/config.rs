use serde::{Deserialize, Serialize};

use super::names::EnumTables;
use crate::error::DecodeError;

/// Settings for the slab command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandConfig {
    /// Name of the undoable transaction wrapping a batch.
    pub transaction_name: String,
    pub tables: EnumTables,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            transaction_name: "Create slabs".to_owned(),
            tables: EnumTables::default(),
        }
    }
}

impl CommandConfig {
    /// Parses a JSON config; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidConfig`] if `text` is not a valid config.
    pub fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(text).map_err(DecodeError::InvalidConfig)
    }
}
