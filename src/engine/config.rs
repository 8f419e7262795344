use serde::{Deserialize, Serialize};

use crate::utils::limits::MAX_INPUT_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest input `compress_with` accepts, in bytes.
    pub max_input_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_size: MAX_INPUT_SIZE,
        }
    }
}
