use std::fmt;

use serde::{Deserialize, Serialize};

/// The steps of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStage {
    File,
    Load,
    Metadata,
    Data,
}

impl FixStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixStage::File => "file",
            FixStage::Load => "load",
            FixStage::Metadata => "metadata",
            FixStage::Data => "data",
        }
    }
}

impl fmt::Display for FixStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
