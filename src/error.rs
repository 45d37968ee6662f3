use std::path::PathBuf;

use thiserror::Error;

use crate::identity::FixIdentity;
use crate::pipeline::stage::FixStage;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Missing required attribute: {attribute}")]
    MissingAttribute { attribute: String },

    #[error("Missing coordinate: {coord}")]
    MissingCoord { coord: String },

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    #[error("Dimension not found: {0}")]
    DimensionNotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Fix contract violated: {0}")]
    ContractViolation(String),

    #[error("{stage} stage of {fix} failed for {identity}: {source}")]
    Stage {
        identity: FixIdentity,
        stage: FixStage,
        fix: &'static str,
        #[source]
        source: Box<FixError>,
    },
}

impl FixError {
    /// Wrap an error raised by a fix so callers see which identity and stage broke.
    pub fn in_stage(self, identity: &FixIdentity, stage: FixStage, fix: &'static str) -> Self {
        FixError::Stage {
            identity: identity.clone(),
            stage,
            fix,
            source: Box::new(self),
        }
    }

    /// The stage that failed, if this error came out of a fix stage.
    pub fn stage(&self) -> Option<FixStage> {
        match self {
            FixError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixError>;
