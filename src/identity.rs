use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_]").expect("static separator pattern is valid")
});

/// Map a model name onto the form catalog entries are indexed by.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, so `BNU-ESM` and
/// `BNU_ESM` name the same entry.
pub fn normalize_model_name(model: &str) -> String {
    NON_IDENTIFIER.replace_all(model.trim(), "_").into_owned()
}

/// The (project, model, variable) triple a fix chain is resolved for.
///
/// `model` keeps the caller's spelling for messages; lookups go through
/// [`FixIdentity::normalized_model`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixIdentity {
    project: String,
    model: String,
    variable: String,
}

impl FixIdentity {
    pub fn new(
        project: impl Into<String>,
        model: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            model: model.into(),
            variable: variable.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// The model name exactly as the caller supplied it.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn normalized_model(&self) -> String {
        normalize_model_name(&self.model)
    }
}

impl fmt::Display for FixIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.model, self.variable)
    }
}
