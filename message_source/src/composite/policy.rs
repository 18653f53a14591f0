//! What the resolver answers for codes no provider knows.

use serde::{Deserialize, Serialize};

/// What a query returns when no provider knows the code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingMessagePolicy {
    /// Return an empty string.
    #[default]
    Empty,
    /// Return the requested code unchanged.
    Code,
}

impl MissingMessagePolicy {
    /// Renders the fallback text for `code`.
    #[must_use]
    pub fn render(self, code: &str) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Code => code.to_owned(),
        }
    }
}
