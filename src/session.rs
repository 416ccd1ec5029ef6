//! Per-session bookkeeping of screenshots already taken.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

/// What makes a screenshot unique within one test session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotIdentity {
    pub project: String,
    pub category: String,
    pub name: String,
    pub browser: String,
}

impl ScreenshotIdentity {
    pub fn new(
        project: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        browser: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            category: category.into(),
            name: name.into(),
            browser: browser.into(),
        }
    }
}

impl fmt::Display for ScreenshotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\\{}\\{} ({})",
            self.project, self.category, self.name, self.browser
        )
    }
}

#[derive(Debug, Default)]
pub struct ScreenshotSession {
    taken: HashSet<ScreenshotIdentity>,
}

impl ScreenshotSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a screenshot. Taking the same identity twice is an error and
    /// leaves the session unchanged.
    pub fn register(&mut self, identity: ScreenshotIdentity) -> Result<()> {
        if self.taken.contains(&identity) {
            return Err(CompareError::DuplicateScreenshot(identity.to_string()));
        }
        tracing::trace!(screenshot = %identity, "screenshot registered in session");
        self.taken.insert(identity);
        Ok(())
    }

    pub fn contains(&self, identity: &ScreenshotIdentity) -> bool {
        self.taken.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
