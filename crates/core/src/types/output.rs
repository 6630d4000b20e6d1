//! Resolved output records

use std::ops::{Deref, DerefMut};

/// One resolved line: a variable, a variable with a comment, or a bare comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    /// Empty for a pure comment line
    pub key: String,
    pub value: String,
    pub comment: String,
}

impl Output {
    /// A bare comment line
    #[must_use]
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            ..Self::default()
        }
    }

    /// A variable without a comment
    #[must_use]
    pub fn variable(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: String::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.key.is_empty()
    }
}

/// Ordered sequence of outputs; later entries shadow earlier ones with the same key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputList(Vec<Output>);

impl OutputList {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Outputs that carry a variable, in order
    pub fn variables(&self) -> impl Iterator<Item = &Output> {
        self.0.iter().filter(|out| !out.is_comment())
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Output> {
        self.0
    }
}

impl Deref for OutputList {
    type Target = Vec<Output>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for OutputList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Output>> for OutputList {
    fn from(outputs: Vec<Output>) -> Self {
        Self(outputs)
    }
}

impl FromIterator<Output> for OutputList {
    fn from_iter<I: IntoIterator<Item = Output>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for OutputList {
    type Item = Output;
    type IntoIter = std::vec::IntoIter<Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OutputList {
    type Item = &'a Output;
    type IntoIter = std::slice::Iter<'a, Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
