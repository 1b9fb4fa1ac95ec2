//! Typed validation findings.

use std::fmt;

use serde::Serialize;

/// What kind of rule a finding violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// A required element or reference is absent.
    MissingElement,
    /// Two exclusive alternatives are both present or both absent.
    MutualExclusion,
    /// Text does not evaluate, or evaluates outside its domain.
    InvalidExpression,
    /// A name, id or VLNV does not resolve.
    UnresolvedReference,
    /// Related values violate a joint rule.
    Inconsistency,
    /// The element is not allowed in the document revision.
    RevisionMismatch,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::MissingElement,
        Category::MutualExclusion,
        Category::InvalidExpression,
        Category::UnresolvedReference,
        Category::Inconsistency,
        Category::RevisionMismatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::MissingElement => "missing-element",
            Category::MutualExclusion => "mutual-exclusion",
            Category::InvalidExpression => "invalid-expression",
            Category::UnresolvedReference => "unresolved-reference",
            Category::Inconsistency => "inconsistency",
            Category::RevisionMismatch => "revision-mismatch",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::MissingElement => write!(f, "MISSING"),
            Category::MutualExclusion => write!(f, "EXCLUSIVE"),
            Category::InvalidExpression => write!(f, "EXPRESSION"),
            Category::UnresolvedReference => write!(f, "REFERENCE"),
            Category::Inconsistency => write!(f, "CONSISTENCY"),
            Category::RevisionMismatch => write!(f, "REVISION"),
        }
    }
}

/// One problem found by a validator, self-contained enough to locate the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: Category,
    pub message: String,
}

impl Finding {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Append `finding` unless an identical one is already listed.
pub(crate) fn push_unique(errors: &mut Vec<Finding>, finding: Finding) {
    if !errors.contains(&finding) {
        errors.push(finding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let finding = Finding::new(
            Category::MissingElement,
            "Port p has neither wire nor transactional defined.",
        );
        assert_eq!(
            finding.to_string(),
            "[MISSING] Port p has neither wire nor transactional defined."
        );
    }

    #[test]
    fn push_unique_skips_repeats() {
        let mut errors = Vec::new();
        push_unique(&mut errors, Finding::new(Category::Inconsistency, "a"));
        push_unique(&mut errors, Finding::new(Category::Inconsistency, "a"));
        push_unique(&mut errors, Finding::new(Category::RevisionMismatch, "a"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::UnresolvedReference).unwrap();
        assert_eq!(json, "\"unresolved-reference\"");
    }
}
