//! Library → ordered guideline strings

use crate::taxonomy::LibraryId;
use std::borrow::Cow;
use std::collections::HashMap;

/// Rule catalog keyed by library
///
/// Rules are stored verbatim; `{{placeholder}}` tokens are left for the reader to fill in.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: HashMap<LibraryId, Vec<String>>,
}

impl RuleCatalog {
    pub fn new(rules: HashMap<LibraryId, Vec<String>>) -> Self {
        Self { rules }
    }

    /// Declared rules for a library, or an empty slice if it has none
    pub fn rules_of(&self, library: &LibraryId) -> &[String] {
        self.rules
            .get(library)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Declared rules, or the single generated default rule when the library is undocumented
    pub fn rules_or_default(&self, library: &LibraryId) -> Cow<'_, [String]> {
        let rules = self.rules_of(library);
        if rules.is_empty() {
            tracing::debug!(%library, "no rules declared, using default rule");
            Cow::Owned(vec![default_rule(library)])
        } else {
            Cow::Borrowed(rules)
        }
    }

    pub fn contains(&self, library: &LibraryId) -> bool {
        !self.rules_of(library).is_empty()
    }

    /// Number of libraries with at least one rule
    pub fn len(&self) -> usize {
        self.rules.values().filter(|r| !r.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of rule strings across all libraries
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Documented libraries, sorted by id
    pub fn libraries(&self) -> Vec<&LibraryId> {
        let mut libraries: Vec<&LibraryId> = self
            .rules
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(library, _)| library)
            .collect();
        libraries.sort();
        libraries
    }
}

/// Fallback rule for a library without catalog entries
pub fn default_rule(library: &LibraryId) -> String {
    format!("Use {} according to best practices", library)
}

/// Extract `{{identifier}}` placeholder names from a rule, in order of appearance
pub fn placeholders(rule: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = rule;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            found.push(name);
        }
        rest = &after[end + 2..];
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RuleCatalog {
        let mut rules = HashMap::new();
        rules.insert(
            LibraryId::from("REACT_CODING_STANDARDS"),
            vec![
                "Use functional components with hooks".to_string(),
                "Implement {{data_fetching}} consistently".to_string(),
            ],
        );
        rules.insert(LibraryId::from("EMPTY"), Vec::new());
        RuleCatalog::new(rules)
    }

    #[test]
    fn test_rules_of_preserves_order() {
        let c = catalog();
        let rules = c.rules_of(&"REACT_CODING_STANDARDS".into());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], "Use functional components with hooks");
        assert!(rules[1].contains("{{data_fetching}}"));
    }

    #[test]
    fn test_rules_of_unknown_library_is_empty() {
        let c = catalog();
        assert!(c.rules_of(&"NEW_LIB".into()).is_empty());
    }

    #[test]
    fn test_rules_or_default_falls_back() {
        let c = catalog();
        let rules = c.rules_or_default(&"NEW_LIB".into());
        assert_eq!(
            rules.as_ref(),
            &["Use NEW_LIB according to best practices".to_string()]
        );

        // An explicit but empty entry is treated the same as a missing one
        let rules = c.rules_or_default(&"EMPTY".into());
        assert_eq!(rules[0], "Use EMPTY according to best practices");
    }

    #[test]
    fn test_counts_ignore_empty_entries() {
        let c = catalog();
        assert_eq!(c.len(), 1);
        assert_eq!(c.rule_count(), 2);
        assert!(c.contains(&"REACT_CODING_STANDARDS".into()));
        assert!(!c.contains(&"EMPTY".into()));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("Use {{store}} for {{ state_shape }} in {{store}}"),
            vec!["store", "state_shape", "store"]
        );
        assert!(placeholders("No tokens here").is_empty());
        assert!(placeholders("Unclosed {{token").is_empty());
        assert!(placeholders("Not an identifier {{a b}}").is_empty());
    }
}
