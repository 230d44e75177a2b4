use std::collections::BTreeSet;

/// Zones that always survive pruning, whatever the operator configures.
pub const PROTECTED_ZONES: [&str; 2] = ["Entire Infrastructure", "Entire Git"];

/// Names exempt from prune-candidate reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionSet {
    names: BTreeSet<String>,
}

impl RetentionSet {
    /// The protected zones plus `extra`. Blank names are ignored.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = PROTECTED_ZONES
            .iter()
            .map(|s| (*s).to_string())
            .chain(extra.into_iter().map(Into::into))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { names }
    }

    /// Parses a comma-separated list such as `STATIC_ZONES`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RetentionSet {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_contains_protected() {
        let set = RetentionSet::default();
        assert_eq!(set.len(), 2);
        for name in PROTECTED_ZONES {
            assert!(set.contains(name));
        }
    }

    #[test]
    fn test_parse_operator_list() {
        let set = RetentionSet::parse("Legacy, Shared ,,Entire Git");
        assert!(set.contains("Legacy"));
        assert!(set.contains("Shared"));
        assert!(set.contains("Entire Infrastructure"));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(RetentionSet::parse(""), RetentionSet::default());
    }
}
