//! Label normalization applied to entities before grouping.
//!
//! Rules are configured per label. For every entity carrying the label, the
//! replacements run in order, then an empty value is swapped for the
//! rule's default.

use serde::{Deserialize, Serialize};

use crate::model::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    pub label: String,
    #[serde(default)]
    pub replace: Vec<Replacement>,
    /// Value used when the label is present but empty.
    #[serde(default)]
    pub default_if_empty: Option<String>,
}

impl LabelRule {
    fn apply(&self, value: &str) -> String {
        let mut out = self
            .replace
            .iter()
            .filter(|r| !r.from.is_empty())
            .fold(value.to_string(), |acc, r| acc.replace(&r.from, &r.to));
        if out.is_empty()
            && let Some(default) = &self.default_if_empty
        {
            out.clone_from(default);
        }
        out
    }
}

/// Applies `rules` to every entity in place. Returns the number of label
/// values that changed.
pub fn normalize_entities(entities: &mut [Entity], rules: &[LabelRule]) -> usize {
    let mut changed = 0;
    for entity in entities.iter_mut() {
        for rule in rules {
            let Some(value) = entity.labels.get_mut(&rule.label) else {
                continue;
            };
            let normalized = rule.apply(value);
            if normalized != *value {
                tracing::debug!(
                    entity = %entity.name,
                    label = %rule.label,
                    from = %value,
                    to = %normalized,
                    "Normalized label value"
                );
                *value = normalized;
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORT: &str = "kubernetes.namespace.label.SupportGroup";

    fn entity(value: Option<&str>) -> Entity {
        let mut e = Entity::default();
        if let Some(v) = value {
            e.labels.insert(SUPPORT.to_string(), v.to_string());
        }
        e
    }

    fn support_rule() -> LabelRule {
        LabelRule {
            label: SUPPORT.to_string(),
            replace: vec![
                Replacement {
                    from: "_".into(),
                    to: " ".into(),
                },
                Replacement {
                    from: "API SUPPORT".into(),
                    to: "API Support".into(),
                },
            ],
            default_if_empty: Some("KubeOperations".into()),
        }
    }

    #[test]
    fn test_replacements_in_order() {
        let mut entities = vec![entity(Some("PAYMENTS_API_SUPPORT"))];
        let changed = normalize_entities(&mut entities, &[support_rule()]);
        assert_eq!(changed, 1);
        assert_eq!(entities[0].label(SUPPORT), "PAYMENTS API Support");
    }

    #[test]
    fn test_default_for_empty_value_only() {
        let mut entities = vec![entity(Some("")), entity(None)];
        normalize_entities(&mut entities, &[support_rule()]);
        assert_eq!(entities[0].label(SUPPORT), "KubeOperations");
        // Absent labels are not created.
        assert!(!entities[1].labels.contains_key(SUPPORT));
    }

    #[test]
    fn test_unchanged_values_are_not_counted() {
        let mut entities = vec![entity(Some("Billing"))];
        assert_eq!(normalize_entities(&mut entities, &[support_rule()]), 0);
        assert_eq!(normalize_entities(&mut entities, &[]), 0);
    }

    #[test]
    fn test_rule_deserializes_with_defaults() {
        let rule: LabelRule =
            serde_json::from_str(r#"{"label": "x", "replace": [{"from": "-", "to": "_"}]}"#)
                .unwrap();
        assert_eq!(rule.apply("a-b"), "a_b");
        assert_eq!(rule.default_if_empty, None);
    }
}
