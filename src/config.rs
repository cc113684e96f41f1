//! Configuration management for `message-filter`.
//!
//! This module defines the core data structures for substitution rules and
//! handles deserialization of the operator-supplied `filterList` setting
//! value, a JSON array of rule objects.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::FilterError;

/// Setting id under which the host stores the rule list.
pub const FILTER_LIST_SETTING_ID: &str = "filterList";

/// Default flags applied when a rule omits the `flags` field.
pub const DEFAULT_FLAGS: &str = "gi";

/// Represents a single substitution rule applied to outbound message bodies.
///
/// Every field is optional in the source JSON; absent fields resolve to
/// documented defaults when the rule is compiled, never causing the rule to
/// be rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SubstitutionRule {
    /// The pattern string, extended-regex syntax. Absent means the empty
    /// pattern, which matches everywhere and rewrites nothing visible.
    pub regex: Option<String>,
    /// JavaScript-style flag letters (`g`, `i`, `m`, `s`). Absent means
    /// [`DEFAULT_FLAGS`].
    pub flags: Option<String>,
    /// Replacement text; `$n` / `${n}` expand to capture groups. Absent
    /// means the empty string, i.e. deletion of every match.
    pub replacement: Option<String>,
}

/// The ordered rule list decoded from one `filterList` setting value.
///
/// Order is significant: rules are applied to a message body in exactly the
/// order they appear in the source JSON array, each rule's output feeding
/// the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterConfig {
    pub rules: Vec<SubstitutionRule>,
}

impl FilterConfig {
    /// Decodes a raw setting value into an ordered rule list.
    ///
    /// Fail-closed at the top level: malformed JSON or a non-array yields
    /// [`FilterError::InvalidFormat`] and the caller must leave its active
    /// configuration untouched. Individual elements are absorbed, not
    /// rejected: a junk element (`null`, a scalar, an object with wrongly
    /// typed fields) degrades to the all-defaults rule, which is a no-op,
    /// and the rules around it keep their positions.
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        let elements: Vec<serde_json::Value> = serde_json::from_str(text)?;
        let rules = elements
            .into_iter()
            .map(|element| {
                serde_json::from_value(element).unwrap_or_else(|e| {
                    debug!("Absorbing malformed rule element: {}", e);
                    SubstitutionRule::default()
                })
            })
            .collect::<Vec<SubstitutionRule>>();
        debug!("Parsed filter list with {} rule(s).", rules.len());
        Ok(Self { rules })
    }
}

/// The packaged default value for the `filterList` setting: one example rule
/// that normalizes the product name, in the same encoding `parse` expects.
pub fn default_filter_list() -> &'static str {
    "[\n  {\n    \"regex\": \"rocketchat\",\n    \"flags\": \"gi\",\n    \"replacement\": \"Rocket.Chat\"\n  }\n]"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_rule_order() {
        let text = r#"[{"regex":"a"},{"regex":"b"},{"regex":"c"}]"#;
        let config = FilterConfig::parse(text).unwrap();
        let patterns: Vec<_> = config
            .rules
            .iter()
            .map(|r| r.regex.as_deref().unwrap())
            .collect();
        assert_eq!(patterns, vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_defaults_absent_fields_to_none() {
        let config = FilterConfig::parse(r#"[{}]"#).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0], SubstitutionRule::default());
    }

    #[test]
    fn parse_absorbs_unknown_fields() {
        let config =
            FilterConfig::parse(r#"[{"regex":"x","comment":"legacy field"}]"#).unwrap();
        assert_eq!(config.rules[0].regex.as_deref(), Some("x"));
    }

    #[test]
    fn parse_absorbs_non_object_elements() {
        let config =
            FilterConfig::parse(r#"[{"regex":"a"}, null, 7, "junk", {"regex":"b"}]"#).unwrap();
        assert_eq!(config.rules.len(), 5);
        assert_eq!(config.rules[0].regex.as_deref(), Some("a"));
        assert_eq!(config.rules[1], SubstitutionRule::default());
        assert_eq!(config.rules[2], SubstitutionRule::default());
        assert_eq!(config.rules[3], SubstitutionRule::default());
        assert_eq!(config.rules[4].regex.as_deref(), Some("b"));
    }

    #[test]
    fn parse_absorbs_wrongly_typed_fields() {
        let config = FilterConfig::parse(r#"[{"regex":123,"flags":false}]"#).unwrap();
        assert_eq!(config.rules[0], SubstitutionRule::default());
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(matches!(
            FilterConfig::parse("not json"),
            Err(FilterError::InvalidFormat(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_top_level_shape() {
        assert!(matches!(
            FilterConfig::parse(r#"{"regex":"a"}"#),
            Err(FilterError::InvalidFormat(_))
        ));
    }

    #[test]
    fn packaged_default_is_parseable() {
        let config = FilterConfig::parse(default_filter_list()).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].regex.as_deref(), Some("rocketchat"));
        assert_eq!(config.rules[0].flags.as_deref(), Some("gi"));
        assert_eq!(config.rules[0].replacement.as_deref(), Some("Rocket.Chat"));
    }
}
