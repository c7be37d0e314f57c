//! Comparison policy flags and run configuration.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Independent facets that parameterize a comparison.
    ///
    /// `ALL` is the baseline; an empty set behaves the same way. Serialized in
    /// human-readable formats as `"ALL | INCLUDE_LIST"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ComparisonPolicy: u32 {
        /// Compare every member with default collection semantics.
        const ALL = 1 << 0;
        /// Supplied paths are the only members compared.
        const INCLUDE_LIST = 1 << 1;
        /// Sequential collections are matched as multisets.
        const ALLOW_COLLECTIONS_TO_BE_OUT_OF_ORDER = 1 << 2;
        /// An empty collection equals an absent one.
        const TREAT_EMPTY_LIST_AND_NULL_THE_SAME = 1 << 3;
        /// A type's custom equality replaces member-by-member comparison.
        const ALLOW_EQUALS_OVERRIDE = 1 << 4;
    }
}

impl ComparisonPolicy {
    pub fn is_inclusion(&self) -> bool {
        self.contains(Self::INCLUDE_LIST)
    }

    pub fn allows_out_of_order(&self) -> bool {
        self.contains(Self::ALLOW_COLLECTIONS_TO_BE_OUT_OF_ORDER)
    }

    pub fn treats_empty_as_null(&self) -> bool {
        self.contains(Self::TREAT_EMPTY_LIST_AND_NULL_THE_SAME)
    }

    pub fn allows_equals_override(&self) -> bool {
        self.contains(Self::ALLOW_EQUALS_OVERRIDE)
    }
}

impl Default for ComparisonPolicy {
    fn default() -> Self {
        Self::ALL
    }
}

/// Configuration for one comparison run.
///
/// Deserializes with defaults for any missing field:
///
/// ```
/// use anydiff_core::policy::{ComparisonPolicy, DiffConfig};
///
/// let config: DiffConfig = serde_json::from_str(r#"{"policy": "ALLOW_EQUALS_OVERRIDE"}"#).unwrap();
/// assert_eq!(config.policy, ComparisonPolicy::ALLOW_EQUALS_OVERRIDE);
/// assert_eq!(config.max_depth, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    pub policy: ComparisonPolicy,
    /// Optional bound on object nesting; the root is depth 0. A comparison
    /// that has to descend past it fails with `DepthExceeded`. Unbounded by
    /// default.
    pub max_depth: Option<usize>,
}

impl DiffConfig {
    pub fn new(policy: ComparisonPolicy) -> Self {
        Self {
            policy,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self::new(ComparisonPolicy::default())
    }
}

impl From<ComparisonPolicy> for DiffConfig {
    fn from(policy: ComparisonPolicy) -> Self {
        Self::new(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_all() {
        let policy = ComparisonPolicy::default();
        assert_eq!(policy, ComparisonPolicy::ALL);
        assert!(!policy.is_inclusion());
        assert!(!policy.allows_out_of_order());
    }

    #[test]
    fn test_facets_combine() {
        let policy = ComparisonPolicy::INCLUDE_LIST | ComparisonPolicy::ALLOW_EQUALS_OVERRIDE;
        assert!(policy.is_inclusion());
        assert!(policy.allows_equals_override());
        assert!(!policy.treats_empty_as_null());
    }

    #[test]
    fn test_policy_serializes_as_flag_names() {
        let policy = ComparisonPolicy::ALL | ComparisonPolicy::INCLUDE_LIST;
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, "\"ALL | INCLUDE_LIST\"");
        let back: ComparisonPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_config_defaults_and_builder() {
        let config = DiffConfig::default();
        assert_eq!(config.max_depth, None);
        assert_eq!(config.policy, ComparisonPolicy::ALL);

        let config = DiffConfig::from(ComparisonPolicy::ALLOW_COLLECTIONS_TO_BE_OUT_OF_ORDER)
            .with_max_depth(4);
        assert_eq!(config.max_depth, Some(4));
        assert!(config.policy.allows_out_of_order());
    }

    #[test]
    fn test_config_deserializes_partial_input() {
        let config: DiffConfig = serde_json::from_value(serde_json::json!({
            "policy": "ALLOW_COLLECTIONS_TO_BE_OUT_OF_ORDER | TREAT_EMPTY_LIST_AND_NULL_THE_SAME",
            "max_depth": 8
        }))
        .unwrap();
        assert!(config.policy.allows_out_of_order());
        assert!(config.policy.treats_empty_as_null());
        assert_eq!(config.max_depth, Some(8));

        let empty: DiffConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty, DiffConfig::default());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = serde_json::from_str::<ComparisonPolicy>("\"EVERYTHING\"");
        assert!(result.is_err());
    }
}
