//! Model-version filter applied when choosing which predictions to convert.
//!
//! The request body carries `model_version` as either a single string, a
//! list of strings, `null`, or nothing at all.

use serde::{Deserialize, Deserializer};

/// Restricts predictions by their `model_version` label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelVersionFilter {
    /// No restriction.
    #[default]
    Any,
    /// Exact match against one version.
    Exact(String),
    /// Membership in a deduplicated list. An empty list matches nothing.
    OneOf(Vec<String>),
}

impl ModelVersionFilter {
    /// Build a membership filter, dropping repeated versions while keeping
    /// first-seen order.
    pub fn one_of<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for version in versions {
            let version = version.into();
            if !unique.contains(&version) {
                unique.push(version);
            }
        }
        Self::OneOf(unique)
    }

    /// Whether a prediction tagged `version` passes the filter.
    pub fn matches(&self, version: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == version,
            Self::OneOf(allowed) => allowed.iter().any(|v| v == version),
        }
    }

    /// Versions to bind into a `= ANY($n)` clause; `None` means unfiltered.
    pub fn as_bind_values(&self) -> Option<Vec<String>> {
        match self {
            Self::Any => None,
            Self::Exact(version) => Some(vec![version.clone()]),
            Self::OneOf(versions) => Some(versions.clone()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawModelVersion {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ModelVersionFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawModelVersion>::deserialize(deserializer)? {
            None => Self::Any,
            Some(RawModelVersion::One(version)) => Self::Exact(version),
            Some(RawModelVersion::Many(versions)) => Self::one_of(versions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        model_version: ModelVersionFilter,
    }

    fn parse(body: serde_json::Value) -> ModelVersionFilter {
        serde_json::from_value::<Body>(body).unwrap().model_version
    }

    #[test]
    fn absent_and_null_mean_any() {
        assert_eq!(parse(json!({})), ModelVersionFilter::Any);
        assert_eq!(parse(json!({"model_version": null})), ModelVersionFilter::Any);
    }

    #[test]
    fn string_means_exact() {
        assert_eq!(
            parse(json!({"model_version": "v1"})),
            ModelVersionFilter::Exact("v1".into())
        );
    }

    #[test]
    fn list_is_deduplicated_in_order() {
        assert_eq!(
            parse(json!({"model_version": ["v2", "v1", "v2"]})),
            ModelVersionFilter::OneOf(vec!["v2".into(), "v1".into()])
        );
    }

    #[test]
    fn non_string_payload_is_rejected() {
        let result = serde_json::from_value::<Body>(json!({"model_version": 7}));
        assert!(result.is_err());
    }

    #[test]
    fn exact_filter_does_not_match_prefixes() {
        let filter = ModelVersionFilter::Exact("v1".into());
        assert!(filter.matches("v1"));
        assert!(!filter.matches("v10"));
    }

    #[test]
    fn empty_list_matches_nothing() {
        let filter = ModelVersionFilter::one_of(Vec::<String>::new());
        assert!(!filter.matches("v1"));
        assert_eq!(filter.as_bind_values(), Some(vec![]));
    }

    #[test]
    fn any_binds_to_none() {
        assert!(ModelVersionFilter::Any.matches("anything"));
        assert_eq!(ModelVersionFilter::Any.as_bind_values(), None);
    }
}
