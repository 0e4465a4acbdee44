//! Project summary counters: which control/object/type triples and which
//! label values have been annotated, and how often.
//!
//! The summary is stored as two JSON objects:
//!
//! - `created_annotations`: `{"from_name|to_name|type": count}`
//! - `created_labels`: `{from_name: {label: count}}`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result types that never contribute to `created_annotations`.
const SKIPPED_RESULT_TYPES: &[&str] = &["relation", "pairwise"];

/// Result type whose `value` holds free text rather than labels.
const TEXT_RESULT_TYPE: &str = "text";

/// Counter increments produced by a batch of annotation results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDelta {
    pub created_annotations: BTreeMap<String, i64>,
    pub created_labels: BTreeMap<String, BTreeMap<String, i64>>,
}

impl SummaryDelta {
    pub fn is_empty(&self) -> bool {
        self.created_annotations.is_empty() && self.created_labels.is_empty()
    }

    /// Count every region of one annotation's `result` array.
    ///
    /// Anything that is not an array of objects is ignored.
    pub fn add_result(&mut self, result: &serde_json::Value) {
        let Some(regions) = result.as_array() else {
            return;
        };
        for region in regions {
            let Some(key) = annotation_key(region) else {
                continue;
            };
            *self.created_annotations.entry(key).or_insert(0) += 1;

            // annotation_key already checked `from_name` is a string.
            let from_name = region["from_name"].as_str().unwrap_or_default().to_string();
            let labels = self.created_labels.entry(from_name).or_default();
            for label in region_labels(region) {
                *labels.entry(label).or_insert(0) += 1;
            }
        }
    }

    /// Fold this delta into stored summary JSON, returning the new
    /// `(created_annotations, created_labels)` values.
    ///
    /// Non-numeric or malformed stored entries are treated as zero / empty.
    pub fn apply_to(
        &self,
        created_annotations: &serde_json::Value,
        created_labels: &serde_json::Value,
    ) -> (serde_json::Value, serde_json::Value) {
        let mut annotations = created_annotations.as_object().cloned().unwrap_or_default();
        for (key, count) in &self.created_annotations {
            let current = annotations.get(key).and_then(|v| v.as_i64()).unwrap_or(0);
            annotations.insert(key.clone(), (current + count).into());
        }

        let mut labels = created_labels.as_object().cloned().unwrap_or_default();
        for (from_name, increments) in &self.created_labels {
            let mut per_control = labels
                .get(from_name)
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();
            for (label, count) in increments {
                let current = per_control.get(label).and_then(|v| v.as_i64()).unwrap_or(0);
                per_control.insert(label.clone(), (current + count).into());
            }
            labels.insert(from_name.clone(), serde_json::Value::Object(per_control));
        }

        (
            serde_json::Value::Object(annotations),
            serde_json::Value::Object(labels),
        )
    }
}

/// Tally a batch of annotation results.
pub fn tally<'a, I>(results: I) -> SummaryDelta
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    let mut delta = SummaryDelta::default();
    for result in results {
        delta.add_result(result);
    }
    delta
}

/// `"from_name|to_name|type"`, or `None` for regions that are not counted.
fn annotation_key(region: &serde_json::Value) -> Option<String> {
    let result_type = region.get("type")?.as_str()?;
    if SKIPPED_RESULT_TYPES.contains(&result_type) {
        return None;
    }
    let from_name = region.get("from_name")?.as_str()?;
    let to_name = region.get("to_name")?.as_str()?;
    Some(format!("{from_name}|{to_name}|{result_type}"))
}

/// String items of `value[type]`, unless the region is free text.
fn region_labels(region: &serde_json::Value) -> Vec<String> {
    let Some(result_type) = region.get("type").and_then(|t| t.as_str()) else {
        return Vec::new();
    };
    if result_type == TEXT_RESULT_TYPE {
        return Vec::new();
    }
    region
        .get("value")
        .and_then(|value| value.get(result_type))
        .and_then(|items| items.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
