//! Declarative dialog forms rendered by the data-manager UI.
//!
//! A form is a list of fieldsets; each fieldset serializes as
//! `{"columnCount": n, "fields": [{"type", "name", "label", "options"}]}`.

use serde::Serialize;

/// Project state a form builder may read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFormContext {
    /// Distinct model versions of the project's predictions.
    pub model_versions: Vec<String>,
    /// The project's configured "current" model version, if any.
    pub current_model_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSpec {
    pub column_count: u32,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub name: String,
    pub label: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Select,
}

/// Field name the conversion action reads back from the request body.
pub const MODEL_VERSION_FIELD: &str = "model_version";

/// Move `current` to the front of `versions`.
///
/// The first occurrence of `current` is removed before prepending; if it is
/// not in the list at all it is still prepended.
pub fn order_model_versions(mut versions: Vec<String>, current: Option<&str>) -> Vec<String> {
    let Some(first) = current else {
        return versions;
    };
    if let Some(pos) = versions.iter().position(|v| v == first) {
        versions.remove(pos);
    }
    let mut ordered = Vec::with_capacity(versions.len() + 1);
    ordered.push(first.to_string());
    ordered.extend(versions);
    ordered
}

/// Single-select form asking which model version to convert.
pub fn build_model_version_form(project: &ProjectFormContext) -> Vec<FormSpec> {
    let options = order_model_versions(
        project.model_versions.clone(),
        project.current_model_version.as_deref(),
    );

    vec![FormSpec {
        column_count: 1,
        fields: vec![FormField {
            field_type: FieldType::Select,
            name: MODEL_VERSION_FIELD.to_string(),
            label: "Choose a model".to_string(),
            options,
        }],
    }]
}
