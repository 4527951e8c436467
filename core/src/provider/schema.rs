//! Settings schema types for the provider creation form.
//!
//! Field keys are dotted paths into the submitted payload
//! (`"endpoints.default.hostname"` addresses
//! `{"endpoints": {"default": {"hostname": ...}}}`), so the UI can render
//! and submit the form without knowing the provider's internal types.

use serde::{Deserialize, Serialize};

/// Top-level settings schema containing grouped fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSchema {
    /// Ordered list of field groups.
    pub groups: Vec<SettingsGroup>,
}

impl SettingsSchema {
    /// Find a field by its dotted key in any group.
    pub fn field(&self, key: &str) -> Option<&SettingsField> {
        self.groups
            .iter()
            .flat_map(|g| g.fields.iter())
            .find(|f| f.key == key)
    }
}

/// A named group of related settings fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsGroup {
    /// Machine-readable key (e.g., `"endpoints"`).
    pub key: String,
    /// Human-readable label for the group header.
    pub label: String,
    /// Fields in this group, rendered in order.
    pub fields: Vec<SettingsField>,
    /// When set, the UI offers a "Validate" action that checks the
    /// group's values against the live endpoint before saving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_check: Option<CredentialCheck>,
}

/// Live credential validation attached to a [`SettingsGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCheck {
    /// Key under which the validation result is tracked
    /// (e.g., `"authentications.default.valid"`).
    pub key: String,
    /// The validation result itself is not submitted with the form.
    pub skip_submit: bool,
    /// Other form values that must be sent along with the validation
    /// request.
    pub validation_dependencies: Vec<String>,
}

/// A single settings field with metadata for UI rendering and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsField {
    /// Dotted path of the value in the submitted payload.
    pub key: String,
    /// Human-readable label displayed next to the input.
    pub label: String,
    /// Optional help text shown below the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The input type and any type-specific constraints.
    pub field_type: FieldType,
    /// Whether this field must have a value before connecting.
    pub required: bool,
    /// Initial value of the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Placeholder text shown in empty inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Type of a settings field, determining the UI widget and validation rules.
///
/// Serialized as a tagged enum: `{"type": "text"}`, `{"type": "port"}`, etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldType {
    /// Single-line text input.
    Text,
    /// Masked password input.
    Password,
    /// Dropdown select with predefined options.
    Select { options: Vec<SelectOption> },
    /// Port number input (constrained to 1..=65535).
    Port,
}

/// An option in a [`FieldType::Select`] dropdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    /// Machine-readable value stored in the settings payload.
    pub value: String,
    /// Human-readable label shown in the dropdown.
    pub label: String,
}

impl SettingsField {
    /// A field of the given type with no default, placeholder or help text.
    pub fn new(key: &str, label: &str, field_type: FieldType, required: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: None,
            field_type,
            required,
            default: None,
            placeholder: None,
        }
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}
