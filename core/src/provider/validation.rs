//! Runtime validation of a submitted settings payload against a
//! [`SettingsSchema`].
//!
//! Field keys are dotted paths, resolved by walking nested JSON objects.
//! All errors are collected; an empty list means the payload is valid.

use super::schema::*;
use crate::config::parse_port;

/// A single validation error for a settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted key of the field (e.g., `"endpoints.default.port"`).
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

/// Validate a settings payload against a schema.
pub fn validate_settings(
    schema: &SettingsSchema,
    settings: &serde_json::Value,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for group in &schema.groups {
        for field in &group.fields {
            validate_field(field, settings, &mut errors);
        }
    }
    errors
}

/// Resolve a dotted key inside nested JSON objects.
pub fn lookup<'a>(settings: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.')
        .try_fold(settings, |value, segment| value.get(segment))
}

fn validate_field(
    field: &SettingsField,
    settings: &serde_json::Value,
    errors: &mut Vec<ValidationError>,
) {
    let value = lookup(settings, &field.key);
    let mut error = |message: String| {
        errors.push(ValidationError {
            field: field.key.clone(),
            message,
        })
    };

    let value = match value {
        None | Some(serde_json::Value::Null) => {
            if field.required {
                error(format!("{} is required", field.label));
            }
            return;
        }
        Some(serde_json::Value::String(s)) if field.required && s.trim().is_empty() => {
            error(format!("{} must not be empty", field.label));
            return;
        }
        Some(value) => value,
    };

    if let Some(message) = check_field_type(&field.label, &field.field_type, value) {
        error(message);
    }
}

fn check_field_type(
    label: &str,
    field_type: &FieldType,
    value: &serde_json::Value,
) -> Option<String> {
    match field_type {
        FieldType::Text | FieldType::Password => {
            (!value.is_string()).then(|| format!("{label} must be a string"))
        }
        FieldType::Select { options } => match value.as_str() {
            Some(s) if options.iter().any(|o| o.value == s) => None,
            Some(_) => Some(format!("{label} must be one of the available options")),
            None => Some(format!("{label} must be a string")),
        },
        FieldType::Port => match value {
            serde_json::Value::Number(_) | serde_json::Value::String(_) => parse_port(value)
                .is_none()
                .then(|| format!("{label} must be an integer between 1 and 65535")),
            _ => Some(format!("{label} must be a number")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: build a minimal schema with one group and the given fields.
    fn schema_with_fields(fields: Vec<SettingsField>) -> SettingsSchema {
        SettingsSchema {
            groups: vec![SettingsGroup {
                key: "test".to_string(),
                label: "Test".to_string(),
                fields,
                credential_check: None,
            }],
        }
    }

    fn required_text(key: &str) -> SettingsField {
        SettingsField::new(key, "Hostname", FieldType::Text, true)
    }

    // ── lookup ───────────────────────────────────────────────────────

    #[test]
    fn lookup_walks_nested_objects() {
        let settings = json!({"endpoints": {"default": {"hostname": "hmc1"}}});
        assert_eq!(
            lookup(&settings, "endpoints.default.hostname"),
            Some(&json!("hmc1"))
        );
        assert!(lookup(&settings, "endpoints.default.port").is_none());
        assert!(lookup(&settings, "endpoints.other.hostname").is_none());
    }

    // ── required ─────────────────────────────────────────────────────

    #[test]
    fn required_field_missing() {
        let schema = schema_with_fields(vec![required_text("endpoints.default.hostname")]);
        let errors = validate_settings(&schema, &json!({}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "endpoints.default.hostname");
        assert_eq!(errors[0].message, "Hostname is required");
    }

    #[test]
    fn required_field_null() {
        let schema = schema_with_fields(vec![required_text("a.b")]);
        let errors = validate_settings(&schema, &json!({"a": {"b": null}}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("required"));
    }

    #[test]
    fn required_field_blank_string() {
        let schema = schema_with_fields(vec![required_text("a.b")]);
        let errors = validate_settings(&schema, &json!({"a": {"b": "  "}}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("must not be empty"));
    }

    #[test]
    fn required_field_present() {
        let schema = schema_with_fields(vec![required_text("a.b")]);
        assert!(validate_settings(&schema, &json!({"a": {"b": "hmc1"}})).is_empty());
    }

    #[test]
    fn optional_field_missing_ok() {
        let field = SettingsField::new("a.b", "B", FieldType::Text, false);
        let schema = schema_with_fields(vec![field]);
        assert!(validate_settings(&schema, &json!({})).is_empty());
    }

    // ── types ────────────────────────────────────────────────────────

    #[test]
    fn text_field_wrong_type() {
        let schema = schema_with_fields(vec![required_text("host")]);
        let errors = validate_settings(&schema, &json!({"host": 42}));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("must be a string"));
    }

    #[test]
    fn select_field_checks_options() {
        let field = SettingsField::new(
            "proto",
            "Security Protocol",
            FieldType::Select {
                options: vec![
                    SelectOption::new("ssl-with-validation", "SSL"),
                    SelectOption::new("ssl-no-validation", "SSL without validation"),
                ],
            },
            true,
        );
        let schema = schema_with_fields(vec![field]);
        assert!(validate_settings(&schema, &json!({"proto": "ssl-no-validation"})).is_empty());

        let errors = validate_settings(&schema, &json!({"proto": "plain"}));
        assert!(errors[0].message.contains("one of the available options"));
        let errors = validate_settings(&schema, &json!({"proto": 1}));
        assert!(errors[0].message.contains("must be a string"));
    }

    #[test]
    fn port_field_range() {
        let field = SettingsField::new("port", "API Port", FieldType::Port, true);
        let schema = schema_with_fields(vec![field]);
        assert!(validate_settings(&schema, &json!({"port": 443})).is_empty());
        assert!(validate_settings(&schema, &json!({"port": "12443"})).is_empty());

        for bad in [
            json!(0),
            json!(65536),
            json!(44.3),
            json!(443.0),
            json!("443.0"),
            json!("+443"),
            json!("https"),
        ] {
            let errors = validate_settings(&schema, &json!({"port": bad}));
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.contains("between 1 and 65535"));
        }
        let errors = validate_settings(&schema, &json!({"port": true}));
        assert!(errors[0].message.contains("must be a number"));
    }

    #[test]
    fn port_field_agrees_with_endpoint_config() {
        use crate::config::EndpointConfig;

        let field = SettingsField::new("port", "API Port", FieldType::Port, true);
        let schema = schema_with_fields(vec![field]);
        for port in [
            json!(443),
            json!(" 8443 "),
            json!("0443"),
            json!(443.0),
            json!("443.0"),
            json!(1e3),
            json!(0),
            json!("70000"),
        ] {
            let accepted = validate_settings(&schema, &json!({ "port": port })).is_empty();
            let parsed =
                serde_json::from_value::<EndpointConfig>(json!({"hostname": "h", "port": port}));
            assert_eq!(accepted, parsed.is_ok(), "port {port}");
        }
    }

    #[test]
    fn collects_all_errors() {
        let schema = schema_with_fields(vec![
            required_text("a"),
            SettingsField::new("port", "Port", FieldType::Port, true),
        ]);
        let errors = validate_settings(&schema, &json!({"port": 0}));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "a");
        assert_eq!(errors[1].field, "port");
    }
}
