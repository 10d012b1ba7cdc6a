//! Declarative per-endpoint payload schemas.
//!
//! Each endpoint with a structured body declares a [`Schema`]: required and
//! optional fields, allowed primitive types, and allowed-value rules that
//! may recurse into nested sub-schemas (per array element or per object).
//! One generic interpreter validates every candidate payload; there are no
//! per-endpoint `if` chains.
//!
//! Schemas are closed: a field not declared by the schema is rejected.
//! Validation fails fast, the first violation aborts the pass.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::validation::ValidationError;

/// Loose email check, matching what the upstream API accepts.
pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+@\S+\.\S+$").unwrap());

/// Phone numbers must be a `+` followed by digits.
pub static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+\d+$").unwrap());

/// `YYYY-MM-DD`, optionally followed by `HH:MM` or `HH:MM:SS`.
pub static DATETIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\s*(?:\d{2}:\d{2}(?::\d{2})?)?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ValueType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Allowed-value rule applied after the type check.
#[derive(Debug)]
pub enum ValueRule {
    /// Integer enumeration membership.
    OneOfInt(&'static [i64]),
    /// String enumeration membership.
    OneOfStr(&'static [&'static str]),
    /// Inclusive integer range.
    IntRange { min: i64, max: i64 },
    /// Maximum string length in characters.
    MaxLength(usize),
    /// The string must match a named pattern.
    Pattern {
        description: &'static str,
        regex: &'static LazyLock<Regex>,
    },
    /// Validate each element of an array against a sub-schema.
    Each(Schema),
    /// Validate an object against a sub-schema.
    Nested(Schema),
}

impl ValueRule {
    pub fn email() -> Self {
        Self::Pattern {
            description: "a valid email address",
            regex: &EMAIL_PATTERN,
        }
    }

    pub fn phone_number() -> Self {
        Self::Pattern {
            description: "a '+' followed by digits",
            regex: &PHONE_PATTERN,
        }
    }

    pub fn date_time() -> Self {
        Self::Pattern {
            description: "'YYYY-MM-DD', optionally with 'HH:MM[:SS]'",
            regex: &DATETIME_PATTERN,
        }
    }
}

#[derive(Debug)]
pub struct Field {
    name: &'static str,
    required: bool,
    /// Allowed primitive types; an empty slice accepts any value.
    types: &'static [ValueType],
    rule: Option<ValueRule>,
}

impl Field {
    pub fn required(name: &'static str, types: &'static [ValueType]) -> Self {
        Self {
            name,
            required: true,
            types,
            rule: None,
        }
    }

    pub fn optional(name: &'static str, types: &'static [ValueType]) -> Self {
        Self {
            name,
            required: false,
            types,
            rule: None,
        }
    }

    pub fn rule(mut self, rule: ValueRule) -> Self {
        self.rule = Some(rule);
        self
    }
}

#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validate a single candidate object against this schema.
    ///
    /// Violation order: unknown field, then missing required field, then
    /// per-field type, then per-field value rule. The first violation wins.
    pub fn validate(&self, candidate: &Value) -> Result<(), ValidationError> {
        let object = candidate
            .as_object()
            .ok_or_else(|| ValidationError::InvalidType {
                schema: self.name,
                field: "(payload)",
                expected: &[ValueType::Object],
                actual: type_name(candidate),
            })?;

        for key in object.keys() {
            if !self.fields.iter().any(|field| field.name == key) {
                return Err(ValidationError::UnknownField {
                    schema: self.name,
                    field: key.clone(),
                });
            }
        }

        for field in &self.fields {
            if field.required && !object.contains_key(field.name) {
                return Err(ValidationError::MissingField {
                    schema: self.name,
                    field: field.name,
                });
            }
        }

        for field in &self.fields {
            let Some(value) = object.get(field.name) else {
                continue;
            };
            self.check_types(field, value)?;
            if let Some(rule) = &field.rule {
                self.check_rule(field, rule, value)?;
            }
        }

        Ok(())
    }

    /// Validate each element of an array-of-records payload.
    pub fn validate_each(&self, candidates: &[Value]) -> Result<(), ValidationError> {
        for candidate in candidates {
            self.validate(candidate)?;
        }
        Ok(())
    }

    fn check_types(&self, field: &Field, value: &Value) -> Result<(), ValidationError> {
        if field.types.is_empty() {
            return Ok(());
        }
        if field.types.iter().any(|t| t.matches(value)) {
            return Ok(());
        }
        Err(ValidationError::InvalidType {
            schema: self.name,
            field: field.name,
            expected: field.types,
            actual: type_name(value),
        })
    }

    fn check_rule(
        &self,
        field: &Field,
        rule: &ValueRule,
        value: &Value,
    ) -> Result<(), ValidationError> {
        let invalid = |constraint: String| ValidationError::InvalidValue {
            schema: self.name,
            field: field.name,
            constraint,
        };

        match rule {
            ValueRule::OneOfInt(allowed) => {
                let actual = value.as_i64().unwrap_or(i64::MIN);
                if !allowed.contains(&actual) {
                    return Err(invalid(format!("must be one of {allowed:?}")));
                }
            }
            ValueRule::OneOfStr(allowed) => {
                let actual = value.as_str().unwrap_or_default();
                if !allowed.contains(&actual) {
                    return Err(invalid(format!("must be one of {allowed:?}")));
                }
            }
            ValueRule::IntRange { min, max } => {
                let actual = value.as_i64().unwrap_or(i64::MIN);
                if actual < *min || actual > *max {
                    return Err(invalid(format!("must be between {min} and {max}")));
                }
            }
            ValueRule::MaxLength(max) => {
                let length = value.as_str().map(|s| s.chars().count()).unwrap_or(0);
                if length > *max {
                    return Err(invalid(format!("must be at most {max} characters")));
                }
            }
            ValueRule::Pattern { description, regex } => {
                let actual = value.as_str().unwrap_or_default();
                if !regex.is_match(actual) {
                    return Err(invalid(format!("must be {description}")));
                }
            }
            ValueRule::Each(sub) => {
                let Some(items) = value.as_array() else {
                    return Err(invalid(format!(
                        "must be an array of '{}' objects",
                        sub.name
                    )));
                };
                sub.validate_each(items)?;
            }
            ValueRule::Nested(sub) => {
                sub.validate(value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn recipient_schema() -> Schema {
        Schema::new("recipient")
            .field(Field::required("email", &[ValueType::String]).rule(ValueRule::email()))
            .field(Field::required("messageId", &[ValueType::String]))
            .field(Field::optional("name", &[ValueType::String]))
    }

    fn sample_schema() -> Schema {
        Schema::new("sample")
            .field(Field::required("subject", &[ValueType::String]))
            .field(
                Field::optional("priority", &[ValueType::Integer])
                    .rule(ValueRule::IntRange { min: 0, max: 5 }),
            )
            .field(
                Field::optional("state", &[ValueType::String])
                    .rule(ValueRule::OneOfStr(&["sendable", "canceled"])),
            )
            .field(Field::optional("to", &[ValueType::Array]).rule(ValueRule::Each(
                recipient_schema(),
            )))
            .field(Field::optional("attachments", &[]))
    }

    #[test]
    fn unknown_fields_are_rejected_first() {
        let err = sample_schema()
            .validate(&json!({"bogus": 1}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { field, .. } if field == "bogus"));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = sample_schema().validate(&json!({})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                schema: "sample",
                field: "subject",
            }
        );
    }

    #[test]
    fn type_mismatch_is_reported() {
        let err = sample_schema()
            .validate(&json!({"subject": 42}))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidType {
                field: "subject",
                actual: "integer",
                ..
            }
        ));
    }

    #[test]
    fn int_range_is_inclusive() {
        let schema = sample_schema();
        assert!(schema.validate(&json!({"subject": "s", "priority": 0})).is_ok());
        assert!(schema.validate(&json!({"subject": "s", "priority": 5})).is_ok());
        assert!(schema.validate(&json!({"subject": "s", "priority": 6})).is_err());
    }

    #[test]
    fn string_enums_are_enforced() {
        let schema = sample_schema();
        assert!(
            schema
                .validate(&json!({"subject": "s", "state": "sendable"}))
                .is_ok()
        );
        let err = schema
            .validate(&json!({"subject": "s", "state": "paused"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { field: "state", .. }));
    }

    #[test]
    fn nested_array_elements_are_validated() {
        let schema = sample_schema();
        let ok = json!({
            "subject": "s",
            "to": [{"email": "a@example.com", "messageId": "m1"}]
        });
        assert!(schema.validate(&ok).is_ok());

        let missing = json!({
            "subject": "s",
            "to": [{"email": "a@example.com"}]
        });
        let err = schema.validate(&missing).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                schema: "recipient",
                field: "messageId",
            }
        );

        let not_array = json!({"subject": "s", "to": {}});
        assert!(matches!(
            schema.validate(&not_array).unwrap_err(),
            ValidationError::InvalidType { field: "to", .. }
        ));
    }

    #[test]
    fn untyped_fields_accept_anything() {
        let schema = sample_schema();
        assert!(
            schema
                .validate(&json!({"subject": "s", "attachments": [{"name": "f"}]}))
                .is_ok()
        );
        assert!(
            schema
                .validate(&json!({"subject": "s", "attachments": "inline"}))
                .is_ok()
        );
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        let err = sample_schema().validate(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { field: "(payload)", .. }));
    }

    #[test]
    fn email_pattern_is_loose() {
        assert!(EMAIL_PATTERN.is_match("user@example.com"));
        assert!(EMAIL_PATTERN.is_match("display name@sub.example.pl"));
        assert!(!EMAIL_PATTERN.is_match("not-an-email"));
        assert!(!EMAIL_PATTERN.is_match("user@nodot"));
    }

    #[test]
    fn phone_pattern_requires_plus_prefix() {
        assert!(PHONE_PATTERN.is_match("+48123123123"));
        assert!(!PHONE_PATTERN.is_match("123"));
        assert!(!PHONE_PATTERN.is_match("+"));
    }

    #[test]
    fn datetime_pattern_allows_optional_time() {
        assert!(DATETIME_PATTERN.is_match("2024-01-31"));
        assert!(DATETIME_PATTERN.is_match("2024-01-31 08:30"));
        assert!(DATETIME_PATTERN.is_match("2024-01-31 08:30:59"));
        assert!(!DATETIME_PATTERN.is_match("31-01-2024"));
        assert!(!DATETIME_PATTERN.is_match("2024-01-31 8:30"));
    }

    #[test]
    fn max_length_counts_characters() {
        let schema = Schema::new("names").field(
            Field::optional("name", &[ValueType::String]).rule(ValueRule::MaxLength(3)),
        );
        assert!(schema.validate(&json!({"name": "żół"})).is_ok());
        assert!(schema.validate(&json!({"name": "żółw"})).is_err());
    }
}
