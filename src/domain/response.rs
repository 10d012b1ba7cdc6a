use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
/// The top-level JSON wrapper every Redlink endpoint responds with.
pub struct Envelope {
    /// Response records in original order; empty when the payload carried
    /// `data: null` or no `data` at all.
    pub data: Vec<Value>,
    /// API-level errors in original order.
    pub errors: Vec<ErrorRecord>,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single API-level error. All three fields are opaque strings owned by
/// the upstream API.
pub struct ErrorRecord {
    pub title: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Envelope metadata.
///
/// `number_of_errors` and `number_of_data` should match the respective
/// sequence lengths, but they are passed through as received and never
/// cross-checked.
pub struct Meta {
    pub number_of_errors: i64,
    pub number_of_data: i64,
    /// HTTP status code as reported inside the envelope.
    pub status: i64,
    /// Server-assigned correlation id; attach it when reporting API issues.
    pub uniq_id: String,
}

#[derive(Debug, thiserror::Error)]
#[error("could not deserialize response: {kind}")]
/// Raised when a response body cannot be turned into an [`Envelope`].
/// Carries the raw offending string for diagnostics.
pub struct DeserializationError {
    kind: DeserializationErrorKind,
    raw: String,
}

impl DeserializationError {
    /// The raw response text that failed to deserialize.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &DeserializationErrorKind {
        &self.kind
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeserializationErrorKind {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("expected a JSON object envelope, got {actual}")]
    NotAnObject { actual: &'static str },

    #[error("meta is missing required field '{field}'")]
    MissingMeta { field: &'static str },

    #[error("errors[{index}] is missing required field '{field}'")]
    MalformedError { index: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    data: Option<Vec<Value>>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
    #[serde(default)]
    meta: Option<RawMeta>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    #[serde(rename = "numberOfErrors", default)]
    number_of_errors: Option<i64>,
    #[serde(rename = "numberOfData", default)]
    number_of_data: Option<i64>,
    #[serde(default)]
    status: Option<i64>,
    #[serde(rename = "uniqId", default)]
    uniq_id: Option<String>,
}

impl Envelope {
    /// Parse a JSON-encoded envelope.
    ///
    /// Fails when the input is not valid JSON, is not a JSON object, has
    /// malformed `errors[]` entries, or `meta` lacks any of its four
    /// required fields. The error carries the raw input.
    pub fn from_json(raw: &str) -> Result<Self, DeserializationError> {
        let fail = |kind| DeserializationError {
            kind,
            raw: raw.to_owned(),
        };

        let value: Value = serde_json::from_str(raw)
            .map_err(|err| fail(DeserializationErrorKind::InvalidJson(err)))?;
        if !value.is_object() {
            return Err(fail(DeserializationErrorKind::NotAnObject {
                actual: match value {
                    Value::Null => "null",
                    Value::Bool(_) => "boolean",
                    Value::Number(_) => "number",
                    Value::String(_) => "string",
                    Value::Array(_) => "array",
                    Value::Object(_) => unreachable!(),
                },
            }));
        }

        let parsed: RawEnvelope = serde_json::from_value(value)
            .map_err(|err| fail(DeserializationErrorKind::InvalidJson(err)))?;

        let mut errors = Vec::new();
        if let Some(raw_errors) = parsed.errors {
            for (index, entry) in raw_errors.into_iter().enumerate() {
                errors.push(error_record(index, entry).map_err(&fail)?);
            }
        }

        let raw_meta = parsed
            .meta
            .ok_or_else(|| fail(DeserializationErrorKind::MissingMeta { field: "meta" }))?;
        let meta = Meta {
            number_of_errors: raw_meta.number_of_errors.ok_or_else(|| {
                fail(DeserializationErrorKind::MissingMeta {
                    field: "numberOfErrors",
                })
            })?,
            number_of_data: raw_meta.number_of_data.ok_or_else(|| {
                fail(DeserializationErrorKind::MissingMeta {
                    field: "numberOfData",
                })
            })?,
            status: raw_meta
                .status
                .ok_or_else(|| fail(DeserializationErrorKind::MissingMeta { field: "status" }))?,
            uniq_id: raw_meta
                .uniq_id
                .ok_or_else(|| fail(DeserializationErrorKind::MissingMeta { field: "uniqId" }))?,
        };

        Ok(Self {
            data: parsed.data.unwrap_or_default(),
            errors,
            meta,
        })
    }
}

fn error_record(index: usize, entry: Value) -> Result<ErrorRecord, DeserializationErrorKind> {
    let field = |name: &'static str| -> Result<String, DeserializationErrorKind> {
        entry
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(DeserializationErrorKind::MalformedError { index, field: name })
    };

    Ok(ErrorRecord {
        title: field("title")?,
        message: field("message")?,
        code: field("code")?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn round_trips_a_full_envelope() {
        let raw = r#"
        {
          "data": null,
          "errors": [{"title": "T", "message": "M", "code": "C"}],
          "meta": {"numberOfErrors": 1, "numberOfData": 0, "status": 422, "uniqId": "x"}
        }
        "#;

        let envelope = Envelope::from_json(raw).unwrap();
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].title, "T");
        assert_eq!(envelope.errors[0].message, "M");
        assert_eq!(envelope.errors[0].code, "C");
        assert_eq!(envelope.meta.number_of_errors, 1);
        assert_eq!(envelope.meta.number_of_data, 0);
        assert_eq!(envelope.meta.status, 422);
        assert_eq!(envelope.meta.uniq_id, "x");
    }

    #[test]
    fn data_defaults_to_empty_when_absent() {
        let raw = r#"
        {
          "meta": {"numberOfErrors": 0, "numberOfData": 0, "status": 200, "uniqId": "y"}
        }
        "#;

        let envelope = Envelope::from_json(raw).unwrap();
        assert!(envelope.data.is_empty());
        assert!(envelope.errors.is_empty());
    }

    #[test]
    fn data_records_keep_their_order() {
        let raw = r#"
        {
          "data": [{"id": 1}, {"id": 2}, {"id": 3}],
          "meta": {"numberOfErrors": 0, "numberOfData": 3, "status": 200, "uniqId": "z"}
        }
        "#;

        let envelope = Envelope::from_json(raw).unwrap();
        assert_eq!(
            envelope.data,
            vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
        );
    }

    #[test]
    fn malformed_json_carries_the_raw_string() {
        let err = Envelope::from_json("{").unwrap_err();
        assert_eq!(err.raw(), "{");
        assert!(matches!(err.kind(), DeserializationErrorKind::InvalidJson(_)));
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        let err = Envelope::from_json("null").unwrap_err();
        assert!(matches!(
            err.kind(),
            DeserializationErrorKind::NotAnObject { actual: "null" }
        ));
        assert_eq!(err.raw(), "null");

        let err = Envelope::from_json("[1,2]").unwrap_err();
        assert!(matches!(
            err.kind(),
            DeserializationErrorKind::NotAnObject { actual: "array" }
        ));
    }

    #[test]
    fn missing_meta_fields_are_rejected() {
        let raw = r#"{"meta": {"numberOfErrors": 0, "numberOfData": 0, "status": 200}}"#;
        let err = Envelope::from_json(raw).unwrap_err();
        assert!(matches!(
            err.kind(),
            DeserializationErrorKind::MissingMeta { field: "uniqId" }
        ));

        let err = Envelope::from_json(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(
            err.kind(),
            DeserializationErrorKind::MissingMeta { field: "meta" }
        ));
    }

    #[test]
    fn malformed_error_entries_are_rejected() {
        let raw = r#"
        {
          "errors": [{"title": "T", "code": "C"}],
          "meta": {"numberOfErrors": 1, "numberOfData": 0, "status": 400, "uniqId": "q"}
        }
        "#;
        let err = Envelope::from_json(raw).unwrap_err();
        assert!(matches!(
            err.kind(),
            DeserializationErrorKind::MalformedError {
                index: 0,
                field: "message"
            }
        ));
    }

    #[test]
    fn meta_counts_are_passed_through_unchecked() {
        // numberOfData disagrees with the actual data length on purpose.
        let raw = r#"
        {
          "data": [{"id": 1}],
          "meta": {"numberOfErrors": 0, "numberOfData": 7, "status": 200, "uniqId": "u"}
        }
        "#;
        let envelope = Envelope::from_json(raw).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.meta.number_of_data, 7);
    }
}
