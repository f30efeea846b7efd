//! Declarative request validation
//!
//! Each resource kind has one [`Schema`]: its fields in a fixed order with
//! their JSON kinds. Validation walks that order and reports the first field
//! that fails, so the same bad body always yields the same message.

use crate::error::ApiError;
use crate::store::Record;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    /// Partition key field; must be a non-empty string on create
    pub key: &'static str,
    pub fields: &'static [(&'static str, FieldKind)],
}

pub const USER_SCHEMA: Schema = Schema {
    key: "userId",
    fields: &[
        ("userId", FieldKind::String),
        ("name", FieldKind::String),
        ("email", FieldKind::String),
    ],
};

pub const ITEM_SCHEMA: Schema = Schema {
    key: "itemId",
    fields: &[
        ("itemId", FieldKind::String),
        ("name", FieldKind::String),
        ("price", FieldKind::Number),
        ("description", FieldKind::String),
        ("userId", FieldKind::String),
    ],
};

pub fn type_error(field: &str, kind: FieldKind) -> ApiError {
    ApiError::Validation(format!("\"{}\" must be a {}", field, kind.describe()))
}

impl Schema {
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }

    /// Every field must be present with its kind. Returns exactly the schema
    /// fields; anything else in the body is dropped.
    pub fn require_all(&self, body: &Value) -> Result<Record, ApiError> {
        let mut record = Record::new();
        for (field, kind) in self.fields {
            match body.get(field) {
                Some(value) if kind.matches(value) => {
                    record.insert(field.to_string(), value.clone());
                }
                _ => return Err(type_error(field, *kind)),
            }
        }

        if record.get(self.key).and_then(Value::as_str) == Some("") {
            return Err(ApiError::Validation(format!(
                "\"{}\" must not be empty",
                self.key
            )));
        }
        Ok(record)
    }

    /// Collect the `allowed` fields present in `body`, in `allowed` order.
    ///
    /// Unknown keys are ignored. A key that is present counts as supplied,
    /// `null` included, and must match its kind. Fails when nothing is left
    /// or a supplied field has the wrong kind.
    pub fn pick(&self, body: &Value, allowed: &[&str]) -> Result<Record, ApiError> {
        let mut record = Record::new();
        for field in allowed {
            let Some(value) = body.get(field) else {
                continue;
            };
            if let Some(kind) = self.kind_of(field) {
                if !kind.matches(value) {
                    return Err(type_error(field, kind));
                }
            }
            record.insert(field.to_string(), value.clone());
        }

        if record.is_empty() {
            return Err(ApiError::Validation(format!(
                "Must supply at least one of: {}",
                allowed.join(", ")
            )));
        }
        Ok(record)
    }

    /// Keep only the schema fields of a stored record. Fields the record lacks
    /// are left out rather than invented.
    pub fn project(&self, record: &Record) -> Record {
        self.fields
            .iter()
            .filter_map(|(field, _)| {
                record
                    .get(*field)
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Parse a request body. An empty body is an empty object.
pub fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Record::new()));
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Rejected request body: {}", e);
        ApiError::Validation("Invalid request body".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_failing_field_wins() {
        let err = USER_SCHEMA
            .require_all(&json!({"userId": 1, "name": 2, "email": 3}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"userId\" must be a string");

        let err = USER_SCHEMA
            .require_all(&json!({"userId": "u1", "email": "a@b.c"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"name\" must be a string");
    }

    #[test]
    fn item_price_must_be_a_number() {
        let err = ITEM_SCHEMA
            .require_all(&json!({
                "itemId": "i1",
                "name": "Lamp",
                "price": "9.99",
                "description": "desk lamp",
                "userId": "u1"
            }))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"price\" must be a number");
    }

    #[test]
    fn require_all_drops_extra_fields() {
        let record = USER_SCHEMA
            .require_all(&json!({"userId": "u1", "name": "Ada", "email": "a@b.c", "admin": true}))
            .unwrap();
        assert_eq!(record.len(), 3);
        assert!(!record.contains_key("admin"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = USER_SCHEMA
            .require_all(&json!({"userId": "", "name": "Ada", "email": "a@b.c"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"userId\" must not be empty");
    }

    #[test]
    fn non_object_body_reports_first_field() {
        let err = ITEM_SCHEMA.require_all(&json!(["itemId"])).unwrap_err();
        assert_eq!(err.to_string(), "\"itemId\" must be a string");
    }

    #[test]
    fn pick_ignores_unknown_keys() {
        let record = ITEM_SCHEMA
            .pick(
                &json!({"name": "Lamp", "foo": "bar"}),
                &["name", "description"],
            )
            .unwrap();
        assert_eq!(Value::Object(record), json!({"name": "Lamp"}));
    }

    #[test]
    fn pick_treats_null_as_supplied() {
        let err = ITEM_SCHEMA
            .pick(&json!({"description": null}), &["name", "description"])
            .unwrap_err();
        assert_eq!(err.to_string(), "\"description\" must be a string");

        let err = ITEM_SCHEMA
            .pick(&json!({"name": "Lamp", "price": null}), &["name", "price"])
            .unwrap_err();
        assert_eq!(err.to_string(), "\"price\" must be a number");
    }

    #[test]
    fn pick_requires_one_field() {
        let err = ITEM_SCHEMA
            .pick(&json!({"foo": "bar"}), &["name", "description"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Must supply at least one of: name, description");
    }

    #[test]
    fn pick_checks_kinds() {
        let err = ITEM_SCHEMA
            .pick(&json!({"price": "free"}), &["name", "price"])
            .unwrap_err();
        assert_eq!(err.to_string(), "\"price\" must be a number");
    }

    #[test]
    fn project_keeps_only_schema_fields() {
        let stored = json!({"userId": "u1", "name": "Ada", "email": "a@b.c", "internal": 1});
        let projected = USER_SCHEMA.project(stored.as_object().unwrap());
        assert_eq!(
            Value::Object(projected),
            json!({"userId": "u1", "name": "Ada", "email": "a@b.c"})
        );
    }

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b"  \n").unwrap(), json!({}));
        assert!(parse_body(b"{not json").is_err());
    }
}
