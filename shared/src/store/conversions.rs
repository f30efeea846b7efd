use super::Record;
use crate::error::StoreError;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};
use std::collections::HashMap;

pub(crate) fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(to_attribute_value).collect()),
        Value::Object(map) => AttributeValue::M(to_item(map)),
    }
}

pub(crate) fn to_item(record: &Record) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(k, v)| (k.clone(), to_attribute_value(v)))
        .collect()
}

pub(crate) fn from_attribute_value(value: &AttributeValue) -> Result<Value, StoreError> {
    let converted = match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(from_attribute_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(from_item(map)?),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => {
            return Err(StoreError::Conversion(format!(
                "unsupported attribute type: {:?}",
                other
            )))
        }
    };
    Ok(converted)
}

pub(crate) fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Record, StoreError> {
    item.iter()
        .map(|(k, v)| from_attribute_value(v).map(|v| (k.clone(), v)))
        .collect()
}

// Integers stay integers so a stored `10` reads back as `10`, not `10.0`.
fn parse_number(raw: &str) -> Result<Number, StoreError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StoreError::Conversion(format!("invalid number: {}", raw)))
}
