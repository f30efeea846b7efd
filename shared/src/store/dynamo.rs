use super::conversions::{from_item, to_attribute_value, to_item};
use super::{Collection, FieldAssignment, Precondition, Record, RecordStore, Result};
use crate::error::StoreError;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    types::{AttributeValue, ReturnValue},
    Client as DynamoClient,
};
use std::collections::HashMap;

/// [`RecordStore`] backed by DynamoDB tables with a single string partition key
#[derive(Clone)]
pub struct DynamoStore {
    client: DynamoClient,
}

impl DynamoStore {
    pub fn new(client: DynamoClient) -> Self {
        Self { client }
    }
}

/// `SET` expression plus its placeholder maps
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UpdateExpression {
    pub expression: String,
    pub condition: Option<String>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Build `SET #f0 = :f0, #f1 = :f1` with one placeholder pair per assignment,
/// in assignment order. Placeholders are positional so attribute names that
/// collide with DynamoDB reserved words (`name`, for one) are always safe.
pub(crate) fn build_update_expression(
    key_attribute: &str,
    assignments: &[FieldAssignment],
    precondition: Precondition,
) -> UpdateExpression {
    let mut parts = Vec::with_capacity(assignments.len());
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (i, assignment) in assignments.iter().enumerate() {
        let name_key = format!("#f{}", i);
        let value_key = format!(":f{}", i);
        parts.push(format!("{} = {}", name_key, value_key));
        names.insert(name_key, assignment.field.clone());
        values.insert(value_key, to_attribute_value(&assignment.value));
    }

    let condition = match precondition {
        Precondition::None => None,
        Precondition::KeyExists => {
            names.insert("#key".to_string(), key_attribute.to_string());
            Some("attribute_exists(#key)".to_string())
        }
    };

    UpdateExpression {
        expression: format!("SET {}", parts.join(", ")),
        condition,
        names,
        values,
    }
}

fn key_of(collection: &Collection, key: &str) -> (String, AttributeValue) {
    (
        collection.key_attribute.clone(),
        AttributeValue::S(key.to_string()),
    )
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn get(&self, collection: &Collection, key: &str) -> Result<Option<Record>> {
        let (key_name, key_value) = key_of(collection, key);
        let result = self
            .client
            .get_item()
            .table_name(&collection.table_name)
            .key(key_name, key_value)
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(e).to_string()))?;

        result.item().map(from_item).transpose()
    }

    async fn put(&self, collection: &Collection, record: Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(&collection.table_name)
            .set_item(Some(to_item(&record)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &Collection,
        key: &str,
        assignments: &[FieldAssignment],
        precondition: Precondition,
    ) -> Result<Record> {
        let update = build_update_expression(&collection.key_attribute, assignments, precondition);
        let (key_name, key_value) = key_of(collection, key);

        let mut builder = self
            .client
            .update_item()
            .table_name(&collection.table_name)
            .key(key_name, key_value)
            .update_expression(update.expression)
            .set_condition_expression(update.condition)
            .return_values(ReturnValue::AllNew);

        for (k, v) in update.names {
            builder = builder.expression_attribute_names(k, v);
        }

        for (k, v) in update.values {
            builder = builder.expression_attribute_values(k, v);
        }

        let result = match builder.send().await {
            Ok(result) => result,
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    return Err(StoreError::ConditionFailed);
                }
                return Err(StoreError::Backend(
                    DisplayErrorContext(service_error).to_string(),
                ));
            }
        };

        match result.attributes() {
            Some(attributes) => from_item(attributes),
            None => Ok(Record::new()),
        }
    }

    async fn delete(&self, collection: &Collection, key: &str) -> Result<()> {
        let (key_name, key_value) = key_of(collection, key);
        self.client
            .delete_item()
            .table_name(&collection.table_name)
            .key(key_name, key_value)
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }

    async fn scan_all(&self, collection: &Collection) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let page = self
                .client
                .scan()
                .table_name(&collection.table_name)
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| StoreError::Backend(DisplayErrorContext(e).to_string()))?;

            for item in page.items() {
                records.push(from_item(item)?);
            }

            match page.last_evaluated_key() {
                Some(last) if !last.is_empty() => exclusive_start_key = Some(last.clone()),
                _ => break,
            }
        }

        tracing::debug!(
            "Scanned {} records from {}",
            records.len(),
            collection.table_name
        );
        Ok(records)
    }
}
