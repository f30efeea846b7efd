use crate::error::{ApiError, StoreError};
use crate::responses::respond;
use crate::schema::{parse_body, ITEM_SCHEMA};
use crate::store::{FieldAssignment, Precondition, Record};
use crate::types::{Item, ITEM_PATCH_FIELDS, ITEM_UPDATE_FIELDS};
use crate::AppState;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde_json::Value;

/// List every stored item, as stored
pub async fn list_items(state: &AppState) -> Result<Response<Body>, Error> {
    let outcome = state
        .store
        .scan_all(&state.items)
        .await
        .map(|items| (StatusCode::OK, items))
        .map_err(|e| {
            ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR, "Could not retrieve items")
        });
    respond(outcome)
}

/// Get one item, trimmed to `{itemId, name, price, description, userId}`
pub async fn get_item(state: &AppState, item_id: &str) -> Result<Response<Body>, Error> {
    let outcome = match state.store.get(&state.items, item_id).await {
        Ok(Some(record)) => Ok((StatusCode::OK, ITEM_SCHEMA.project(&record))),
        Ok(None) => Err(ApiError::NotFound(
            "Could not find item with provided \"itemId\"".to_string(),
        )),
        Err(e) => Err(ApiError::store(
            e,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not retrieve item",
        )),
    };
    respond(outcome)
}

/// Create (or overwrite) an item
pub async fn create_item(state: &AppState, body: &[u8]) -> Result<Response<Body>, Error> {
    respond(store_new_item(state, body).await)
}

async fn store_new_item(state: &AppState, body: &[u8]) -> Result<(StatusCode, Item), ApiError> {
    let record = ITEM_SCHEMA.require_all(&parse_body(body)?)?;
    let item: Item = serde_json::from_value(Value::Object(record.clone()))
        .map_err(|e| ApiError::Validation(format!("Invalid item: {}", e)))?;

    state
        .store
        .put(&state.items, record)
        .await
        .map_err(|e| ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR, "Could not create item"))?;

    tracing::info!("Created item {} for user {}", item.item_id, item.user_id);
    Ok((StatusCode::CREATED, item))
}

/// Merge-patch `name` and/or `description` onto an existing item
///
/// This reads the item, overlays the supplied fields and writes the whole
/// record back. Two patches racing on the same item can therefore lose one
/// of the changes; use [`update_item`] when that matters.
pub async fn patch_item(
    state: &AppState,
    item_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    respond(merge_item(state, item_id, body).await)
}

async fn merge_item(
    state: &AppState,
    item_id: &str,
    body: &[u8],
) -> Result<(StatusCode, Record), ApiError> {
    let patch = ITEM_SCHEMA.pick(&parse_body(body)?, ITEM_PATCH_FIELDS)?;

    let mut item = state
        .store
        .get(&state.items, item_id)
        .await
        .map_err(|e| {
            ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR, "Could not patch item")
        })?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    item.extend(patch);

    state
        .store
        .put(&state.items, item.clone())
        .await
        .map_err(|e| {
            ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR, "Could not patch item")
        })?;

    Ok((StatusCode::OK, item))
}

/// Atomically assign any of `name`, `price`, `description`, `userId` on an
/// existing item. Absent fields are left untouched.
pub async fn update_item(
    state: &AppState,
    item_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    respond(assign_item_fields(state, item_id, body).await)
}

async fn assign_item_fields(
    state: &AppState,
    item_id: &str,
    body: &[u8],
) -> Result<(StatusCode, Record), ApiError> {
    let fields = ITEM_SCHEMA.pick(&parse_body(body)?, ITEM_UPDATE_FIELDS)?;

    // pick() walks ITEM_UPDATE_FIELDS in order; re-read in that order so the
    // assignment list does not depend on the map's key ordering.
    let assignments: Vec<FieldAssignment> = ITEM_UPDATE_FIELDS
        .iter()
        .filter_map(|field| {
            fields
                .get(*field)
                .map(|value| FieldAssignment::new(*field, value.clone()))
        })
        .collect();

    match state
        .store
        .update(&state.items, item_id, &assignments, Precondition::KeyExists)
        .await
    {
        Ok(updated) => Ok((StatusCode::OK, updated)),
        Err(StoreError::ConditionFailed) => {
            Err(ApiError::NotFound("Item does not exist".to_string()))
        }
        Err(e) => Err(ApiError::store(
            e,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not update item",
        )),
    }
}
