use crate::error::{ApiError, StoreError};
use crate::responses::respond;
use crate::schema::{parse_body, type_error, FieldKind, USER_SCHEMA};
use crate::store::{FieldAssignment, Precondition, Record};
use crate::types::{Message, User};
use crate::AppState;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde_json::Value;

/// List every stored user, as stored
pub async fn list_users(state: &AppState) -> Result<Response<Body>, Error> {
    let outcome = state
        .store
        .scan_all(&state.users)
        .await
        .map(|users| (StatusCode::OK, users))
        .map_err(|e| {
            ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR, "Could not retrieve users")
        });
    respond(outcome)
}

/// Get one user, trimmed to `{userId, name, email}`
pub async fn get_user(state: &AppState, user_id: &str) -> Result<Response<Body>, Error> {
    let outcome = match state.store.get(&state.users, user_id).await {
        Ok(Some(record)) => Ok((StatusCode::OK, USER_SCHEMA.project(&record))),
        Ok(None) => Err(ApiError::NotFound(
            "Could not find user with provided \"userId\"".to_string(),
        )),
        Err(e) => Err(ApiError::store(
            e,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not retrieve user",
        )),
    };
    respond(outcome)
}

/// Create (or overwrite) a user
pub async fn create_user(state: &AppState, body: &[u8]) -> Result<Response<Body>, Error> {
    respond(store_new_user(state, body).await)
}

async fn store_new_user(state: &AppState, body: &[u8]) -> Result<(StatusCode, User), ApiError> {
    let record = USER_SCHEMA.require_all(&parse_body(body)?)?;
    let user: User = serde_json::from_value(Value::Object(record.clone()))
        .map_err(|e| ApiError::Validation(format!("Invalid user: {}", e)))?;

    state
        .store
        .put(&state.users, record)
        .await
        .map_err(|e| ApiError::store(e, StatusCode::INTERNAL_SERVER_ERROR, "Could not create user"))?;

    tracing::info!("Created user {}", user.user_id);
    Ok((StatusCode::CREATED, user))
}

/// Rename an existing user. Only `name` is mutable here.
pub async fn update_user(
    state: &AppState,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    respond(rename_user(state, user_id, body).await)
}

async fn rename_user(
    state: &AppState,
    user_id: &str,
    body: &[u8],
) -> Result<(StatusCode, Record), ApiError> {
    let body = parse_body(body)?;
    let name = match body.get("name") {
        None | Some(Value::Null) => {
            return Err(ApiError::Validation("\"name\" is required".to_string()))
        }
        Some(Value::String(name)) if name.is_empty() => {
            return Err(ApiError::Validation("\"name\" is required".to_string()))
        }
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(type_error("name", FieldKind::String)),
    };

    let assignments = [FieldAssignment::new("name", Value::String(name))];
    match state
        .store
        .update(&state.users, user_id, &assignments, Precondition::KeyExists)
        .await
    {
        Ok(updated) => Ok((StatusCode::OK, updated)),
        Err(StoreError::ConditionFailed) => {
            Err(ApiError::NotFound("User does not exist".to_string()))
        }
        Err(e) => Err(ApiError::store(
            e,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not update user",
        )),
    }
}

/// Delete a user. Deleting an unknown id still succeeds.
pub async fn delete_user(state: &AppState, user_id: &str) -> Result<Response<Body>, Error> {
    let outcome = state
        .store
        .delete(&state.users, user_id)
        .await
        .map(|()| {
            (
                StatusCode::OK,
                Message {
                    message: "User deleted",
                },
            )
        })
        .map_err(|e| ApiError::store(e, StatusCode::BAD_REQUEST, "Could not delete user"));
    respond(outcome)
}
