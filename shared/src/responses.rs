use crate::error::ApiError;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

/// Serialize `value` as the JSON body of a response with `status`
pub fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// Render a handler outcome. Only response-building failures escape as `Err`.
pub fn respond<T: Serialize>(
    outcome: Result<(StatusCode, T), ApiError>,
) -> Result<Response<Body>, Error> {
    match outcome {
        Ok((status, value)) => json_response(status, &value),
        Err(err) => err.into_response(),
    }
}
