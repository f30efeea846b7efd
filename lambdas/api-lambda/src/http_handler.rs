use catalog_shared::{router, AppState};
use lambda_http::{Body, Error, Request, Response};
use std::sync::Arc;

/// Main Lambda handler - routes users and items requests
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    tracing::info!(
        "API Lambda invoked - Method: {} Path: {}",
        event.method(),
        event.uri().path()
    );

    let response = router::dispatch(&event, &state).await?;

    tracing::info!("Responded {}", response.status());
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_shared::{config::GatewayConfig, store::MemoryStore};
    use lambda_http::http::{Method, StatusCode};

    fn state() -> Arc<AppState> {
        let config = GatewayConfig {
            user_table: "users".to_string(),
            item_table: "items".to_string(),
            dynamodb_endpoint: None,
        };
        AppState::new(Arc::new(MemoryStore::new()), &config)
    }

    fn request(method: Method, path: &str, body: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(path)
            .body(Body::from(body))
            .unwrap()
    }

    fn json_body(response: &Response<Body>) -> serde_json::Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn hello_reports_running() {
        let response = function_handler(request(Method::GET, "/hello", ""), state())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(&response)["message"],
            "The service is running."
        );
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
            let response = function_handler(request(method, "/unknown", ""), state())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                response.headers().get("Content-Type").unwrap(),
                "application/json"
            );
            assert_eq!(json_body(&response)["error"], "Not Found");
        }
    }
}
