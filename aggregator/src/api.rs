//! HTTP surface: `GET /api/v1/search-result?token=...` plus a health
//! endpoint.

use crate::metrics_defs::REQUEST_DURATION;
use crate::service::{SearchError, SearchService};
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode, header};
use shared::histogram;
use shared::http::{full_body, run_http_service, status_response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

pub const SEARCH_PATH: &str = "/api/v1/search-result";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct SearchApi {
    service: Arc<SearchService>,
    request_timeout: Duration,
}

impl SearchApi {
    pub fn new(service: Arc<SearchService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    async fn handle(
        self,
        request: Request<Incoming>,
    ) -> Result<Response<BoxBody<Bytes, ApiError>>, ApiError> {
        let started = Instant::now();

        let response = match (request.method(), request.uri().path()) {
            (&Method::GET, SEARCH_PATH) => self.handle_search(&request).await?,
            (&Method::GET, HEALTH_PATH) => {
                Response::new(full_body("ok\n"))
            }
            _ => status_response(StatusCode::NOT_FOUND),
        };

        histogram!(REQUEST_DURATION, "status" => response.status().as_u16().to_string())
            .record(started.elapsed().as_secs_f64());
        Ok(response)
    }

    async fn handle_search(
        &self,
        request: &Request<Incoming>,
    ) -> Result<Response<BoxBody<Bytes, ApiError>>, ApiError> {
        let token = query_param(request.uri().query(), "token");
        self.search_response(token).await
    }

    async fn search_response(
        &self,
        token: Option<String>,
    ) -> Result<Response<BoxBody<Bytes, ApiError>>, ApiError> {
        let Some(token) = token else {
            return Ok(bad_request("missing token parameter"));
        };

        let deadline = Instant::now() + self.request_timeout;
        match self.service.search_by_token(&token, deadline).await {
            Ok(trips) => {
                let payload = serde_json::to_vec(&trips.to_vec())?;
                let response = Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(full_body(payload));
                match response {
                    Ok(response) => Ok(response),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to build response");
                        Ok(status_response(StatusCode::INTERNAL_SERVER_ERROR))
                    }
                }
            }
            Err(SearchError::InvalidToken) => Ok(bad_request("invalid token")),
            Err(SearchError::DeadlineExceeded) => {
                Ok(status_response(StatusCode::GATEWAY_TIMEOUT))
            }
        }
    }
}

impl Service<Request<Incoming>> for SearchApi {
    type Response = Response<BoxBody<Bytes, ApiError>>;
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, request: Request<Incoming>) -> Self::Future {
        let this = self.clone();
        Box::pin(this.handle(request))
    }
}

/// Serves the API until the listener fails.
pub async fn run(host: &str, port: u16, api: SearchApi) -> Result<(), ApiError> {
    run_http_service(host, port, api).await
}

fn bad_request(message: &str) -> Response<BoxBody<Bytes, ApiError>> {
    let payload = serde_json::json!({ "error": message }).to_string();
    let mut response = Response::new(full_body(payload));
    *response.status_mut() = StatusCode::BAD_REQUEST;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    response
}

/// Minimal query-string lookup; the API takes one scalar parameter so a
/// full form decoder is not warranted. Values are returned raw, token
/// characters never need percent-encoding.
fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, TripsCache};
    use crate::stub::StubGds;
    use crate::trips::Trips;
    use async_trait::async_trait;
    use http_body_util::BodyExt;

    struct EmptyCache;

    #[async_trait]
    impl TripsCache for EmptyCache {
        async fn get(&self, _token: &str) -> Result<Trips, CacheError> {
            Err(CacheError::NoCacheHit)
        }

        async fn set(&self, _token: &str, _trips: &Trips) -> Result<(), CacheError> {
            Ok(())
        }
    }

    fn api() -> SearchApi {
        let mut service = SearchService::new(Arc::new(EmptyCache));
        service.add_provider(Arc::new(StubGds::new(
            "stub",
            Duration::from_millis(0),
            2,
        )));
        SearchApi::new(Arc::new(service), Duration::from_millis(500))
    }

    async fn body_json(response: Response<BoxBody<Bytes, ApiError>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_a_json_bad_request() {
        let response = api().search_response(None).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "missing token parameter");
    }

    #[tokio::test]
    async fn invalid_token_is_a_json_bad_request() {
        let response = api()
            .search_response(Some("nonsense".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid token");
    }

    #[tokio::test]
    async fn valid_token_returns_a_json_array_of_offers() {
        let response = api()
            .search_response(Some("AKV40000OWE1000001110MOWLED20241015".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let offers = body.as_array().expect("array body");
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0]["provider"]["name"], "stub");
    }

    #[test]
    fn query_param_finds_token() {
        assert_eq!(
            query_param(Some("token=ABC123"), "token").as_deref(),
            Some("ABC123")
        );
        assert_eq!(
            query_param(Some("lang=ru&token=ABC"), "token").as_deref(),
            Some("ABC")
        );
    }

    #[test]
    fn query_param_rejects_missing_or_empty() {
        assert_eq!(query_param(None, "token"), None);
        assert_eq!(query_param(Some("lang=ru"), "token"), None);
        assert_eq!(query_param(Some("token="), "token"), None);
    }
}
