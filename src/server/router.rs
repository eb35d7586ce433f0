use crate::server::handlers;
use crate::server::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/prices/:currency", get(handlers::get_price))
        .route("/prices/:currency/range", get(handlers::get_price_range));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BucketWidth, KeyLayout, PriceStore};
    use crate::query::QueryFacade;
    use crate::server::models::PriceResp;
    use crate::types::{PriceQuote, SupportedCurrency};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = Arc::new(PriceStore::in_memory(KeyLayout::Compact).unwrap());
        let width = BucketWidth::from_secs(10).unwrap();
        for secs in [1000i64, 1010, 1020, 1030] {
            let quote = PriceQuote::new("USD", 50000.5, secs * 1000 + 250, "BTCAVERAGE");
            store.put(SupportedCurrency::Usd, &quote, width).unwrap();
        }
        create_router(AppState::new(Arc::new(QueryFacade::new(store, width))))
    }

    async fn send(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _) = send("/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_point_lookup() {
        let (status, body) = send("/v1/prices/usd?uts=1005").await;
        assert_eq!(status, StatusCode::OK);

        let resp: PriceResp = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.code, "USD");
        assert_eq!(resp.uts, 1000);
        assert_eq!(resp.price, 50000.5);
        assert_eq!(resp.provider, "BTCAVERAGE");
    }

    #[tokio::test]
    async fn test_point_lookup_miss_is_404() {
        let (status, body) = send("/v1/prices/USD?uts=1045").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(error["error"], "NOT_FOUND");

        let (status, _) = send("/v1/prices/jpy?uts=1005").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_range_lookup() {
        let (status, body) = send("/v1/prices/usd/range?start=1000&end=1030").await;
        assert_eq!(status, StatusCode::OK);

        let resp: Vec<PriceResp> = serde_json::from_slice(&body).unwrap();
        let starts: Vec<i64> = resp.iter().map(|r| r.uts).collect();
        assert_eq!(starts, vec![1000, 1010, 1020]);

        let (status, body) = send("/v1/prices/usd/range?start=1030&end=1000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let (status, _) = send("/v1/prices/eur?uts=1005").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send("/v1/prices/usd?uts=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_query_gets_json_error() {
        for uri in [
            "/v1/prices/usd?uts=yesterday",
            "/v1/prices/usd",
            "/v1/prices/usd/range?start=1000",
            "/v1/prices/usd/range?start=1000&end=soon",
        ] {
            let (status, body) = send(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);

            let error: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(error["error"], "BAD_REQUEST", "{}", uri);
            assert!(error["message"].as_str().is_some_and(|m| !m.is_empty()), "{}", uri);
        }
    }
}
