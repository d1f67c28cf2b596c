use axum::Json;
use axum::extract::State;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "map_sources": state.map_sources.len(),
        "min_regions": state.ingest_config.min_regions,
        "observability": {
            "proxy_requests_total": observability.proxy_requests_total,
            "probe_requests_total": observability.probe_requests_total,
            "upstream_errors_total": observability.upstream_errors_total,
        }
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use cantonal_shared::IngestConfig;
    use tower::ServiceExt;

    use crate::state::AppState;

    #[tokio::test]
    async fn health_reports_configured_sources() {
        let state = AppState::with_sources(
            vec!["http://127.0.0.1:9/a.svg".to_string()],
            IngestConfig::default(),
        );
        let app = crate::app::build_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("health response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let health: serde_json::Value = serde_json::from_slice(&body).expect("parse health");
        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(health.get("map_sources").and_then(|v| v.as_u64()), Some(1));
        assert_eq!(health.get("min_regions").and_then(|v| v.as_u64()), Some(20));
        assert_eq!(
            health
                .get("observability")
                .and_then(|v| v.get("upstream_errors_total"))
                .and_then(|v| v.as_u64()),
            Some(0)
        );
    }
}
