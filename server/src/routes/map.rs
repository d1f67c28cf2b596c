use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use cantonal_shared::{DocumentFetcher, IngestError, SourceAttempt, ingest};
use tracing::{debug, info, warn};

use crate::state::AppState;
use crate::upstream::ReqwestFetcher;

const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

pub async fn list_sources(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "sources": state.map_sources.as_slice() }))
}

/// Same-origin passthrough for one configured upstream map document.
pub async fn proxy_source(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Response, StatusCode> {
    let Some(url) = state.map_sources.get(index) else {
        return Err(StatusCode::NOT_FOUND);
    };
    state.observability.record_proxy_request();

    match ReqwestFetcher::new(&state.http_client).fetch(url).await {
        Ok(body) => Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], body).into_response()),
        Err(failure) => {
            state.observability.record_upstream_errors(1);
            warn!(source = %url, error = %failure, "map source proxy failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

/// Run the ingestion pipeline over the configured sources and report what it accepted.
pub async fn probe(State(state): State<AppState>) -> Response {
    state.observability.record_probe_request();
    let fetcher = ReqwestFetcher::new(&state.http_client);

    match ingest(&fetcher, state.map_sources.as_slice(), &state.ingest_config).await {
        Ok(map) => {
            for attempt in &map.skipped {
                debug!(source = %attempt.source, error = %attempt.failure, "map source skipped");
            }
            state
                .observability
                .record_upstream_errors(map.skipped.len() as u64);
            info!(source = %map.source, regions = map.regions.len(), "map source accepted");

            Json(ProbeReport {
                status: "ok",
                source: &map.source,
                view_box: map.view_box.map(|vb| vb.to_attr()),
                regions: map.codes().map(|code| code.as_str()).collect(),
                skipped: attempt_reports(&map.skipped),
            })
            .into_response()
        }
        Err(err) => {
            let attempts: &[SourceAttempt] = match &err {
                IngestError::Exhausted(attempts) => attempts,
                IngestError::NoSources => &[],
            };
            state
                .observability
                .record_upstream_errors(attempts.len() as u64);
            warn!(error = %err, "no usable map source");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "status": "unavailable",
                    "message": err.to_string(),
                    "attempts": attempt_reports(attempts),
                })),
            )
                .into_response()
        }
    }
}

#[derive(serde::Serialize)]
struct ProbeReport<'a> {
    status: &'static str,
    source: &'a str,
    view_box: Option<String>,
    regions: Vec<&'a str>,
    skipped: Vec<AttemptReport<'a>>,
}

#[derive(serde::Serialize)]
struct AttemptReport<'a> {
    source: &'a str,
    error: String,
}

fn attempt_reports(attempts: &[SourceAttempt]) -> Vec<AttemptReport<'_>> {
    attempts
        .iter()
        .map(|attempt| AttemptReport {
            source: &attempt.source,
            error: attempt.failure.to_string(),
        })
        .collect()
}
