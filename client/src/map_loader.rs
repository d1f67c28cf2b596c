use std::sync::Arc;

use cantonal_shared::{
    DocumentFetcher, IngestConfig, IngestError, IngestedMap, SourceAttempt, SourceFailure, ingest,
};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::config;

#[derive(Debug, Clone)]
pub enum MapStatus {
    Loading,
    Ready(Arc<IngestedMap>),
    Failed(String),
}

impl MapStatus {
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Loading => Some("Loading map\u{2026}".to_string()),
            Self::Ready(_) => None,
            Self::Failed(message) => Some(message.clone()),
        }
    }
}

pub struct GlooFetcher;

impl DocumentFetcher for GlooFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceFailure> {
        let resp = gloo_net::http::Request::get(url)
            .send()
            .await
            .map_err(|e| SourceFailure::Fetch(e.to_string()))?;

        if !resp.ok() {
            return Err(SourceFailure::Status(resp.status()));
        }

        resp.text()
            .await
            .map_err(|e| SourceFailure::Fetch(e.to_string()))
    }
}

/// Walk the source list once; the map stays unavailable for the session if nothing fits.
pub fn load_map(status: RwSignal<MapStatus>) {
    spawn_local(async move {
        let sources = config::map_sources();
        match ingest(&GlooFetcher, &sources, &IngestConfig::default()).await {
            Ok(map) => {
                warn_skipped(&map.skipped);
                web_sys::console::info_1(
                    &format!("map loaded from {} ({} cantons)", map.source, map.regions.len())
                        .into(),
                );
                status.set(MapStatus::Ready(Arc::new(map)));
            }
            Err(err) => {
                if let IngestError::Exhausted(attempts) = &err {
                    warn_skipped(attempts);
                }
                status.set(MapStatus::Failed(err.to_string()));
            }
        }
    });
}

fn warn_skipped(attempts: &[SourceAttempt]) {
    for attempt in attempts {
        web_sys::console::warn_1(
            &format!("map source {} skipped: {}", attempt.source, attempt.failure).into(),
        );
    }
}
