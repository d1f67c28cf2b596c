use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

const BUNDLE_CACHE: &str = "public, max-age=31536000, immutable";
const ENTRY_CACHE: &str = "no-cache";

/// Hex digits Trunk puts between the crate name and the extension.
const TRUNK_HASH_LEN: usize = 16;

pub(crate) fn build_app(state: AppState) -> Router {
    let client_bundle = Router::new()
        .fallback_service(
            ServeDir::new(&*state.static_dir)
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn(bundle_cache_headers));

    Router::new()
        .route("/api/health", get(routes::api::health))
        .route("/api/map/sources", get(routes::map::list_sources))
        .route("/api/map/source/{index}", get(routes::map::proxy_source))
        .route("/api/map/probe", get(routes::map::probe))
        .layer(CompressionLayer::new())
        .fallback_service(client_bundle)
        .with_state(state)
}

async fn bundle_cache_headers(request: Request, next: Next) -> Response {
    let policy = bundle_cache_policy(request.uri().path());
    let mut response = next.run(request).await;

    if let Some(policy) = policy
        && response.status().is_success()
    {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(policy));
    }
    response
}

/// The page entry must revalidate so a rebuilt bundle is picked up; hashed bundle files never change.
fn bundle_cache_policy(path: &str) -> Option<&'static str> {
    let file = path.rsplit('/').next().unwrap_or_default();
    if file.is_empty() || file == "index.html" {
        return Some(ENTRY_CACHE);
    }
    is_trunk_hashed(file).then_some(BUNDLE_CACHE)
}

/// `cantonal-client-<hash>.js` and `cantonal-client-<hash>_bg.wasm`.
fn is_trunk_hashed(file: &str) -> bool {
    let Some(stem) = file
        .strip_suffix("_bg.wasm")
        .or_else(|| file.strip_suffix(".js"))
    else {
        return false;
    };
    let Some((_, hash)) = stem.rsplit_once('-') else {
        return false;
    };
    hash.len() == TRUNK_HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit())
}
