use cantonal_shared::DEFAULT_MAP_SOURCES;

/// Same-origin proxy served by cantonal-server, one route per upstream index.
pub const MAP_PROXY_PREFIX: &str = "/api/map/source/";

/// Proxied sources first, then the upstream URLs themselves for static hosting.
pub fn map_sources() -> Vec<String> {
    let proxied = (0..DEFAULT_MAP_SOURCES.len()).map(|index| format!("{MAP_PROXY_PREFIX}{index}"));
    let direct = DEFAULT_MAP_SOURCES.iter().map(|url| url.to_string());
    proxied.chain(direct).collect()
}
