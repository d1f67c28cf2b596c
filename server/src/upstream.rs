use cantonal_shared::{DocumentFetcher, SourceFailure};

/// Fetches map documents with the shared, timeout-configured HTTP client.
pub struct ReqwestFetcher<'a> {
    client: &'a reqwest::Client,
}

impl<'a> ReqwestFetcher<'a> {
    pub fn new(client: &'a reqwest::Client) -> Self {
        Self { client }
    }
}

impl DocumentFetcher for ReqwestFetcher<'_> {
    async fn fetch(&self, url: &str) -> Result<String, SourceFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceFailure::Fetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceFailure::Status(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| SourceFailure::Fetch(e.to_string()))
    }
}
