use crate::error::TransportError;
use log::debug;
use reqwest::Client;
use serde_json::Value;

/// Root of the public schedule-of-classes API
pub const DEFAULT_API_URL: &str = "https://web-app.usc.edu/web/soc/api";

/// Thin client for the catalog endpoints. Payloads are returned untyped and
/// left to the normalizer.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Lists the term codes the catalog currently serves
    pub async fn fetch_terms(&self) -> Result<Value, TransportError> {
        self.get_json("/terms".to_owned(), || "terms".to_owned())
            .await
    }

    /// Lists schools and departments offering classes in a term
    pub async fn fetch_departments(&self, term_code: &str) -> Result<Value, TransportError> {
        self.get_json(format!("/departments/{term_code}"), || {
            format!("departments in {term_code}")
        })
        .await
    }

    /// Lists a department's offered courses for a term
    pub async fn fetch_courses(&self, term_code: &str, dept: &str) -> Result<Value, TransportError> {
        self.get_json(format!("/classes/{dept}/{term_code}"), || {
            format!("courses for {dept} in {term_code}")
        })
        .await
    }

    async fn get_json(
        &self,
        path: String,
        context: impl Fn() -> String,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{path}", self.base_url);
        debug!("GET {url}");

        let fail = |source: reqwest::Error| TransportError {
            context: context(),
            source,
        };

        self.client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fail)?
            .json::<Value>()
            .await
            .map_err(fail)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url, "http://localhost:8080/api");
    }

    #[tokio::test]
    async fn test_unreachable_host_carries_context() {
        let client = CatalogClient::new("http://127.0.0.1:9");
        let err = client.fetch_courses("20241", "CSCI").await.unwrap_err();
        assert_eq!(err.context, "courses for CSCI in 20241");
        assert!(err.to_string().starts_with("failed to fetch courses for CSCI in 20241"));
    }
}
