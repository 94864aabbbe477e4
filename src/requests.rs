use reqwest::{Client, ClientBuilder, Response};

use crate::ScrapeError;

/// Anything that can turn a URL into page markup.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
}

pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = ClientBuilder::new().build()?;
        Ok(Self { client })
    }

    pub async fn fetch_url_response(&self, url: &str) -> Result<Response, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|err| ScrapeError::network(url, err))?;
        Ok(response)
    }

    pub async fn fetch_url_body(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.fetch_url_response(url).await?;
        let body = response
            .text()
            .await
            .map_err(|err| ScrapeError::network(url, err))?;
        Ok(body)
    }
}

impl PageFetcher for RequestClient {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetch_url_body(url).await
    }
}
