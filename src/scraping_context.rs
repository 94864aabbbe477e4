use crate::{config::ScrapingConfig, pipeline::Pipeline, requests::RequestClient};

/// Everything a live run needs: config from the environment and a real HTTP
/// client.
pub struct ScrapingContext {
    pub scraping_config: ScrapingConfig,
    pub request_client: RequestClient,
}

impl ScrapingContext {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_config = ScrapingConfig::new()?;
        let request_client = RequestClient::new()?;
        Ok(ScrapingContext {
            scraping_config,
            request_client,
        })
    }

    pub fn into_pipeline(self) -> anyhow::Result<Pipeline<RequestClient>> {
        Pipeline::new(self.request_client, self.scraping_config)
    }
}
