//! Single-attempt HTTP checks against deployed products.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};

/// HTTP client for page checks. Requests are never retried.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl PageClient {
    pub fn new(timeout: Duration) -> E2eResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// GET `url`, requiring a 200 response, and return the body.
    pub async fn get_page_content(&self, url: &str) -> E2eResult<Vec<u8>> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(E2eError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    /// POST `body` to `url` with the given content type.
    pub async fn send_post_request(
        &self,
        url: &str,
        content_type: &str,
        body: impl Into<reqwest::Body>,
    ) -> E2eResult<StatusCode> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Ok(response.status())
    }
}

impl Default for PageClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}
