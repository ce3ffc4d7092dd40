use super::request::{Fetch, RequestError, Response};
use crate::config::ClientConfig;
use std::time::Duration;

/// [`Fetch`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetch {
    client: reqwest::blocking::Client,
}

impl ReqwestFetch {
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RequestError::Network {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for ReqwestFetch {
    fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<Response, RequestError> {
        let mut builder = self.client.get(url);
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().map_err(|e| RequestError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().map_err(|e| RequestError::Body {
            url: final_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Response {
            url: final_url,
            status,
            body,
        })
    }
}
