use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::error::TransportError;
use crate::config::TransportConfig;
use crate::fetcher::Fetcher;

/// Envelope returned by an "all origins" style proxy.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

pub struct HttpFetcher {
    client: Client,
    proxy: Option<Url>,
}

impl HttpFetcher {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        let proxy = config.proxy.as_deref().map(Url::parse).transpose()?;

        Ok(Self { client, proxy })
    }

    /// Address actually requested for `address`, routed through the proxy if set.
    pub fn request_url(&self, address: &str) -> String {
        match &self.proxy {
            Some(endpoint) => proxied_url(endpoint, address),
            None => address.to_string(),
        }
    }
}

fn proxied_url(endpoint: &Url, address: &str) -> String {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("disableCache", "true")
        .append_pair("url", address);
    url.to_string()
}

fn unwrap_envelope(body: &[u8]) -> Result<Vec<u8>, TransportError> {
    let envelope: ProxyEnvelope =
        serde_json::from_slice(body).map_err(|e| TransportError::Proxy(e.to_string()))?;
    envelope
        .contents
        .map(String::into_bytes)
        .ok_or_else(|| TransportError::Proxy("response has no contents".into()))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.request_url(address);
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?.to_vec();

        if self.proxy.is_some() {
            unwrap_envelope(&body)
        } else {
            Ok(body)
        }
    }
}
