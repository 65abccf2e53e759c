use crate::error::AqiError;
use log::{debug, warn};
use reqwest::Client;
use std::future::Future;

/// Issues a single HTTP GET and decodes the body as JSON.
///
/// All network access in the crate goes through this trait. [`ReqwestFetcher`]
/// is the production implementation; tests substitute a scripted one.
pub trait JsonFetcher: Send + Sync {
    fn get_json(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<serde_json::Value, AqiError>> + Send;
}

/// [`JsonFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing client, e.g. one configured with timeouts or a proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl JsonFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, AqiError> {
        debug!("GET {}", redact(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AqiError::NetworkRequest(redact(url), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", redact(url), e.status());
                return Err(if let Some(status) = e.status() {
                    AqiError::HttpStatus {
                        url: redact(url),
                        status,
                        source: e,
                    }
                } else {
                    AqiError::NetworkRequest(redact(url), e)
                });
            }
        };

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AqiError::ResponseBody(redact(url), e))
    }
}

const CREDENTIAL_PARAMS: [&str; 2] = ["token=", "api_key="];

/// Masks credential query parameters so URLs can be logged and put in errors.
pub(crate) fn redact(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let params: Vec<String> = query
        .split('&')
        .map(|param| {
            match CREDENTIAL_PARAMS
                .iter()
                .find(|prefix| param.starts_with(*prefix))
            {
                Some(prefix) => format!("{}***", prefix),
                None => param.to_string(),
            }
        })
        .collect();
    format!("{}?{}", base, params.join("&"))
}
