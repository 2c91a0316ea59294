use std::{future::Future, time::Duration};

use google_maps::GoogleMapsClient;
use log::*;
use serde::de::DeserializeOwned;

use super::{ProviderConfig, ProviderError};
use crate::GenericError;

/// Google Maps Platform backend.
///
/// Geocoding goes through the `google_maps` client; Distance Matrix and
/// Places Nearby Search are plain JSON endpoints queried with `reqwest`.
pub struct GoogleMapsService {
    pub(super) client: GoogleMapsClient,
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GoogleMapsService {
    pub fn new(config: &ProviderConfig) -> Result<Self, GenericError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        trace!("Built Google Maps service with a {:?} timeout.", config.timeout);
        Ok(GoogleMapsService {
            client: GoogleMapsClient::new(&config.api_key),
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    /// Bounds `request` by the configured timeout.
    pub(super) async fn with_deadline<T, F>(&self, request: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
    }

    /// GET `{base_url}/{endpoint}` with `params` plus the API key, decoding JSON.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}
