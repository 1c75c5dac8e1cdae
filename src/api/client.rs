use std::time::Duration;

use reqwest::blocking::{self, Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::address::ContractAddress;
use crate::config::{NetworkConfig, NetworkTable};
use crate::details::{Network, VerificationDetails};
use crate::errors::RequestFailure;

use super::errors::ApiClientError;
use super::explorer::{Explorer, ExplorerProvider};
use super::models::{AbiLookup, SourceSubmission, VerificationResult, STATUS_NOT_OK, STATUS_OK};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client for one network's explorer API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: NetworkConfig,
    client: Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Fails if the API base `Url` cannot be a base. We rely on that
    /// invariant in other methods.
    pub fn new(config: NetworkConfig) -> Result<Self, ApiClientError> {
        // Test here so that we are sure path_segments_mut succeeds
        if config.api_base.cannot_be_a_base() {
            return Err(ApiClientError::CannotBeBase(config.api_base));
        }

        let client = blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { config, client })
    }

    pub const fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.config.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiClientError::CannotBeBase(self.config.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("apikey", &self.config.api_key);
        Ok(url)
    }

    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base.
    pub fn is_verified_url(&self, address: &ContractAddress) -> Result<Url, ApiClientError> {
        self.endpoint(&["contracts", "abi_of_verified_contract", address.as_ref()])
    }

    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base.
    pub fn verify_contract_url(&self) -> Result<Url, ApiClientError> {
        self.endpoint(&["contracts", "verify_source_code"])
    }

    /// Rejects non-success statuses before anything is decoded.
    fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            log::error!("HTTP error {status} from {}", url.path());
            log::debug!("Error response: {text}");
            return Err(ApiClientError::from(RequestFailure::new(
                url.clone(),
                status,
                text,
            )));
        }

        let response_text = response.text().map_err(ApiClientError::transport)?;
        log::debug!("Raw API Response: {response_text}");

        serde_json::from_str(&response_text).map_err(|e| {
            log::error!("Failed to parse JSON response: {e}");
            log::error!("Response text: {response_text}");
            ApiClientError::malformed(url.clone(), format!("Failed to parse JSON response: {e}"))
        })
    }
}

impl Explorer for ApiClient {
    fn is_verified(&self, address: &ContractAddress) -> Result<bool, ApiClientError> {
        let url = self.is_verified_url(address)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(ApiClientError::transport)?;
        let lookup: AbiLookup = Self::decode(&url, response)?;

        match lookup.status.as_str() {
            Some(STATUS_OK) => {
                log::info!("Contract {address} is verified");
                Ok(true)
            }
            Some(STATUS_NOT_OK) => {
                log::info!("Contract {address} is not verified: {}", lookup.message);
                Ok(false)
            }
            _ => {
                log::warn!(
                    "Unexpected verification status {} for {address}: {:?}",
                    lookup.status,
                    lookup.message
                );
                Ok(false)
            }
        }
    }

    fn verify_contract(
        &self,
        details: &VerificationDetails,
    ) -> Result<VerificationResult, ApiClientError> {
        let url = self.verify_contract_url()?;
        let payload = SourceSubmission::from(details);

        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "*/*")
            .json(&payload)
            .send()
            .map_err(ApiClientError::transport)?;

        let result: VerificationResult = Self::decode(&url, response)?;
        log::debug!(
            "Verification answered status={} message={:?}",
            result.status,
            result.message
        );
        Ok(result)
    }

    fn browser_url(&self, address: &ContractAddress) -> String {
        format!(
            "{}/address/{address}",
            self.config.browser_base.as_str().trim_end_matches('/')
        )
    }
}

impl ExplorerProvider for NetworkTable {
    type Client = ApiClient;

    fn client_for(&self, network: Network) -> Result<ApiClient, ApiClientError> {
        log::debug!("Binding explorer client for {network}");
        ApiClient::new(self.get(network).clone())
    }
}
