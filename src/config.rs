use url::Url;

use crate::api::ApiClientError;
use crate::details::Network;

pub const TESTNET1_API_URL: &str = "https://api.test.btcs.network/api";
pub const TESTNET2_API_URL: &str = "https://api.test2.btcs.network/api";
pub const MAINNET_API_URL: &str = "https://api.btcs.network/api";

pub const TESTNET1_BROWSER_URL: &str = "https://scan.test.btcs.network";
pub const TESTNET2_BROWSER_URL: &str = "https://scan.test2.btcs.network";
pub const MAINNET_BROWSER_URL: &str = "https://scan.btcs.network";

/// Endpoints and credentials of a single network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub api_base: Url,
    /// May be empty, the explorer rejects such requests on its own.
    pub api_key: String,
    pub browser_base: Url,
}

impl NetworkConfig {
    pub fn new(api_base: Url, api_key: impl Into<String>, browser_base: Url) -> Self {
        Self {
            api_base,
            api_key: api_key.into(),
            browser_base,
        }
    }

    /// # Errors
    ///
    /// Fails if either URL doesn't parse.
    pub fn parse(
        api_base: &str,
        api_key: impl Into<String>,
        browser_base: &str,
    ) -> Result<Self, ApiClientError> {
        Ok(Self::new(
            Url::parse(api_base)?,
            api_key,
            Url::parse(browser_base)?,
        ))
    }
}

/// Per-network configuration. Built once at startup and handed to the
/// clients by value; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTable {
    testnet1: NetworkConfig,
    testnet2: NetworkConfig,
    mainnet: NetworkConfig,
}

impl NetworkTable {
    pub const fn new(
        testnet1: NetworkConfig,
        testnet2: NetworkConfig,
        mainnet: NetworkConfig,
    ) -> Self {
        Self {
            testnet1,
            testnet2,
            mainnet,
        }
    }

    /// The public endpoints with the given API keys.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in URLs stop parsing.
    pub fn with_keys(
        testnet1_key: impl Into<String>,
        testnet2_key: impl Into<String>,
        mainnet_key: impl Into<String>,
    ) -> Result<Self, ApiClientError> {
        Ok(Self::new(
            NetworkConfig::parse(TESTNET1_API_URL, testnet1_key, TESTNET1_BROWSER_URL)?,
            NetworkConfig::parse(TESTNET2_API_URL, testnet2_key, TESTNET2_BROWSER_URL)?,
            NetworkConfig::parse(MAINNET_API_URL, mainnet_key, MAINNET_BROWSER_URL)?,
        ))
    }

    pub const fn get(&self, network: Network) -> &NetworkConfig {
        match network {
            Network::Testnet1 => &self.testnet1,
            Network::Testnet2 => &self.testnet2,
            Network::Mainnet => &self.mainnet,
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, network: Network, api_base: Url) -> Self {
        let config = match network {
            Network::Testnet1 => &mut self.testnet1,
            Network::Testnet2 => &mut self.testnet2,
            Network::Mainnet => &mut self.mainnet,
        };
        config.api_base = api_base;
        self
    }
}
