use crate::address::ContractAddress;
use crate::details::{Network, VerificationDetails};

use super::errors::ApiClientError;
use super::models::VerificationResult;

/// What the session needs from a block explorer bound to one network.
pub trait Explorer {
    /// # Errors
    ///
    /// Transport failures, non-success HTTP statuses and undecodable
    /// bodies. An unexpected `status` value is not an error.
    fn is_verified(&self, address: &ContractAddress) -> Result<bool, ApiClientError>;

    /// # Errors
    ///
    /// Transport failures, non-success HTTP statuses and undecodable
    /// bodies. A rejected verification is an `Ok` result.
    fn verify_contract(
        &self,
        details: &VerificationDetails,
    ) -> Result<VerificationResult, ApiClientError>;

    fn browser_url(&self, address: &ContractAddress) -> String;
}

/// Derives the explorer for a network. Called again every time the
/// selected network changes; old clients are simply dropped.
pub trait ExplorerProvider {
    type Client: Explorer;

    /// # Errors
    ///
    /// Fails if the network's configuration can't back a client.
    fn client_for(&self, network: Network) -> Result<Self::Client, ApiClientError>;
}
