use reqwest::Url;
use std::str::FromStr;

use verifier::{
    address::ContractAddress,
    api::ApiClientError,
    config::NetworkTable,
    details::Network,
};

fn network_value_parser(raw: &str) -> Result<Network, String> {
    Network::from_str(raw)
        .map_err(|_| format!("Unknown network '{raw}', expected one of: testnet1, testnet2, mainnet"))
}

fn address_value_parser(raw: &str) -> Result<ContractAddress, String> {
    ContractAddress::new(raw).map_err(|e| e.to_string())
}

#[derive(clap::Parser)]
#[command(name = "verify-chat")]
#[command(version)]
#[command(about = "Verify smart contract source code on block explorers")]
#[command(long_about = "
An interactive assistant for verifying that the source code of a deployed
contract matches what is on chain. It walks through the contract address,
network, compiler type, license, source file and compiler version, then
submits everything to the explorer of the selected network.

API keys are read from TESTNET1_API_KEY, TESTNET2_API_KEY and MAINNET_API_KEY
unless given on the command line.

Examples:
  # Start the guided flow
  verify-chat

  # Check whether a contract is already verified
  verify-chat check --network mainnet \\
    --address 0x1111111111111111111111111111111111111111
")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub keys: ApiKeys,

    #[command(flatten)]
    pub endpoints: Endpoints,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Walk through a verification step by step (default)
    Chat,

    /// Check whether a contract is already verified
    ///
    /// Examples:
    ///   verify-chat check --network testnet2 --address 0x1111111111111111111111111111111111111111
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Network the contract is deployed on (testnet1, testnet2, mainnet)
    #[arg(long, value_parser = network_value_parser)]
    pub network: Network,

    /// Address of the deployed contract
    #[arg(long, value_name = "ADDRESS", value_parser = address_value_parser)]
    pub address: ContractAddress,
}

#[derive(clap::Args)]
pub struct ApiKeys {
    /// API key for the first testnet explorer
    #[arg(long, env = "TESTNET1_API_KEY", default_value = "", hide_env_values = true)]
    pub testnet1_api_key: String,

    /// API key for the second testnet explorer
    #[arg(long, env = "TESTNET2_API_KEY", default_value = "", hide_env_values = true)]
    pub testnet2_api_key: String,

    /// API key for the mainnet explorer
    #[arg(long, env = "MAINNET_API_KEY", default_value = "", hide_env_values = true)]
    pub mainnet_api_key: String,
}

#[derive(clap::Args)]
pub struct Endpoints {
    /// Override the first testnet explorer API URL
    #[arg(long, value_name = "URL", value_hint = clap::ValueHint::Url, value_parser = Url::parse)]
    pub testnet1_url: Option<Url>,

    /// Override the second testnet explorer API URL
    #[arg(long, value_name = "URL", value_hint = clap::ValueHint::Url, value_parser = Url::parse)]
    pub testnet2_url: Option<Url>,

    /// Override the mainnet explorer API URL
    #[arg(long, value_name = "URL", value_hint = clap::ValueHint::Url, value_parser = Url::parse)]
    pub mainnet_url: Option<Url>,
}

impl Args {
    /// The network table with keys and endpoint overrides applied.
    pub fn network_table(&self) -> Result<NetworkTable, ApiClientError> {
        let mut table = NetworkTable::with_keys(
            self.keys.testnet1_api_key.clone(),
            self.keys.testnet2_api_key.clone(),
            self.keys.mainnet_api_key.clone(),
        )?;

        let overrides = [
            (Network::Testnet1, &self.endpoints.testnet1_url),
            (Network::Testnet2, &self.endpoints.testnet2_url),
            (Network::Mainnet, &self.endpoints.mainnet_url),
        ];
        for (network, url) in overrides {
            if let Some(url) = url {
                log::debug!("Using {url} for {network}");
                table = table.with_api_base(network, url.clone());
            }
        }

        Ok(table)
    }
}
