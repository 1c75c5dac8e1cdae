use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::address::ContractAddress;

/// EVM version submitted when the user doesn't pick one.
pub const DEFAULT_EVM_VERSION: &str = "shanghai";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
    Testnet1,
    Testnet2,
    Mainnet,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum CompilerType {
    #[serde(rename = "solidity-single")]
    #[strum(serialize = "solidity-single")]
    SoliditySingle,
    #[serde(rename = "solidity-multi")]
    #[strum(serialize = "solidity-multi")]
    SolidityMulti,
    #[serde(rename = "solidity-json")]
    #[strum(serialize = "solidity-json")]
    SolidityJson,
}

impl CompilerType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoliditySingle => "Solidity (Single file)",
            Self::SolidityMulti => "Solidity (Multi-Part files)",
            Self::SolidityJson => "Solidity (Standard-Json-Input)",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum LicenseType {
    #[serde(rename = "None")]
    #[strum(serialize = "None")]
    NoLicense,
    Unlicense,
    #[serde(rename = "MIT")]
    #[strum(serialize = "MIT")]
    Mit,
    #[serde(rename = "GNU GPLv2")]
    #[strum(serialize = "GNU GPLv2")]
    GplV2,
    #[serde(rename = "GNU GPLv3")]
    #[strum(serialize = "GNU GPLv3")]
    GplV3,
    #[serde(rename = "GNU LGPLv2.1")]
    #[strum(serialize = "GNU LGPLv2.1")]
    LgplV2_1,
    #[serde(rename = "GNU LGPLv3")]
    #[strum(serialize = "GNU LGPLv3")]
    LgplV3,
    #[serde(rename = "BSD-2-Clause")]
    #[strum(serialize = "BSD-2-Clause")]
    Bsd2Clause,
    #[serde(rename = "BSD-3-Clause")]
    #[strum(serialize = "BSD-3-Clause")]
    Bsd3Clause,
    #[serde(rename = "MPL-2.0")]
    #[strum(serialize = "MPL-2.0")]
    Mpl2,
    #[serde(rename = "OSL-3.0")]
    #[strum(serialize = "OSL-3.0")]
    Osl3,
    #[serde(rename = "Apache-2.0")]
    #[strum(serialize = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GNU AGPLv3")]
    #[strum(serialize = "GNU AGPLv3")]
    AgplV3,
}

impl LicenseType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoLicense => "No License (None)",
            Self::Unlicense => "The Unlicense (Unlicense)",
            Self::Mit => "MIT License (MIT)",
            Self::GplV2 => "GNU General Public License v2.0 (GNU GPLv2)",
            Self::GplV3 => "GNU General Public License v3.0 (GNU GPLv3)",
            Self::LgplV2_1 => "GNU Lesser General Public License v2.1 (GNU LGPLv2.1)",
            Self::LgplV3 => "GNU Lesser General Public License v3.0 (GNU LGPLv3)",
            Self::Bsd2Clause => "BSD 2-clause \"Simplified\" license (BSD-2-Clause)",
            Self::Bsd3Clause => "BSD 3-clause \"New\" Or \"Revised\" license (BSD-3-Clause)",
            Self::Mpl2 => "Mozilla Public License 2.0 (MPL-2.0)",
            Self::Osl3 => "Open Software License 3.0 (OSL-3.0)",
            Self::Apache2 => "Apache 2.0 (Apache-2.0)",
            Self::AgplV3 => "GNU Affero General Public License (GNU AGPLv3)",
        }
    }
}

/// Everything collected from the user so far. Fields fill up in step
/// order; the session is what keeps them in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationDetails {
    pub address: Option<ContractAddress>,
    pub network: Option<Network>,
    pub compiler_type: Option<CompilerType>,
    pub license_type: Option<LicenseType>,
    pub source_code: Option<String>,
    pub contract_name: Option<String>,
    pub compiler_version: Option<String>,
    pub evm_version: Option<String>,
}

impl VerificationDetails {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn evm_version(&self) -> &str {
        self.evm_version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_EVM_VERSION)
    }

    pub fn has_source(&self) -> bool {
        is_filled(self.source_code.as_deref()) && is_filled(self.contract_name.as_deref())
    }

    pub fn has_compiler_version(&self) -> bool {
        is_filled(self.compiler_version.as_deref())
    }

    /// Merges `update` into the record, later values winning.
    pub fn apply(&mut self, update: DetailsUpdate) {
        let DetailsUpdate {
            network,
            compiler_type,
            license_type,
            source_code,
            contract_name,
            compiler_version,
            evm_version,
        } = update;

        if network.is_some() {
            self.network = network;
        }
        if compiler_type.is_some() {
            self.compiler_type = compiler_type;
        }
        if license_type.is_some() {
            self.license_type = license_type;
        }
        if source_code.is_some() {
            self.source_code = source_code;
        }
        if contract_name.is_some() {
            self.contract_name = contract_name;
        }
        if compiler_version.is_some() {
            self.compiler_version = compiler_version;
        }
        if evm_version.is_some() {
            self.evm_version = evm_version;
        }
    }
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Partial update coming from the structured steps. The address is not
/// part of it: it only ever arrives as a free-text message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsUpdate {
    pub network: Option<Network>,
    pub compiler_type: Option<CompilerType>,
    pub license_type: Option<LicenseType>,
    pub source_code: Option<String>,
    pub contract_name: Option<String>,
    pub compiler_version: Option<String>,
    pub evm_version: Option<String>,
}

impl DetailsUpdate {
    pub fn network(network: Network) -> Self {
        Self {
            network: Some(network),
            ..Self::default()
        }
    }

    pub fn compiler_type(compiler_type: CompilerType) -> Self {
        Self {
            compiler_type: Some(compiler_type),
            ..Self::default()
        }
    }

    pub fn license_type(license_type: LicenseType) -> Self {
        Self {
            license_type: Some(license_type),
            ..Self::default()
        }
    }

    pub fn source(contract_name: impl Into<String>, source_code: impl Into<String>) -> Self {
        Self {
            contract_name: Some(contract_name.into()),
            source_code: Some(source_code.into()),
            ..Self::default()
        }
    }

    pub fn compiler(compiler_version: impl Into<String>, evm_version: Option<String>) -> Self {
        Self {
            compiler_version: Some(compiler_version.into()),
            evm_version,
            ..Self::default()
        }
    }
}
