//! Choices offered by the structured steps.

use strum::IntoEnumIterator;

use crate::details::{CompilerType, LicenseType, Network, DEFAULT_EVM_VERSION};

/// Supported Solidity releases, newest first.
pub const COMPILER_VERSIONS: &[&str] = &[
    "v0.8.24+commit.e11b9ed9",
    "v0.8.23+commit.f704f362",
    "v0.8.22+commit.4fc1097e",
    "v0.8.21+commit.d9974bed",
    "v0.8.20+commit.a1b79de6",
    "v0.8.19+commit.7dd6d404",
    "v0.8.18+commit.87f61d96",
    "v0.8.17+commit.8df45f5f",
    "v0.7.6+commit.7338295f",
    "v0.6.12+commit.27d51765",
];

/// EVM targets, newest first. The first one is the default.
pub const EVM_VERSIONS: &[&str] = &[
    DEFAULT_EVM_VERSION,
    "paris",
    "london",
    "berlin",
    "istanbul",
    "petersburg",
    "constantinople",
    "byzantium",
];

pub fn networks() -> Vec<Network> {
    Network::iter().collect()
}

pub fn compiler_types() -> Vec<CompilerType> {
    CompilerType::iter().collect()
}

pub fn licenses() -> Vec<LicenseType> {
    LicenseType::iter().collect()
}
