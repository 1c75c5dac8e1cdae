use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::details::VerificationDetails;

/// The only code format the explorer is ever told about. Multi-part and
/// Standard-JSON-Input selections are submitted under it as well.
pub const CODE_FORMAT: &str = "solidity-single-file";

/// Status value the explorer uses for success.
pub const STATUS_OK: &str = "1";
pub const STATUS_NOT_OK: &str = "0";

/// Answer of the verify-source-code endpoint, kept as the explorer sent it.
/// Only a `status` equal to the string `"1"` counts as success; any other
/// value, including a missing or non-string one, is a failed verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(default)]
    pub status: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        self.status.as_str() == Some(STATUS_OK)
    }
}

/// Answer of the verified-contract-ABI endpoint.
#[derive(Debug, Deserialize)]
pub struct AbiLookup {
    #[serde(default)]
    pub status: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
}

/// Explorer messages are meant to be strings; anything else is kept as its
/// JSON text and `null` becomes empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// JSON body of the verify-source-code request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSubmission<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractaddress: Option<&'a str>,
    #[serde(rename = "sourceCode", skip_serializing_if = "Option::is_none")]
    pub source_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compilerversion: Option<&'a str>,
    pub codeformat: &'static str,
    pub evmversion: &'a str,
}

impl<'a> From<&'a VerificationDetails> for SourceSubmission<'a> {
    fn from(details: &'a VerificationDetails) -> Self {
        let address = details.address.as_ref().map(AsRef::as_ref);

        Self {
            address,
            contractaddress: address,
            source_code: details.source_code.as_deref(),
            contractname: details.contract_name.as_deref(),
            compilerversion: details.compiler_version.as_deref(),
            codeformat: CODE_FORMAT,
            evmversion: details.evm_version(),
        }
    }
}
