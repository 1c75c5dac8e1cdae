use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContractAddress(String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("[E010] {0} is not a valid contract address\n\nSuggestions:\n  • Expected format: 0x followed by 40 characters\n  • Example: 0x1111111111111111111111111111111111111111\n  • Check that the address starts with '0x'")]
    Match(String),
}

impl AddressError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Match(_) => "E010",
        }
    }
}

impl ContractAddress {
    pub const PREFIX: &'static str = "0x";
    pub const LENGTH: usize = 42;

    /// Surrounding whitespace is ignored. Only the `0x` prefix and the
    /// total length are checked; the body is not required to be hex. The
    /// length is counted in UTF-16 code units, so a character outside the
    /// Basic Multilingual Plane counts twice.
    ///
    /// # Errors
    ///
    /// Will fail if `raw` doesn't start with "0x" or isn't exactly 42
    /// characters long.
    pub fn new(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();

        if trimmed.starts_with(Self::PREFIX) && trimmed.encode_utf16().count() == Self::LENGTH {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(AddressError::Match(trimmed.to_owned()))
        }
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContractAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
