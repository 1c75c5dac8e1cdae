//! # Contract Verifier
//!
//! A Rust library for guiding a user through verifying the source code of
//! a deployed smart contract on a block explorer.
//!
//! ## Features
//!
//! - **Guided Flow**: A six step session collecting address, network,
//!   compiler type, license, source and compiler version
//! - **Multi-network Support**: Two testnets and a mainnet, each with its own
//!   endpoints and API key
//! - **Conversation Log**: Every prompt, answer and remote result is kept in
//!   an append-only log for the caller to render
//! - **Error Handling**: Comprehensive error types with actionable suggestions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use verifier::{
//!     config::NetworkTable,
//!     details::{DetailsUpdate, Network},
//!     session::VerificationSession,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let networks = NetworkTable::with_keys("key1", "key2", "key3")?;
//! let mut session = VerificationSession::new(networks);
//!
//! session.send_user_input("0x1111111111111111111111111111111111111111");
//! session.update_details(DetailsUpdate::network(Network::Mainnet))?;
//! let outcome = session.continue_step()?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

/// Validated contract addresses
pub mod address;

/// Explorer API client and wire types
pub mod api;

/// Choices offered by the structured steps
pub mod catalog;

/// Per-network endpoints and credentials
pub mod config;

/// Append-only record of the exchange with the user
pub mod conversation;

/// The verification record and its enumerations
pub mod details;

/// Comprehensive error types with actionable suggestions
pub mod errors;

/// The guided verification state machine
pub mod session;
