// Re-export the API module components
pub use self::{
    client::ApiClient,
    errors::ApiClientError,
    explorer::{Explorer, ExplorerProvider},
    models::{AbiLookup, SourceSubmission, VerificationResult, CODE_FORMAT, STATUS_OK},
};

// Module declarations
mod client;
mod errors;
mod explorer;
mod models;
