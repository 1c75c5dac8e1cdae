//! The guided verification flow.
//!
//! A [`VerificationSession`] collects the details of one verification
//! request step by step, talks to the explorer of the selected network
//! when a step needs it, and records the whole exchange in a
//! [`ConversationLog`]. Rendering that log is left to the caller.

mod step;

#[cfg(test)]
mod tests;

pub use self::step::Step;

use serde_json::json;

use crate::address::ContractAddress;
use crate::api::{Explorer, ExplorerProvider, VerificationResult};
use crate::conversation::{ConversationEntry, ConversationLog};
use crate::details::{CompilerType, DetailsUpdate, Network, VerificationDetails};
use crate::errors::SessionError;

pub const WELCOME: &str = "Hi there! I'll help you verify your smart contract's source code on the blockchain. To get started, please enter your contract address.";
pub const INVALID_ADDRESS: &str = "That doesn't look like a valid contract address. Please enter a valid address starting with '0x'.";
pub const MULTI_PART_ADVICE: &str = "Recommendation for multi-part files:\n  • Consider flattening your contract into a single file\n  • Or use the Standard-JSON-Input format for better organization";
pub const STARTING: &str = "Starting verification process...";
pub const FAILED: &str =
    "Verification failed. Please check the error message and try again with the correct details.";
pub const NETWORK_CHANGED: &str =
    "The network changed, so I need to check the contract again. Please continue with the selected network.";
pub const RESTART: &str = "Let's start again. Please enter your contract address.";

/// What a single user action did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The session moved to this step.
    Advanced(Step),
    /// The free-text input didn't validate; nothing was stored.
    Rejected,
    /// Continue was requested before the current step was complete.
    NotReady,
    /// The contract is already verified on the selected network. The
    /// session stays on the network step.
    AlreadyVerified { explorer_url: String },
    /// The input isn't accepted at the current step.
    Ignored,
    /// A verification is in flight.
    Busy,
    /// The explorer accepted the source. The session has been reset.
    Verified(VerificationResult),
    /// The explorer rejected the source. Details are kept for a retry.
    Failed(VerificationResult),
}

struct BoundExplorer<C> {
    network: Network,
    client: C,
}

pub struct VerificationSession<P: ExplorerProvider> {
    provider: P,
    explorer: Option<BoundExplorer<P::Client>>,
    details: VerificationDetails,
    step: Step,
    log: ConversationLog,
    last_result: Option<VerificationResult>,
    verifying: bool,
}

impl<P: ExplorerProvider> VerificationSession<P> {
    pub fn new(provider: P) -> Self {
        let mut log = ConversationLog::new();
        log.push_bot(WELCOME);

        Self {
            provider,
            explorer: None,
            details: VerificationDetails::default(),
            step: Step::FIRST,
            log,
            last_result: None,
            verifying: false,
        }
    }

    pub const fn current_step(&self) -> Step {
        self.step
    }

    pub fn messages(&self) -> &[ConversationEntry] {
        self.log.entries()
    }

    pub const fn conversation(&self) -> &ConversationLog {
        &self.log
    }

    pub const fn details(&self) -> &VerificationDetails {
        &self.details
    }

    pub const fn is_verifying(&self) -> bool {
        self.verifying
    }

    pub const fn last_result(&self) -> Option<&VerificationResult> {
        self.last_result.as_ref()
    }

    /// Browser link for the collected address on the bound network.
    pub fn explorer_url(&self) -> Option<String> {
        let bound = self.explorer.as_ref()?;
        let address = self.details.address.as_ref()?;
        Some(bound.client.browser_url(address))
    }

    /// Whether everything up to and including the current step is filled.
    pub fn is_ready(&self) -> bool {
        let details = &self.details;
        let filled = |step: Step| match step {
            Step::AwaitingAddress => details.address.is_some(),
            Step::AwaitingNetwork => details.network.is_some(),
            Step::AwaitingCompilerType => details.compiler_type.is_some(),
            Step::AwaitingLicense => details.license_type.is_some(),
            Step::AwaitingSource => details.has_source(),
            Step::AwaitingCompiler => details.has_compiler_version(),
        };

        let mut step = Some(Step::FIRST);
        while let Some(current) = step.filter(|s| *s <= self.step) {
            if !filled(current) {
                return false;
            }
            step = current.next();
        }
        true
    }

    pub fn can_continue(&self) -> bool {
        !self.verifying && self.is_ready()
    }

    /// Free-text input. Only the address step takes it.
    pub fn send_user_input(&mut self, text: &str) -> StepOutcome {
        if self.step != Step::AwaitingAddress {
            log::debug!("Ignoring free text at step {}", self.step);
            return StepOutcome::Ignored;
        }

        if let Some(address) = &self.details.address {
            // Set once; going back to step 1 doesn't reopen it
            self.log.push_user(text.trim());
            self.log.push_bot(format!(
                "The contract address is already set to {address}. Continue with it, or start over to verify a different contract."
            ));
            return StepOutcome::Rejected;
        }

        match ContractAddress::new(text) {
            Ok(address) => {
                log::debug!("Accepted contract address {address}");
                self.log.push_user(address.as_ref());
                self.details.address = Some(address);
                self.advance()
            }
            Err(e) => {
                log::debug!("{e}");
                self.log.push_user(text);
                self.log.push_bot(INVALID_ADDRESS);
                StepOutcome::Rejected
            }
        }
    }

    /// Merges a partial update from the structured steps. A field can
    /// only be set once the session has reached the step that asks for
    /// it. Selecting a different network rebinds the explorer client and,
    /// past the network step, returns the session to it. Later fields are
    /// kept.
    ///
    /// # Errors
    ///
    /// `OutOfOrder` if a field belongs to a later step, or the provider's
    /// error if no client can be built for the new network.
    pub fn update_details(&mut self, update: DetailsUpdate) -> Result<(), SessionError> {
        let owners = [
            (update.network.is_some(), "network", Step::AwaitingNetwork),
            (
                update.compiler_type.is_some(),
                "compiler type",
                Step::AwaitingCompilerType,
            ),
            (
                update.license_type.is_some(),
                "license type",
                Step::AwaitingLicense,
            ),
            (
                update.contract_name.is_some(),
                "contract name",
                Step::AwaitingSource,
            ),
            (
                update.source_code.is_some(),
                "source code",
                Step::AwaitingSource,
            ),
            (
                update.compiler_version.is_some(),
                "compiler version",
                Step::AwaitingCompiler,
            ),
            (
                update.evm_version.is_some(),
                "EVM version",
                Step::AwaitingCompiler,
            ),
        ];

        if let Some((_, field, _)) = owners
            .iter()
            .find(|(present, _, owner)| *present && *owner > self.step)
        {
            return Err(SessionError::OutOfOrder {
                field: *field,
                step: self.step,
            });
        }

        let changed_network = update
            .network
            .filter(|network| self.details.network != Some(*network));
        if let Some(network) = update.network {
            self.bind(network)?;
        }

        self.details.apply(update);

        // The already-verified check has to run again for the new network
        if let (Some(network), true) = (changed_network, self.step > Step::AwaitingNetwork) {
            log::debug!("Network changed to {network} at step {}", self.step);
            self.step = Step::AwaitingNetwork;
            self.log.push_bot(NETWORK_CHANGED);
        }
        Ok(())
    }

    /// The continue action of the structured steps.
    ///
    /// # Errors
    ///
    /// Remote failures while checking or submitting. They are also logged
    /// as bot entries; the session itself is left as it was.
    pub fn continue_step(&mut self) -> Result<StepOutcome, SessionError> {
        if self.verifying {
            return Ok(StepOutcome::Busy);
        }

        if !self.is_ready() {
            self.log.push_bot(self.step.reprompt());
            return Ok(StepOutcome::NotReady);
        }

        match self.step {
            Step::AwaitingAddress => Ok(self.advance()),
            Step::AwaitingNetwork => self.check_network(),
            Step::AwaitingCompilerType => {
                let compiler_type = self
                    .details
                    .compiler_type
                    .ok_or(SessionError::Incomplete(self.step))?;
                self.log.push_user(format!("Compiler type: {compiler_type}"));
                if compiler_type == CompilerType::SolidityMulti {
                    self.log.push_bot(MULTI_PART_ADVICE);
                }
                Ok(self.advance())
            }
            Step::AwaitingLicense => {
                let license_type = self
                    .details
                    .license_type
                    .ok_or(SessionError::Incomplete(self.step))?;
                self.log.push_user(format!("License type: {license_type}"));
                Ok(self.advance())
            }
            Step::AwaitingSource => {
                let name = self.details.contract_name.as_deref().unwrap_or_default();
                self.log.push_user(format!("Source code for {name} provided"));
                Ok(self.advance())
            }
            Step::AwaitingCompiler => {
                let version = self.details.compiler_version.as_deref().unwrap_or_default();
                self.log.push_user(format!(
                    "Using compiler: {version}, EVM: {}",
                    self.details.evm_version()
                ));
                self.submit()
            }
        }
    }

    /// Moves one step back without touching collected details. Refused
    /// on the first step and while a verification is in flight.
    pub fn back(&mut self) -> bool {
        if self.verifying {
            return false;
        }

        match self.step.previous() {
            Some(previous) => {
                log::debug!("Back from step {} to {}", self.step, previous);
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Clears the collected details and the last result and returns to
    /// the address step. The log is kept and gets a restart prompt.
    pub fn reset(&mut self) {
        self.details = VerificationDetails::default();
        self.last_result = None;
        self.explorer = None;
        self.step = Step::FIRST;
        self.log.push_bot(RESTART);
    }

    fn advance(&mut self) -> StepOutcome {
        match self.step.next() {
            Some(next) => {
                self.log.push_bot(next.prompt());
                self.step = next;
                StepOutcome::Advanced(next)
            }
            None => StepOutcome::Ignored,
        }
    }

    fn bind(&mut self, network: Network) -> Result<(), SessionError> {
        if self.explorer.as_ref().map(|bound| bound.network) == Some(network) {
            return Ok(());
        }

        let client = self.provider.client_for(network)?;
        self.explorer = Some(BoundExplorer { network, client });
        Ok(())
    }

    fn check_network(&mut self) -> Result<StepOutcome, SessionError> {
        let network = self
            .details
            .network
            .ok_or(SessionError::Incomplete(self.step))?;
        let address = self
            .details
            .address
            .clone()
            .ok_or(SessionError::Incomplete(self.step))?;

        self.log.push_user(format!("Selected network: {network}"));
        self.bind(network)?;

        let bound = self.explorer.as_ref().ok_or(SessionError::NoExplorer)?;
        let checked = bound.client.is_verified(&address);
        let explorer_url = bound.client.browser_url(&address);

        match checked {
            Ok(true) => {
                self.log.push_bot(format!(
                    "This contract is already verified. You can view it on the block explorer: {explorer_url}"
                ));
                Ok(StepOutcome::AlreadyVerified { explorer_url })
            }
            Ok(false) => Ok(self.advance()),
            Err(e) => {
                log::error!("Error checking contract verification: {e}");
                self.log.push_bot(format!(
                    "Could not check whether the contract is already verified: {e}"
                ));
                Err(SessionError::from(e))
            }
        }
    }

    fn submit(&mut self) -> Result<StepOutcome, SessionError> {
        let network = self
            .details
            .network
            .ok_or(SessionError::Incomplete(self.step))?;
        self.bind(network)?;
        let bound = self.explorer.as_ref().ok_or(SessionError::NoExplorer)?;

        self.verifying = true;
        self.log.push_bot(STARTING);

        let submitted = bound.client.verify_contract(&self.details);
        let explorer_url = self
            .details
            .address
            .as_ref()
            .map(|address| bound.client.browser_url(address));

        self.verifying = false;

        let result = match submitted {
            Ok(result) => result,
            Err(e) => {
                log::error!("Error during verification: {e}");
                self.log.push_bot(format!("Verification error: {e}"));
                return Err(SessionError::from(e));
            }
        };

        self.last_result = Some(result.clone());
        self.log
            .push_structured(result_summary(&result, explorer_url.as_deref()));

        if result.is_success() {
            log::info!("Verification of {network} contract succeeded");
            self.log.push_bot(match &explorer_url {
                Some(url) => format!("Verification successful! You can view your verified contract on the block explorer: {url}. Would you like to verify another contract?"),
                None => "Verification successful! Would you like to verify another contract?".to_owned(),
            });
            self.reset();
            Ok(StepOutcome::Verified(result))
        } else {
            log::warn!(
                "Verification rejected with status {}: {}",
                result.status,
                result.message
            );
            self.log.push_bot(FAILED);
            Ok(StepOutcome::Failed(result))
        }
    }
}

/// Renderable summary of an explorer answer. The link is only attached
/// when the verification went through.
fn result_summary(result: &VerificationResult, explorer_url: Option<&str>) -> serde_json::Value {
    let success = result.is_success();
    let mut summary = json!({
        "status": result.status,
        "message": result.message,
        "result": result.result,
        "success": success,
    });

    if let (true, Some(url)) = (success, explorer_url) {
        summary["explorer_url"] = json!(url);
    }

    summary
}
