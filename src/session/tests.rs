use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use url::Url;

use super::*;
use crate::api::ApiClientError;
use crate::conversation::{Content, Role};
use crate::details::LicenseType;
use crate::errors::RequestFailure;

const ADDRESS: &str = "0x1111111111111111111111111111111111111111";

#[derive(Clone)]
enum Lookup {
    Verified,
    NotVerified,
    Fails,
}

#[derive(Clone)]
enum Submission {
    Answers(&'static str, &'static str),
    Fails,
}

#[derive(Default)]
struct Recorder {
    bound: Vec<Network>,
    lookups: usize,
    submitted: Vec<VerificationDetails>,
}

struct FakeExplorer {
    network: Network,
    lookup: Lookup,
    submission: Submission,
    recorder: Rc<RefCell<Recorder>>,
}

fn upstream_error() -> ApiClientError {
    ApiClientError::from(RequestFailure::new(
        Url::parse("https://api.test.example/api/contracts?apikey=secret").unwrap(),
        StatusCode::BAD_GATEWAY,
        "upstream down",
    ))
}

impl Explorer for FakeExplorer {
    fn is_verified(&self, _address: &ContractAddress) -> Result<bool, ApiClientError> {
        self.recorder.borrow_mut().lookups += 1;
        match self.lookup {
            Lookup::Verified => Ok(true),
            Lookup::NotVerified => Ok(false),
            Lookup::Fails => Err(upstream_error()),
        }
    }

    fn verify_contract(
        &self,
        details: &VerificationDetails,
    ) -> Result<VerificationResult, ApiClientError> {
        self.recorder.borrow_mut().submitted.push(details.clone());
        match self.submission {
            Submission::Answers(status, message) => Ok(VerificationResult {
                status: status.into(),
                message: message.to_owned(),
                result: serde_json::Value::Null,
            }),
            Submission::Fails => Err(upstream_error()),
        }
    }

    fn browser_url(&self, address: &ContractAddress) -> String {
        format!("https://scan.{}.example/address/{address}", self.network)
    }
}

struct FakeProvider {
    lookup: Lookup,
    submission: Submission,
    recorder: Rc<RefCell<Recorder>>,
}

impl ExplorerProvider for FakeProvider {
    type Client = FakeExplorer;

    fn client_for(&self, network: Network) -> Result<FakeExplorer, ApiClientError> {
        self.recorder.borrow_mut().bound.push(network);
        Ok(FakeExplorer {
            network,
            lookup: self.lookup.clone(),
            submission: self.submission.clone(),
            recorder: Rc::clone(&self.recorder),
        })
    }
}

fn session(
    lookup: Lookup,
    submission: Submission,
) -> (VerificationSession<FakeProvider>, Rc<RefCell<Recorder>>) {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let provider = FakeProvider {
        lookup,
        submission,
        recorder: Rc::clone(&recorder),
    };
    (VerificationSession::new(provider), recorder)
}

fn default_session() -> VerificationSession<FakeProvider> {
    session(Lookup::NotVerified, Submission::Answers("1", "OK")).0
}

fn bot_texts(session: &VerificationSession<FakeProvider>) -> Vec<&str> {
    session
        .messages()
        .iter()
        .filter(|entry| entry.role == Role::Bot)
        .filter_map(|entry| entry.content.as_text())
        .collect()
}

fn count_text(session: &VerificationSession<FakeProvider>, needle: &str) -> usize {
    bot_texts(session)
        .iter()
        .filter(|text| text.contains(needle))
        .count()
}

/// Walks the session up to the compiler step with the given compiler type.
fn walk_to_compiler_step(
    session: &mut VerificationSession<FakeProvider>,
    compiler_type: CompilerType,
) {
    assert_eq!(
        session.send_user_input(ADDRESS),
        StepOutcome::Advanced(Step::AwaitingNetwork)
    );
    session
        .update_details(DetailsUpdate::network(Network::Mainnet))
        .unwrap();
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingCompilerType)
    );
    session
        .update_details(DetailsUpdate::compiler_type(compiler_type))
        .unwrap();
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingLicense)
    );
    session
        .update_details(DetailsUpdate::license_type(LicenseType::Mit))
        .unwrap();
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingSource)
    );
    session
        .update_details(DetailsUpdate::source("Token", "contract Token {}"))
        .unwrap();
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingCompiler)
    );
    session
        .update_details(DetailsUpdate::compiler("v0.8.24+commit.e11b9ed9", None))
        .unwrap();
}

#[test_log::test]
fn test_new_session_greets() {
    let session = default_session();

    assert_eq!(session.current_step(), Step::AwaitingAddress);
    assert_eq!(bot_texts(&session), vec![WELCOME]);
    assert!(!session.is_verifying());
    assert!(session.last_result().is_none());
    assert!(session.details().is_empty());
}

#[test_log::test]
fn test_valid_address_advances() {
    let mut session = default_session();

    let outcome = session.send_user_input(ADDRESS);

    assert_eq!(outcome, StepOutcome::Advanced(Step::AwaitingNetwork));
    assert_eq!(session.details().address.as_ref().unwrap().as_ref(), ADDRESS);
    let last = session.messages().last().unwrap();
    assert_eq!(
        last.content.as_text(),
        Some(Step::AwaitingNetwork.prompt())
    );
}

#[test_log::test]
fn test_invalid_addresses_are_rejected() {
    let inputs = [
        "0x123",
        "",
        "1111111111111111111111111111111111111111xx",
        "0x11111111111111111111111111111111111111111",
    ];

    for input in inputs {
        let mut session = default_session();
        let before = session.messages().len();

        assert_eq!(session.send_user_input(input), StepOutcome::Rejected);
        assert_eq!(session.current_step(), Step::AwaitingAddress);
        assert!(session.details().address.is_none());

        let appended = &session.messages()[before..];
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].role, Role::User);
        assert_eq!(appended[1].content.as_text(), Some(INVALID_ADDRESS));
    }
}

#[test_log::test]
fn test_free_text_ignored_after_address_step() {
    let mut session = default_session();
    session.send_user_input(ADDRESS);
    let before = session.messages().len();

    assert_eq!(session.send_user_input("hello"), StepOutcome::Ignored);
    assert_eq!(session.messages().len(), before);
    assert_eq!(session.current_step(), Step::AwaitingNetwork);
}

#[test_log::test]
fn test_address_is_immutable_once_set() {
    let mut session = default_session();
    session.send_user_input(ADDRESS);
    assert!(session.back());

    let other = "0x2222222222222222222222222222222222222222";
    assert_eq!(session.send_user_input(other), StepOutcome::Rejected);
    assert_eq!(session.details().address.as_ref().unwrap().as_ref(), ADDRESS);

    // Continue still works with the stored address
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingNetwork)
    );
}

#[test_log::test]
fn test_continue_without_selection_reprompts() {
    let mut session = default_session();
    session.send_user_input(ADDRESS);
    let before = session.messages().len();

    assert_eq!(session.continue_step().unwrap(), StepOutcome::NotReady);
    assert_eq!(session.current_step(), Step::AwaitingNetwork);
    assert_eq!(session.messages().len(), before + 1);
    assert_eq!(
        session.messages().last().unwrap().content.as_text(),
        Some(Step::AwaitingNetwork.reprompt())
    );
}

#[test_log::test]
fn test_fields_cannot_skip_ahead() {
    let mut session = default_session();
    session.send_user_input(ADDRESS);

    let error = session
        .update_details(DetailsUpdate::license_type(LicenseType::Mit))
        .unwrap_err();
    assert!(matches!(
        error,
        SessionError::OutOfOrder {
            field: "license type",
            step: Step::AwaitingNetwork
        }
    ));
    assert!(session.details().license_type.is_none());
}

#[test_log::test]
fn test_network_not_verified_advances_without_notice() {
    let (mut session, recorder) = session(Lookup::NotVerified, Submission::Answers("1", "OK"));
    session.send_user_input(ADDRESS);
    session
        .update_details(DetailsUpdate::network(Network::Mainnet))
        .unwrap();

    let outcome = session.continue_step().unwrap();

    assert_eq!(outcome, StepOutcome::Advanced(Step::AwaitingCompilerType));
    assert_eq!(count_text(&session, "already verified"), 0);
    assert_eq!(recorder.borrow().lookups, 1);
    assert_eq!(recorder.borrow().bound, vec![Network::Mainnet]);
    assert!(session
        .messages()
        .iter()
        .any(|e| e.role == Role::User
            && e.content.as_text() == Some("Selected network: mainnet")));
}

#[test_log::test]
fn test_already_verified_holds_the_step() {
    let (mut session, _) = session(Lookup::Verified, Submission::Answers("1", "OK"));
    session.send_user_input(ADDRESS);
    session
        .update_details(DetailsUpdate::network(Network::Testnet2))
        .unwrap();

    let outcome = session.continue_step().unwrap();

    let expected_url = format!("https://scan.testnet2.example/address/{ADDRESS}");
    assert_eq!(
        outcome,
        StepOutcome::AlreadyVerified {
            explorer_url: expected_url.clone()
        }
    );
    assert_eq!(session.current_step(), Step::AwaitingNetwork);
    assert_eq!(count_text(&session, "already verified"), 1);
    assert_eq!(session.explorer_url(), Some(expected_url));
}

#[test_log::test]
fn test_lookup_failure_is_logged_and_propagated() {
    let (mut session, _) = session(Lookup::Fails, Submission::Answers("1", "OK"));
    session.send_user_input(ADDRESS);
    session
        .update_details(DetailsUpdate::network(Network::Testnet1))
        .unwrap();

    let error = session.continue_step().unwrap_err();

    assert!(matches!(error, SessionError::Api(ApiClientError::Failure(_))));
    assert_eq!(session.current_step(), Step::AwaitingNetwork);
    let last = session.messages().last().unwrap();
    assert_eq!(last.role, Role::Bot);
    let text = last.content.as_text().unwrap();
    assert!(text.contains("upstream down"));
    assert!(!text.contains("secret"));
}

#[test_log::test]
fn test_network_change_rebinds_client() {
    let (mut session, recorder) = session(Lookup::NotVerified, Submission::Answers("1", "OK"));
    session.send_user_input(ADDRESS);
    session
        .update_details(DetailsUpdate::network(Network::Testnet1))
        .unwrap();
    session
        .update_details(DetailsUpdate::network(Network::Testnet1))
        .unwrap();
    session
        .update_details(DetailsUpdate::network(Network::Mainnet))
        .unwrap();

    assert_eq!(
        recorder.borrow().bound,
        vec![Network::Testnet1, Network::Mainnet]
    );
    assert_eq!(
        session.explorer_url(),
        Some(format!("https://scan.mainnet.example/address/{ADDRESS}"))
    );
}

#[test_log::test]
fn test_network_change_late_rechecks_verification() {
    let (mut session, recorder) = session(Lookup::NotVerified, Submission::Answers("1", "OK"));
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);
    assert_eq!(recorder.borrow().lookups, 1);

    session
        .update_details(DetailsUpdate::network(Network::Testnet1))
        .unwrap();

    assert_eq!(session.current_step(), Step::AwaitingNetwork);
    assert_eq!(
        session.messages().last().unwrap().content.as_text(),
        Some(NETWORK_CHANGED)
    );
    assert!(session.details().has_compiler_version());

    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingCompilerType)
    );
    assert_eq!(recorder.borrow().lookups, 2);

    // The later answers are kept, so the remaining steps go straight through
    for _ in 0..3 {
        session.continue_step().unwrap();
    }
    assert_eq!(session.current_step(), Step::AwaitingCompiler);
    assert!(matches!(
        session.continue_step().unwrap(),
        StepOutcome::Verified(_)
    ));

    let recorder = recorder.borrow();
    assert_eq!(recorder.submitted[0].network, Some(Network::Testnet1));
}

#[test_log::test]
fn test_same_network_keeps_the_step() {
    let mut session = default_session();
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);

    session
        .update_details(DetailsUpdate::network(Network::Mainnet))
        .unwrap();

    assert_eq!(session.current_step(), Step::AwaitingCompiler);
    assert_eq!(count_text(&session, NETWORK_CHANGED), 0);
}

#[test_log::test]
fn test_multi_part_advice_only_for_multi() {
    for compiler_type in [
        CompilerType::SoliditySingle,
        CompilerType::SolidityMulti,
        CompilerType::SolidityJson,
    ] {
        let mut session = default_session();
        walk_to_compiler_step(&mut session, compiler_type);

        let expected = usize::from(compiler_type == CompilerType::SolidityMulti);
        assert_eq!(count_text(&session, "multi-part files"), expected);

        if expected == 1 {
            // The advice comes right before the license prompt
            let texts = bot_texts(&session);
            let advice = texts.iter().position(|t| *t == MULTI_PART_ADVICE).unwrap();
            assert_eq!(texts[advice + 1], Step::AwaitingLicense.prompt());
        }
    }
}

#[test_log::test]
fn test_source_step_requires_both_fields() {
    let mut session = default_session();
    session.send_user_input(ADDRESS);
    session
        .update_details(DetailsUpdate::network(Network::Mainnet))
        .unwrap();
    session.continue_step().unwrap();
    session
        .update_details(DetailsUpdate::compiler_type(CompilerType::SoliditySingle))
        .unwrap();
    session.continue_step().unwrap();
    session
        .update_details(DetailsUpdate::license_type(LicenseType::Apache2))
        .unwrap();
    session.continue_step().unwrap();

    session
        .update_details(DetailsUpdate {
            contract_name: Some("Token".to_string()),
            ..DetailsUpdate::default()
        })
        .unwrap();
    assert_eq!(session.continue_step().unwrap(), StepOutcome::NotReady);
    assert_eq!(
        session.messages().last().unwrap().content.as_text(),
        Some("Please provide both the contract name and source code before continuing.")
    );

    session
        .update_details(DetailsUpdate {
            source_code: Some("contract Token {}".to_string()),
            ..DetailsUpdate::default()
        })
        .unwrap();
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingCompiler)
    );
}

#[test_log::test]
fn test_back_keeps_fields() {
    let mut session = default_session();
    assert!(!session.back());

    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);
    let details = session.details().clone();

    assert!(session.back());
    assert_eq!(session.current_step(), Step::AwaitingSource);
    assert_eq!(session.details(), &details);

    // Still complete, so continue moves forward again
    assert!(session.is_ready());
    assert_eq!(
        session.continue_step().unwrap(),
        StepOutcome::Advanced(Step::AwaitingCompiler)
    );
}

#[test_log::test]
fn test_back_stops_at_first_step() {
    let mut session = default_session();
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);

    let mut steps = vec![];
    while session.back() {
        steps.push(session.current_step().number());
    }

    assert_eq!(steps, vec![5, 4, 3, 2, 1]);
    assert_eq!(session.current_step(), Step::AwaitingAddress);
}

#[test_log::test]
fn test_successful_verification_resets() {
    let (mut session, recorder) = session(Lookup::NotVerified, Submission::Answers("1", "OK"));
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);

    let outcome = session.continue_step().unwrap();

    assert!(matches!(&outcome, StepOutcome::Verified(result) if result.message == "OK"));
    assert_eq!(session.current_step(), Step::AwaitingAddress);
    assert!(session.details().is_empty());
    assert!(session.last_result().is_none());
    assert!(!session.is_verifying());

    assert_eq!(count_text(&session, STARTING), 1);
    assert_eq!(count_text(&session, "Verification successful!"), 1);
    assert_eq!(
        session.messages().last().unwrap().content.as_text(),
        Some(RESTART)
    );

    let url = format!("https://scan.mainnet.example/address/{ADDRESS}");
    let summary = session
        .messages()
        .iter()
        .find_map(|e| match &e.content {
            Content::Structured(value) => Some(value.clone()),
            Content::Text(_) => None,
        })
        .unwrap();
    assert_eq!(summary["status"], "1");
    assert_eq!(summary["explorer_url"], url.as_str());
    assert_eq!(count_text(&session, &url), 1);

    let recorder = recorder.borrow();
    let submitted = &recorder.submitted;
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].evm_version(), "shanghai");
}

#[test_log::test]
fn test_rejected_verification_keeps_details() {
    let (mut session, _) = session(
        Lookup::NotVerified,
        Submission::Answers("0", "Bad compiler"),
    );
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);
    let details = session.details().clone();

    let outcome = session.continue_step().unwrap();

    assert!(matches!(&outcome, StepOutcome::Failed(result) if result.message == "Bad compiler"));
    assert_eq!(session.current_step(), Step::AwaitingCompiler);
    assert_eq!(session.details(), &details);
    assert_eq!(session.last_result().unwrap().status, "0");
    assert!(!session.is_verifying());
    assert_eq!(
        session.messages().last().unwrap().content.as_text(),
        Some(FAILED)
    );

    let summary = session
        .messages()
        .iter()
        .rev()
        .find_map(|e| match &e.content {
            Content::Structured(value) => Some(value.clone()),
            Content::Text(_) => None,
        })
        .unwrap();
    assert!(summary.get("explorer_url").is_none());
}

#[test_log::test]
fn test_unknown_status_counts_as_failure() {
    let (mut session, _) = session(Lookup::NotVerified, Submission::Answers("2", "Pending"));
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);

    assert!(matches!(
        session.continue_step().unwrap(),
        StepOutcome::Failed(_)
    ));
    assert_eq!(session.current_step(), Step::AwaitingCompiler);
}

#[test_log::test]
fn test_submission_error_clears_in_flight_flag() {
    let (mut session, _) = session(Lookup::NotVerified, Submission::Fails);
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);
    let details = session.details().clone();

    let error = session.continue_step().unwrap_err();

    assert_eq!(error.error_code(), "E002");
    assert!(!session.is_verifying());
    assert_eq!(session.current_step(), Step::AwaitingCompiler);
    assert_eq!(session.details(), &details);
    assert!(session.last_result().is_none());
    let last = session.messages().last().unwrap().content.as_text().unwrap();
    assert!(last.starts_with("Verification error:"));

    // The user can retry the same action
    assert!(session.can_continue());
}

// Whatever compiler type was picked, the explorer gets a single-file
// submission; the type is collected but never transmitted.
#[test_log::test]
fn test_compiler_type_is_not_forwarded() {
    let (mut session, recorder) = session(Lookup::NotVerified, Submission::Answers("0", "nope"));
    walk_to_compiler_step(&mut session, CompilerType::SolidityJson);
    session.continue_step().unwrap();

    let recorder = recorder.borrow();
    let payload = crate::api::SourceSubmission::from(&recorder.submitted[0]);
    assert_eq!(payload.codeformat, crate::api::CODE_FORMAT);
}

#[test_log::test]
fn test_log_is_append_only_across_reset() {
    let mut session = default_session();
    walk_to_compiler_step(&mut session, CompilerType::SoliditySingle);
    let before: Vec<_> = session.messages().to_vec();

    session.continue_step().unwrap();

    let after = session.messages();
    assert!(after.len() > before.len());
    assert_eq!(&after[..before.len()], before.as_slice());
    assert!(after.windows(2).all(|pair| pair[0].id < pair[1].id));
}
