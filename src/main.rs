mod args;
mod progress;
mod render;

use crate::args::{Args, CheckArgs, Commands};
use crate::progress::ApiProgress;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input, Select};
use std::{fs, path::Path};
use verifier::{
    api::{Explorer, ExplorerProvider},
    catalog,
    config::NetworkTable,
    details::DetailsUpdate,
    errors::SessionError,
    session::{Step, StepOutcome, VerificationSession},
};

const BACK: &str = "← Back";
const QUIT: &str = "✕ Quit";

/// What the user asked for at the current step.
enum Action {
    Input(String),
    Update(DetailsUpdate),
    Continue,
    Back,
    Quit,
}

enum Choice {
    Item(usize),
    Back,
    Quit,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let networks = args.network_table()?;

    match args.command {
        None | Some(Commands::Chat) => chat(networks),
        Some(Commands::Check(check_args)) => check(&networks, &check_args),
    }
}

fn check(networks: &NetworkTable, args: &CheckArgs) -> anyhow::Result<()> {
    let client = networks.client_for(args.network)?;

    let progress = ApiProgress::new_lookup();
    let verified = client.is_verified(&args.address);
    progress.finish_and_clear();

    let url = client.browser_url(&args.address);
    if verified? {
        println!("{} {url}", "✅ Verified:".green().bold());
    } else {
        println!(
            "{} {} on {}",
            "❌ Not verified:".yellow().bold(),
            args.address,
            args.network
        );
    }
    Ok(())
}

fn chat(networks: NetworkTable) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    let mut session = VerificationSession::new(networks);
    let mut seen = 0;

    loop {
        render::print_entries(session.conversation().since(seen));
        seen = session.conversation().len();

        let outcome = match next_action(&theme, &session)? {
            Action::Quit => break,
            Action::Back => {
                session.back();
                continue;
            }
            Action::Input(text) => Ok(session.send_user_input(&text)),
            Action::Update(update) => match session.update_details(update) {
                Ok(()) => continue_with_progress(&mut session),
                Err(e) => Err(e),
            },
            Action::Continue => continue_with_progress(&mut session),
        };

        match outcome {
            Ok(StepOutcome::Verified(_)) => {
                render::print_entries(session.conversation().since(seen));
                seen = session.conversation().len();

                let again = Confirm::with_theme(&theme)
                    .with_prompt("Verify another contract?")
                    .default(true)
                    .interact()?;
                if !again {
                    break;
                }
            }
            Ok(outcome) => log::debug!("Step outcome: {outcome:?}"),
            // Remote failures already made it into the conversation
            Err(SessionError::Api(e)) => log::debug!("{e}"),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    render::print_entries(session.conversation().since(seen));
    Ok(())
}

fn continue_with_progress(
    session: &mut VerificationSession<NetworkTable>,
) -> Result<StepOutcome, SessionError> {
    let progress = match session.current_step() {
        Step::AwaitingNetwork => Some(ApiProgress::new_lookup()),
        Step::AwaitingCompiler => Some(ApiProgress::new_submission()),
        _ => None,
    };

    let outcome = session.continue_step();
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }
    outcome
}

fn next_action(
    theme: &ColorfulTheme,
    session: &VerificationSession<NetworkTable>,
) -> anyhow::Result<Action> {
    let step = session.current_step();
    let details = session.details();

    let action = match step {
        Step::AwaitingAddress => {
            if let Some(address) = &details.address {
                let label = format!("Continue with {address}");
                return Ok(match choose(theme, "Contract address", &[label], 0, false)? {
                    Choice::Item(_) | Choice::Back => Action::Continue,
                    Choice::Quit => Action::Quit,
                });
            }

            let text: String = Input::with_theme(theme)
                .with_prompt("Contract address (or 'quit')")
                .interact_text()?;
            if matches!(text.trim(), "quit" | "q") {
                Action::Quit
            } else {
                Action::Input(text)
            }
        }
        Step::AwaitingNetwork => {
            let networks = catalog::networks();
            let labels: Vec<String> = networks.iter().map(ToString::to_string).collect();
            let current = details
                .network
                .and_then(|n| networks.iter().position(|m| *m == n));

            match choose(theme, "Network", labels.as_slice(), current.unwrap_or(0), false)? {
                Choice::Item(i) => Action::Update(DetailsUpdate::network(networks[i])),
                Choice::Back => Action::Back,
                Choice::Quit => Action::Quit,
            }
        }
        Step::AwaitingCompilerType => {
            let types = catalog::compiler_types();
            let labels: Vec<&str> = types.iter().map(|t| t.label()).collect();

            match choose(theme, "Compiler type", labels.as_slice(), 0, false)? {
                Choice::Item(i) => Action::Update(DetailsUpdate::compiler_type(types[i])),
                Choice::Back => Action::Back,
                Choice::Quit => Action::Quit,
            }
        }
        Step::AwaitingLicense => {
            let licenses = catalog::licenses();
            let labels: Vec<&str> = licenses.iter().map(|l| l.label()).collect();

            match choose(theme, "License", labels.as_slice(), 0, false)? {
                Choice::Item(i) => Action::Update(DetailsUpdate::license_type(licenses[i])),
                Choice::Back => Action::Back,
                Choice::Quit => Action::Quit,
            }
        }
        Step::AwaitingSource => match choose(theme, "Source code", &["Provide source file"], 0, false)? {
            Choice::Item(_) => ask_source(theme)?,
            Choice::Back => Action::Back,
            Choice::Quit => Action::Quit,
        },
        Step::AwaitingCompiler => {
            let version = match choose(theme, "Compiler version", catalog::COMPILER_VERSIONS, 0, true)? {
                Choice::Item(i) => catalog::COMPILER_VERSIONS[i],
                Choice::Back => return Ok(Action::Back),
                Choice::Quit => return Ok(Action::Quit),
            };

            let evm = Select::with_theme(theme)
                .with_prompt("EVM version")
                .items(catalog::EVM_VERSIONS)
                .default(0)
                .interact_opt()?;
            match evm {
                Some(i) => Action::Update(DetailsUpdate::compiler(
                    version,
                    Some(catalog::EVM_VERSIONS[i].to_owned()),
                )),
                None => Action::Quit,
            }
        }
    };

    Ok(action)
}

/// A pick from `labels` followed by back and quit entries. Escape quits.
fn choose<T: AsRef<str>>(
    theme: &ColorfulTheme,
    prompt: &str,
    labels: &[T],
    default: usize,
    fuzzy: bool,
) -> anyhow::Result<Choice> {
    let mut items: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
    items.push(BACK);
    items.push(QUIT);

    let picked = if fuzzy {
        FuzzySelect::with_theme(theme)
            .with_prompt(prompt)
            .items(items.as_slice())
            .default(default)
            .interact_opt()?
    } else {
        Select::with_theme(theme)
            .with_prompt(prompt)
            .items(items.as_slice())
            .default(default)
            .interact_opt()?
    };

    Ok(match picked {
        Some(i) if i < labels.len() => Choice::Item(i),
        Some(i) if i == labels.len() => Choice::Back,
        _ => Choice::Quit,
    })
}

fn ask_source(theme: &ColorfulTheme) -> anyhow::Result<Action> {
    let name: String = Input::with_theme(theme)
        .with_prompt("Contract name")
        .interact_text()?;

    let path: String = Input::with_theme(theme)
        .with_prompt("Path to the .sol file")
        .validate_with(|input: &String| -> Result<(), &str> {
            if Path::new(input.trim()).extension().is_some_and(|ext| ext == "sol") {
                Ok(())
            } else {
                Err("Only .sol files are accepted")
            }
        })
        .interact_text()?;

    let path = path.trim();
    let code = fs::read_to_string(path).with_context(|| format!("Couldn't read {path}"));
    match code {
        Ok(code) => Ok(Action::Update(DetailsUpdate::source(name.trim(), code))),
        Err(e) => {
            eprintln!("{}", format!("{e:#}").red());
            // Stay on the step; the user gets asked again
            Ok(Action::Update(DetailsUpdate::default()))
        }
    }
}
