//! # Console Commands
//!
//! One line in, one JSON response out.
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                         Effect                                 │
//! │  ───────                         ──────                                 │
//! │  view <dashboard|store|          switch screen                          │
//! │        history|profile>                                                 │
//! │  search <text>                   store search (empty clears)            │
//! │  category <name|all>             store category filter                  │
//! │  filter <all|purchase|           history kind filter                    │
//! │          deposit|refund>                                                │
//! │  buy <item-id>                   purchase through the host              │
//! │  deposit <amount>                add 1..=10000 RC                       │
//! │  rename <name>                   change display name                    │
//! │  about                           show the about text                    │
//! │  menu <new-transaction|          simulate a host menu signal            │
//! │        show-about>                                                      │
//! │  help                            list commands                          │
//! │  quit                            end the session                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every response carries the current view so the front end can re-render
//! without a second round-trip.

use serde::Serialize;
use tracing::debug;

use roflo_core::purchase::to_purchase_result;
use roflo_core::validation::parse_deposit_amount;
use roflo_core::{PurchaseResult, ShellEvent, TransactionKind, View, ViewModel};
use roflo_session::{Session, ShellSignal};

use crate::error::ApiError;
use crate::host::LocalHost;

const HELP_TEXT: &str = "Commands: view <dashboard|store|history|profile>, search <text>, \
category <name|all>, filter <all|purchase|deposit|refund>, buy <item-id>, deposit <amount>, \
rename <name>, about, menu <new-transaction|show-about>, help, quit";

// =============================================================================
// Parsing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    View(View),
    Search(String),
    Category(Option<String>),
    Filter(Option<TransactionKind>),
    Buy(String),
    Deposit(String),
    Rename(String),
    About,
    Menu(ShellSignal),
    Help,
    Quit,
}

impl std::str::FromStr for ShellCommand {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let require_arg = |what: &str| -> Result<String, ApiError> {
            if arg.is_empty() {
                Err(ApiError::unknown_command(format!("{} expects {}", verb, what)))
            } else {
                Ok(arg.to_string())
            }
        };

        match verb.to_lowercase().as_str() {
            "view" | "go" => arg
                .parse::<View>()
                .map(ShellCommand::View)
                .map_err(|e| ApiError::validation(e.to_string())),
            "search" => Ok(ShellCommand::Search(arg.to_string())),
            "category" => Ok(ShellCommand::Category(match arg {
                "" | "all" | "All" => None,
                name => Some(name.to_string()),
            })),
            "filter" => match arg.to_lowercase().as_str() {
                "" | "all" => Ok(ShellCommand::Filter(None)),
                kind => kind
                    .parse::<TransactionKind>()
                    .map(|k| ShellCommand::Filter(Some(k)))
                    .map_err(|e| ApiError::validation(e.to_string())),
            },
            "buy" => require_arg("an item id").map(ShellCommand::Buy),
            "deposit" => require_arg("an amount").map(ShellCommand::Deposit),
            "rename" => require_arg("a name").map(ShellCommand::Rename),
            "about" => Ok(ShellCommand::About),
            "menu" => arg
                .parse::<ShellSignal>()
                .map(ShellCommand::Menu)
                .map_err(|e| ApiError::validation(e.to_string())),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            "" => Err(ApiError::unknown_command("empty command")),
            other => Err(ApiError::unknown_command(format!(
                "Unknown command '{}'. Type 'help' for a list.",
                other
            ))),
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// What the console prints after each command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// Set for `buy`: the `{ success, message }` the storefront alerts with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase: Option<PurchaseResult>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    pub view: ViewModel,
}

#[derive(Debug)]
pub enum Outcome {
    Continue(CommandResponse),
    Quit,
}

// =============================================================================
// Execution
// =============================================================================

/// Runs one command against the session.
///
/// Failures are reported inside the response; the session stays usable.
pub async fn execute(session: &mut Session, host: &LocalHost, command: ShellCommand) -> Outcome {
    debug!(?command, "Executing command");

    let mut purchase = None;
    let mut notices = Vec::new();

    let result: Result<(), ApiError> = match command {
        ShellCommand::Quit => return Outcome::Quit,
        ShellCommand::View(view) => {
            session.handle_event(ShellEvent::Navigate(view));
            Ok(())
        }
        ShellCommand::Search(text) => session.set_search(&text).map_err(ApiError::from),
        ShellCommand::Category(category) => session
            .set_category(category.as_deref())
            .map_err(ApiError::from),
        ShellCommand::Filter(kind) => {
            session.set_history_filter(kind);
            Ok(())
        }
        ShellCommand::Buy(item_id) => {
            let outcome = session.purchase(&item_id).await;
            purchase = Some(to_purchase_result(&outcome));
            outcome.map(|_| ()).map_err(ApiError::from)
        }
        ShellCommand::Deposit(input) => {
            let deposited = parse_deposit_amount(&input)
                .and_then(|coins| session.deposit(coins.amount()).map(|balance| (coins, balance)));
            match deposited {
                Ok((coins, balance)) => {
                    notices.push(format!("Deposited {}. Balance: {}", coins, balance));
                    Ok(())
                }
                Err(e) => Err(ApiError::from(e)),
            }
        }
        ShellCommand::Rename(name) => session.rename(&name).map_err(ApiError::from),
        ShellCommand::About => {
            notices.extend(session.handle_event(ShellEvent::ShowAbout));
            Ok(())
        }
        ShellCommand::Menu(signal) => {
            host.menu(signal);
            Ok(())
        }
        ShellCommand::Help => {
            notices.push(HELP_TEXT.to_string());
            Ok(())
        }
    };

    notices.extend(session.pump_signals());

    Outcome::Continue(CommandResponse {
        purchase,
        notices,
        error: result.err(),
        view: session.view(),
    })
}

/// Parses and runs one input line.
pub async fn execute_line(session: &mut Session, host: &LocalHost, line: &str) -> Outcome {
    match line.parse::<ShellCommand>() {
        Ok(command) => execute(session, host, command).await,
        Err(error) => Outcome::Continue(CommandResponse {
            purchase: None,
            notices: Vec::new(),
            error: Some(error),
            view: session.view(),
        }),
    }
}
