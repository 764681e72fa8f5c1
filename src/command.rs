//! Command surface exposed to the host: `generate` and `update`.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::composer::{compose_summary, PlacedSummary, Scope};
use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::host::{Host, Notice, NoticeKind};
use crate::updater::{locate_summary, regenerate_summary};

/// Relaunch key the host shows next to a generated summary.
pub const UPDATE_COMMAND: &str = "update";

const GENERIC_FAILURE: &str = "Something went wrong. Check the console for details.";

/// A logical command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Generate { current_page_only: bool },
    Update,
}

impl Command {
    /// Map a host command key to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "generate" => Some(Self::Generate {
                current_page_only: false,
            }),
            "generate-page" => Some(Self::Generate {
                current_page_only: true,
            }),
            UPDATE_COMMAND => Some(Self::Update),
            _ => None,
        }
    }

    fn progress_message(self) -> &'static str {
        match self {
            Self::Generate { .. } => "Generating table of contents…",
            Self::Update => "Updating table of contents…",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::Generate { .. } => "Table of contents generated",
            Self::Update => "Table of contents updated",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate {
                current_page_only: false,
            } => f.write_str("generate"),
            Self::Generate {
                current_page_only: true,
            } => f.write_str("generate (current page)"),
            Self::Update => f.write_str(UPDATE_COMMAND),
        }
    }
}

/// Command lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    Idle,
    Locating,
    Generating,
    Done,
    Failed,
}

/// Outcome of one command run.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandReport {
    pub command: Command,
    /// States visited, starting with `Idle`.
    pub states: Vec<CommandState>,
    pub result: Result<PlacedSummary, SummaryError>,
}

impl CommandReport {
    pub fn state(&self) -> CommandState {
        self.states.last().copied().unwrap_or(CommandState::Idle)
    }

    pub fn summary(&self) -> Option<&PlacedSummary> {
        self.result.as_ref().ok()
    }
}

/// Run `command` against `host`.
///
/// Shows a progress notice, runs, scrolls to the result and shows a success
/// notice, or a generic error notice on failure. The session is closed on
/// every path.
pub async fn run_command<H>(host: &mut H, config: &SummaryConfig, command: Command) -> CommandReport
where
    H: Host + ?Sized,
{
    let mut states = vec![CommandState::Idle];
    host.notify(Notice::new(NoticeKind::Progress, command.progress_message()));

    let result = match command {
        Command::Generate { current_page_only } => {
            states.push(CommandState::Generating);
            let scope = if current_page_only {
                Scope::CurrentPage
            } else {
                Scope::AllPages
            };
            compose_summary(host, config, scope).await
        }
        Command::Update => {
            states.push(CommandState::Locating);
            match locate_summary(&*host, config) {
                Ok(located) => {
                    states.push(CommandState::Generating);
                    regenerate_summary(host, config, &located).await
                }
                Err(err) => Err(err),
            }
        }
    };

    match &result {
        Ok(placed) => {
            host.scroll_into_view(placed.node);
            host.notify(Notice::new(NoticeKind::Success, command.success_message()));
            if matches!(command, Command::Generate { .. }) {
                host.offer_relaunch(&placed.page, UPDATE_COMMAND);
            }
            states.push(CommandState::Done);
        }
        Err(err) => {
            log::error!("{} failed: {}", command, err);
            host.notify(Notice::new(NoticeKind::Error, GENERIC_FAILURE));
            states.push(CommandState::Failed);
        }
    }
    host.close();

    CommandReport {
        command,
        states,
        result,
    }
}
