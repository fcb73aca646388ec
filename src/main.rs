//! Console transport for the access request interview.
//!
//! Reads one answer per line from stdin and prints the bot's replies to
//! stdout. Logs go to stderr.
//!
//! Commands: `/repeat` repeats the current question, `/diag` runs the
//! connectivity check, `/quit` exits. Any other line starts an interview when
//! none is running.

use std::sync::Arc;

use secrecy::{ExposeSecret, Secret};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use access_request_bot::adapters::{
    FileApprovalStore, HttpTicketingConfig, HttpTicketingService, InMemoryAnalyticsLookup,
    InMemoryInterviewStore, MockTicketingService, StaticDirectory,
};
use access_request_bot::application::{
    register_flows, ContinueInterviewCommand, ContinueInterviewHandler, FlowServices,
    FlowSettings, InterviewTurn, StartInterviewCommand, StartInterviewHandler, TurnInput,
};
use access_request_bot::config::{AppConfig, LoggingConfig};
use access_request_bot::domain::dialog::{DialogId, DialogRunner, Expectation, Reply, UserInput};
use access_request_bot::domain::foundation::{ConversationId, MemberId};
use access_request_bot::ports::{InterviewStore, TicketingService};

const CONSOLE_CONVERSATION: &str = "console";
const CONSOLE_MEMBER: &str = "console-user";

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn ticketing_backend(config: &AppConfig) -> Result<Arc<dyn TicketingService>, Box<dyn std::error::Error>> {
    let ticketing = &config.ticketing;
    match (&ticketing.base_url, &ticketing.api_token) {
        (Some(base_url), Some(token)) => {
            let token = Secret::new(token.expose_secret().clone());
            let http_config =
                HttpTicketingConfig::new(base_url.clone(), token).with_timeout(ticketing.timeout());
            info!(base_url = %base_url, "Using HTTP ticketing backend");
            Ok(Arc::new(HttpTicketingService::new(http_config)?))
        }
        _ => {
            warn!("No ticketing backend configured, tickets are kept in memory");
            Ok(Arc::new(MockTicketingService::new()))
        }
    }
}

fn render(turn: &InterviewTurn) {
    for reply in &turn.replies {
        match reply {
            Reply::Message(text) => println!("bot> {}", text),
            Reply::Prompt(prompt) => {
                println!("bot> {}", prompt.text);
                match &prompt.expect {
                    Expectation::FreeText => {}
                    Expectation::Choice { options } => println!("     [{}]", options.join(" | ")),
                    Expectation::Card(card) => {
                        for choice in &card.choices {
                            println!("     - {} ({})", choice.title, choice.value);
                        }
                        if card.multi_select {
                            println!("     (several values may be given, comma separated)");
                        }
                    }
                }
            }
        }
    }
    if let Some(result) = &turn.finished {
        println!("bot> [interview finished: {:?}]", result);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    let member_id = MemberId::new(CONSOLE_MEMBER)?;
    let conversation_id = ConversationId::new(CONSOLE_CONVERSATION)?;

    let services = FlowServices {
        directory: Arc::new(
            StaticDirectory::new().with_member(member_id.clone(), config.interview.console_principal.clone()),
        ),
        lookup: Arc::new(InMemoryAnalyticsLookup::sample()),
        ticketing: ticketing_backend(&config)?,
        approvals: Arc::new(FileApprovalStore::new(config.approvals.directory.clone())),
        settings: FlowSettings::from_config(&config),
    };
    let runner = DialogRunner::new(Arc::new(register_flows(services)));
    let store: Arc<dyn InterviewStore> = Arc::new(InMemoryInterviewStore::new());
    let start = StartInterviewHandler::new(store.clone(), runner.clone());
    let proceed = ContinueInterviewHandler::new(store.clone(), runner);

    info!("Console transport ready");
    println!("Type anything to start a data access request. /quit exits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        let active = store.is_active(&conversation_id).await?;
        let outcome = match (line, active) {
            ("/diag", false) => start
                .handle(StartInterviewCommand {
                    conversation_id: conversation_id.clone(),
                    member_id: member_id.clone(),
                    dialog: DialogId::Diagnostics,
                })
                .await
                .map_err(|err| err.user_message()),
            (_, false) => start
                .handle(StartInterviewCommand {
                    conversation_id: conversation_id.clone(),
                    member_id: member_id.clone(),
                    dialog: DialogId::DataAccess,
                })
                .await
                .map_err(|err| err.user_message()),
            (text, true) => {
                let input = if text == "/repeat" {
                    TurnInput::Unsupported
                } else {
                    TurnInput::Answer(UserInput::text(text))
                };
                proceed
                    .handle(ContinueInterviewCommand {
                        conversation_id: conversation_id.clone(),
                        input,
                    })
                    .await
                    .map_err(|err| err.user_message())
            }
        };

        match outcome {
            Ok(turn) => render(&turn),
            Err(message) => println!("bot> {}", message),
        }
    }

    Ok(())
}
