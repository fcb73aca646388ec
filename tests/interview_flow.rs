//! End-to-end interviews driven through the public handlers with in-memory
//! adapters.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use access_request_bot::adapters::{
    InMemoryAnalyticsLookup, InMemoryApprovalStore, InMemoryInterviewStore, MockTicketingService,
    StaticDirectory,
};
use access_request_bot::application::flows::filter_organizations;
use access_request_bot::application::{
    register_flows, ContinueInterviewCommand, ContinueInterviewHandler, FlowServices,
    FlowSettings, InterviewTurn, StartInterviewCommand, StartInterviewHandler, TurnInput,
};
use access_request_bot::domain::dialog::{
    DialogId, DialogResult, DialogRunner, DialogValue, UserInput,
};
use access_request_bot::domain::foundation::{ConversationId, DataVisibility, MemberId, TicketId};

const MEMBER: &str = "29:requester";
const SERVICE_TREE: &str = "11111111-1111-1111-1111-111111111111";
const APP_ID: &str = "22222222-2222-2222-2222-222222222222";

struct Harness {
    start: StartInterviewHandler,
    proceed: ContinueInterviewHandler,
    ticketing: MockTicketingService,
    approvals: InMemoryApprovalStore,
    conversation_id: ConversationId,
}

impl Harness {
    fn new() -> Self {
        let lookup = InMemoryAnalyticsLookup::new()
            .with_service_tree(
                Uuid::parse_str(SERVICE_TREE).unwrap(),
                "Engineering Insights",
            )
            .with_tables(DataVisibility::Private, ["TableA", "TableB", "TableC"])
            .with_tables(DataVisibility::CrossOrganization, ["TableA", "TableB", "TableC"])
            .with_organization("Contoso");
        let ticketing = MockTicketingService::new();
        let approvals = InMemoryApprovalStore::new();

        let services = FlowServices {
            directory: Arc::new(
                StaticDirectory::new().with_member(MemberId::new(MEMBER).unwrap(), "jdoe@contoso.com"),
            ),
            lookup: Arc::new(lookup),
            ticketing: Arc::new(ticketing.clone()),
            approvals: Arc::new(approvals.clone()),
            settings: FlowSettings::default(),
        };
        let runner = DialogRunner::new(Arc::new(register_flows(services)));
        let store = Arc::new(InMemoryInterviewStore::new());

        Self {
            start: StartInterviewHandler::new(store.clone(), runner.clone()),
            proceed: ContinueInterviewHandler::new(store, runner),
            ticketing,
            approvals,
            conversation_id: ConversationId::new("conversation-1").unwrap(),
        }
    }

    async fn start(&self) -> InterviewTurn {
        self.start
            .handle(StartInterviewCommand {
                conversation_id: self.conversation_id.clone(),
                member_id: MemberId::new(MEMBER).unwrap(),
                dialog: DialogId::DataAccess,
            })
            .await
            .unwrap()
    }

    async fn send(&self, input: UserInput) -> InterviewTurn {
        self.proceed
            .handle(ContinueInterviewCommand {
                conversation_id: self.conversation_id.clone(),
                input: TurnInput::Answer(input),
            })
            .await
            .unwrap()
    }

    async fn say(&self, text: &str) -> InterviewTurn {
        self.send(UserInput::text(text)).await
    }

    /// Answers every question in order and returns all replies seen.
    async fn script(&self, answers: &[&str]) -> (Vec<String>, InterviewTurn) {
        let mut seen = texts(&self.start().await);
        let mut last = None;
        for answer in answers {
            let turn = self.say(answer).await;
            seen.extend(texts(&turn));
            last = Some(turn);
        }
        (seen, last.unwrap())
    }

    async fn submitted_snapshot(&self) -> Value {
        let tickets = self.ticketing.tickets().await;
        assert_eq!(tickets.len(), 1, "exactly one ticket expected");
        serde_json::from_str(&tickets[0].1.description_entries[0].text).unwrap()
    }
}

fn texts(turn: &InterviewTurn) -> Vec<String> {
    turn.replies.iter().map(|r| r.text().to_string()).collect()
}

fn head(answers: &[&'static str], scope: Option<&'static str>) -> Vec<&'static str> {
    let mut script = vec!["AAD App/MSI"];
    script.extend(answers);
    if let Some(scope) = scope {
        script.push(scope);
    }
    script.extend([SERVICE_TREE, "MSIT", APP_ID, "No", "Build a quarterly engineering health report", "5", "team@contoso.com"]);
    script
}

#[tokio::test]
async fn cross_organization_request_is_filed_with_found_organizations_only() {
    let harness = Harness::new();
    let mut answers = head(&["AzureDevOps"], Some("X"));
    answers.extend([
        "TableA,TableB",
        "Measure review turnaround",
        "Aggregated nightly",
        "Dashboards stored in our tenant",
        "Contoso,Fabrikam",
    ]);

    let (seen, last) = harness.script(&answers).await;

    assert_eq!(
        last.finished,
        Some(DialogResult::Completed(DialogValue::TicketId(TicketId::new(1000))))
    );
    assert!(seen.contains(
        &"'Fabrikam' could not be found. I will continue to check your other organizations."
            .to_string()
    ));
    assert!(seen.contains(&"Found organizations: Contoso".to_string()));
    assert!(texts(&last)
        .last()
        .unwrap()
        .ends_with("https://tickets.example.com/incidents/details/1000"));

    let snapshot = harness.submitted_snapshot().await;
    assert_eq!(snapshot["Requester"], "jdoe");
    assert_eq!(snapshot["DataVisibility"], "X");
    assert_eq!(snapshot["ServiceTreeId"], SERVICE_TREE);
    assert_eq!(
        snapshot["DataSets"],
        json!([{
            "Database": "AzureDevOps",
            "Tables": ["TableA", "TableB"],
            "Organizations": ["Contoso"]
        }])
    );
    assert_eq!(
        snapshot["ServicePrincipals"],
        json!([{ "Tenant": "MSIT", "AppIds": [APP_ID] }])
    );
    assert_eq!(snapshot["DownstreamDataConsumers"], 5);
    assert_eq!(snapshot["ContactEmail"], "team@contoso.com");

    let tickets = harness.ticketing.tickets().await;
    assert_eq!(tickets[0].1.title, "App Access Request X/jdoe");
    let attachments = harness.ticketing.attachments().await;
    let attached: Value = serde_json::from_str(&attachments[0].content).unwrap();
    assert_eq!(attached, snapshot);

    let records = harness.approvals.records().await;
    let record: Value = serde_json::from_str(records.values().next().unwrap()).unwrap();
    assert_eq!(
        record,
        json!({ "userPrincipalName": "jdoe@microsoft.com", "ticketId": "1000" })
    );
}

#[tokio::test]
async fn private_request_skips_organizations_and_keeps_labelled_justification() {
    let harness = Harness::new();
    let mut answers = head(&["AzureDevOps"], Some("P"));
    answers.extend([
        "TableA,TableB",
        "Measure review turnaround",
        "Aggregated nightly",
        "Dashboards stored in our tenant",
    ]);

    let (seen, last) = harness.script(&answers).await;

    assert!(last.is_finished());
    assert!(!seen.iter().any(|text| text.contains("organizations you would like")));

    let snapshot = harness.submitted_snapshot().await;
    assert_eq!(snapshot["DataVisibility"], "P");
    assert_eq!(snapshot["DataSets"][0]["Organizations"], json!([]));
    assert_eq!(
        snapshot["BusinessJustification"],
        "Build a quarterly engineering health report \
- Business Objective: Measure review turnaround \
- Data Handling: Aggregated nightly \
- Data Results: Dashboards stored in our tenant"
    );
}

#[tokio::test]
async fn unrestricted_request_asks_no_table_questions() {
    let harness = Harness::new();
    let answers = head(&["GitHub"], None);

    let (seen, last) = harness.script(&answers).await;

    assert!(last.is_finished());
    assert!(!seen.iter().any(|text| text == "Please select desired tables."));
    assert!(!seen.iter().any(|text| text.contains("business objective")));

    let snapshot = harness.submitted_snapshot().await;
    assert_eq!(snapshot["DataVisibility"], "D");
    assert_eq!(snapshot["DataSets"][0]["Database"], "GitHub");
    assert_eq!(snapshot["DataSets"][0]["Tables"], json!([]));
    assert_eq!(
        snapshot["BusinessJustification"],
        "Build a quarterly engineering health report"
    );
}

#[tokio::test]
async fn malformed_service_tree_id_restarts_capture() {
    let harness = Harness::new();
    harness.start().await;
    harness.say("AAD App/MSI").await;
    harness.say("GitHub").await;

    let turn = harness.say("not-a-guid").await;
    assert_eq!(
        texts(&turn),
        vec!["Please enter a valid ServiceTree Id.", "Please provide your ServiceTree Id:"]
    );

    let turn = harness.say(SERVICE_TREE).await;
    assert_eq!(
        texts(&turn),
        vec!["Service name is Engineering Insights.", "Which tenant does your app reside in?"]
    );
}

#[tokio::test]
async fn empty_database_card_shows_card_again() {
    let harness = Harness::new();
    harness.start().await;
    harness.say("AAD App/MSI").await;

    for _ in 0..2 {
        let turn = harness.send(UserInput::card(json!({}))).await;
        assert_eq!(
            texts(&turn),
            vec![
                "Please select a valid option.",
                "Which databases would you like access to? Select ONE"
            ]
        );
        assert!(!turn.is_finished());
    }
}

#[tokio::test]
async fn organization_filtering_is_idempotent() {
    let lookup = InMemoryAnalyticsLookup::new()
        .with_organization("Contoso")
        .with_organization("Northwind");
    let timeout = std::time::Duration::from_secs(1);

    let first = filter_organizations(&lookup, timeout, ["Northwind", "Contoso", "Contoso", "Missing"])
        .await
        .unwrap();
    let second = filter_organizations(&lookup, timeout, first.found.iter())
        .await
        .unwrap();

    assert_eq!(second.found, first.found);
    assert!(second.missing.is_empty());
}
