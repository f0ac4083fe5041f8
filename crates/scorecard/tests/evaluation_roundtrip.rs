//! End-to-end scenarios: the REST client and editing session against the evaluations router
//! served over a real socket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use scorecard::config::RemoteConfig;
use scorecard::evaluation::{
    evaluation_router, EvaluationField, EvaluationId, EvaluationSession, EvaluationStore,
    InMemoryEvaluationRepository, ItemId, RemoteError, RestEvaluationClient, SaveStatus,
};

async fn spawn_server() -> SocketAddr {
    let repository = Arc::new(InMemoryEvaluationRepository::new());
    let app = evaluation_router(repository);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port binds");
    let addr = listener.local_addr().expect("bound address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    addr
}

fn client(addr: SocketAddr) -> RestEvaluationClient {
    let config = RemoteConfig::new(format!("http://{addr}/api"), Duration::from_secs(5))
        .expect("valid url");
    RestEvaluationClient::new(config).expect("client builds")
}

#[tokio::test]
async fn saved_evaluation_can_be_listed_updated_and_deleted() {
    let addr = spawn_server().await;
    let client = client(addr);
    let mut session = EvaluationSession::default();
    session.edit_field(ItemId(1), EvaluationField::Score, "90");
    session.edit_field(ItemId(2), EvaluationField::Score, "80");
    session.edit_field(ItemId(5), EvaluationField::Bonus, "1.5");

    session.request_save(&client).await;
    assert!(
        matches!(session.status(), SaveStatus::Succeeded(_)),
        "{:?}",
        session.status()
    );

    let listed = client.list().await.expect("list succeeds");
    assert_eq!(listed.len(), 1);
    let id = listed[0].id.clone().expect("server assigns ids");
    // 90 * 30% + 80 * 25% + 1.5
    assert!((listed[0].record.total_score - 48.5).abs() < 1e-9);
    assert_eq!(listed[0].record.items, session.items());

    session.edit_field(ItemId(3), EvaluationField::Score, "100");
    session.request_update(&client, &id).await;
    assert!(matches!(session.status(), SaveStatus::Succeeded(_)));

    let fetched = client.fetch(&id).await.expect("fetch succeeds");
    assert!((fetched.record.total_score - 68.5).abs() < 1e-9);

    client.delete(&id).await.expect("delete succeeds");
    match client.fetch(&id).await {
        Err(RemoteError::Server {
            status: 404,
            message: Some(message),
        }) => assert!(message.contains("not found"), "{message}"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn update_of_unknown_record_surfaces_server_message() {
    let addr = spawn_server().await;
    let client = client(addr);
    let mut session = EvaluationSession::default();

    session
        .request_update(&client, &EvaluationId::from("missing"))
        .await;

    match session.status() {
        SaveStatus::Failed(message) => {
            assert!(message.contains("evaluation missing not found"), "{message}")
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
