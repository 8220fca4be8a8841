//! Integration tests for the event log implementations.

use datagate_core::models::provider::Provider;
use datagate_core::repository::{EventStore, UuidV4Generator};
use datagate_core::{Application, CreateApplication, GatewayError, ScopeCatalog};
use datagate_db::memory::MemoryEventStore;
use datagate_db::repository::SurrealEventStore;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Spin up in-memory DB and run migrations.
async fn setup() -> SurrealEventStore<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    datagate_db::run_migrations(&db).await.unwrap();
    SurrealEventStore::new(db)
}

fn new_application() -> Application {
    Application::create(
        CreateApplication {
            name: "CCAS de Lyon".into(),
            external_reference_id: "dp-7".into(),
            subscriptions: vec![Provider::Cnaf],
            scopes: vec!["cnaf_adresse".into()],
            user_emails: vec!["agent@lyon.fr".into()],
        },
        &ScopeCatalog::standard().unwrap(),
        &UuidV4Generator,
    )
    .unwrap()
}

async fn append_and_reload<S: EventStore>(store: &S) {
    let mut app = new_application();
    app.register_user("second@lyon.fr").unwrap();

    let version = store
        .append(app.id(), app.pending().to_vec(), app.version())
        .await
        .unwrap();
    assert_eq!(version, 2);
    app.commit(version);

    let history = store.load_history(app.id()).await.unwrap();
    assert_eq!(history.len(), 2);

    let reloaded = Application::from_history(app.id(), &history).unwrap();
    assert_eq!(reloaded.state(), app.state());
    assert_eq!(reloaded.version(), 2);
}

async fn stale_writer_is_rejected<S: EventStore>(store: &S) {
    let mut app = new_application();
    let version = store
        .append(app.id(), app.pending().to_vec(), 0)
        .await
        .unwrap();
    app.commit(version);

    // Two writers load the same version.
    let history = store.load_history(app.id()).await.unwrap();
    let mut first = Application::from_history(app.id(), &history).unwrap();
    let mut second = Application::from_history(app.id(), &history).unwrap();
    first.register_user("first@lyon.fr").unwrap();
    second.register_user("second@lyon.fr").unwrap();

    store
        .append(first.id(), first.pending().to_vec(), first.version())
        .await
        .unwrap();
    let err = store
        .append(second.id(), second.pending().to_vec(), second.version())
        .await
        .unwrap_err();

    match err {
        GatewayError::ConcurrentModification {
            expected, actual, ..
        } => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected ConcurrentModification, got: {other:?}"),
    }

    // The losing event was not written.
    let history = store.load_history(app.id()).await.unwrap();
    let state = Application::from_history(app.id(), &history).unwrap();
    assert_eq!(state.state().user_emails, ["agent@lyon.fr", "first@lyon.fr"]);
}

async fn unknown_application_has_empty_history<S: EventStore>(store: &S) {
    assert!(store.load_history(Uuid::new_v4()).await.unwrap().is_empty());
}

async fn foreign_events_are_refused<S: EventStore>(store: &S) {
    let app = new_application();
    let err = store
        .append(Uuid::new_v4(), app.pending().to_vec(), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Internal(_)));
}

#[tokio::test]
async fn surreal_append_and_reload() {
    append_and_reload(&setup().await).await;
}

#[tokio::test]
async fn surreal_stale_writer_is_rejected() {
    stale_writer_is_rejected(&setup().await).await;
}

#[tokio::test]
async fn surreal_unknown_application_has_empty_history() {
    unknown_application_has_empty_history(&setup().await).await;
}

#[tokio::test]
async fn surreal_foreign_events_are_refused() {
    foreign_events_are_refused(&setup().await).await;
}

#[tokio::test]
async fn surreal_empty_append_is_a_no_op() {
    let store = setup().await;
    let version = store.append(Uuid::new_v4(), Vec::new(), 0).await.unwrap();
    assert_eq!(version, 0);
}

#[tokio::test]
async fn memory_append_and_reload() {
    append_and_reload(&MemoryEventStore::new()).await;
}

#[tokio::test]
async fn memory_stale_writer_is_rejected() {
    stale_writer_is_rejected(&MemoryEventStore::new()).await;
}

#[tokio::test]
async fn memory_unknown_application_has_empty_history() {
    unknown_application_has_empty_history(&MemoryEventStore::new()).await;
}

#[tokio::test]
async fn memory_foreign_events_are_refused() {
    foreign_events_are_refused(&MemoryEventStore::new()).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    datagate_db::run_migrations(&db).await.unwrap();
    datagate_db::run_migrations(&db).await.unwrap();
}
