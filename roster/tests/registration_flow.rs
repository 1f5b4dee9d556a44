//! Integration tests for the roster running inside a Store
//!
//! Drives registrations through the full reducer/store stack and checks the
//! reports derived from the resulting catalog.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use roster::aggregator::{build_registration_report, list_available_events, ReportEntry};
use roster::{
    Catalog, EventId, ParticipantId, RegistrationError, RegistrationOutcome, RosterAction,
    RosterEnvironment, RosterReducer, RosterState,
};
use roster_runtime::{Store, StoreError};
use roster_testing::test_clock;
use std::sync::Arc;

type RosterStore = Store<RosterState, RosterAction, RosterEnvironment, RosterReducer>;

fn sample_store() -> RosterStore {
    let catalog = Catalog::from_json(include_str!("../data/catalog.json")).unwrap();
    let env = RosterEnvironment::new(Arc::new(test_clock()));
    Store::new(RosterState::new(catalog), RosterReducer::new(), env)
}

fn register(user_id: &str, event_id: &str) -> RosterAction {
    RosterAction::Register {
        user_id: user_id.into(),
        event_id: event_id.into(),
    }
}

async fn outcome_of(store: &RosterStore, action: RosterAction) -> RegistrationOutcome {
    store
        .send_and_inspect(action, |s| s.last_outcome.as_ref().map(RegistrationOutcome::from))
        .await
        .unwrap()
        .expect("register always records an outcome")
}

#[tokio::test]
async fn test_demo_sequence() {
    let store = sample_store();

    let ok = outcome_of(&store, register("3", "104")).await;
    assert!(ok.success);
    assert_eq!(ok.message.as_deref(), Some("Successfully registered!"));

    let invalid = outcome_of(&store, register("invalid", "101")).await;
    assert!(!invalid.success);
    assert_eq!(invalid.error.as_deref(), Some("Invalid user ID or event ID"));

    let duplicate = outcome_of(&store, register("1", "101")).await;
    assert_eq!(
        duplicate.error.as_deref(),
        Some("Already registered for this event")
    );

    let (registrations, session) = store
        .state(|s| (s.catalog.registrations().len(), s.session.count()))
        .await;
    assert_eq!(registrations, 10);
    assert_eq!(session, 1);
}

#[tokio::test]
async fn test_report_reflects_new_registration() {
    let store = sample_store();

    let before = store
        .state(|s| build_registration_report(&s.catalog))
        .await;
    assert_eq!(before[&EventId::new(104)], ReportEntry::new(25, 2));

    store.send(register("3", "104")).await.unwrap();

    let (report, available) = store
        .state(|s| {
            (
                build_registration_report(&s.catalog),
                list_available_events(&s.catalog),
            )
        })
        .await;

    let entry = report[&EventId::new(104)];
    assert_eq!(entry.registered, 3);
    assert_eq!(entry.spots_left, 22);
    assert_eq!(entry.full_percentage, Some(12));

    let order: Vec<u32> = available.iter().map(|e| e.event.id.value()).collect();
    assert_eq!(order, vec![101, 103, 102, 104]);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations() {
    let store = sample_store();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .send_and_inspect(register("5", "101"), |s| s.last_outcome.clone())
                    .await
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();

    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(RegistrationError::DuplicateRegistration) => duplicates += 1,
            Err(other) => unreachable!("unexpected rejection: {other}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 15);

    let pairs = store
        .state(|s| {
            s.catalog
                .registrations()
                .iter()
                .filter(|r| r.links(ParticipantId::new(5), EventId::new(101)))
                .count()
        })
        .await;
    assert_eq!(pairs, 1);
}

#[tokio::test]
async fn test_views_and_registrations_tracked() {
    let store = sample_store();

    for _ in 0..3 {
        store
            .send(RosterAction::ViewEvent {
                event_id: EventId::new(102),
            })
            .await
            .unwrap();
    }
    store.send(register("1", "102")).await.unwrap();
    store.send(register("1", "102")).await.unwrap();

    let stats = store
        .state(|s| s.tracker.stats(EventId::new(102)))
        .await
        .unwrap();
    assert_eq!(stats.views, 3);
    assert_eq!(stats.registrations, 1);
}

#[tokio::test]
async fn test_shutdown_rejects_registrations() {
    let store = sample_store();
    store.shutdown();

    let result = store.send(register("3", "104")).await;
    assert_eq!(result, Err(StoreError::ShutdownInProgress));

    let registrations = store.state(|s| s.catalog.registrations().len()).await;
    assert_eq!(registrations, 9);
}
