//! Roster demo binary
//!
//! Loads the catalog, pushes a few registration requests through the store,
//! and prints the resulting reports as JSON.

use anyhow::Context;
use roster::aggregator;
use roster::config::Config;
use roster::host::Organizer;
use roster::{
    Catalog, EventId, ParticipantId, RawId, RegistrationOutcome, RosterAction,
    RosterEnvironment, RosterReducer, RosterState,
};
use roster_core::environment::SystemClock;
use roster_runtime::Store;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type RosterStore = Store<RosterState, RosterAction, RosterEnvironment, RosterReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,roster_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        catalog_path = %config.catalog_path.display(),
        organizer = %config.organizer,
        log_level = %config.log_level,
        "Configuration loaded"
    );

    let catalog = Catalog::load(&config.catalog_path).with_context(|| {
        format!("failed to load catalog from {}", config.catalog_path.display())
    })?;

    let env = RosterEnvironment::new(Arc::new(SystemClock));
    let store = Store::new(RosterState::new(catalog), RosterReducer::new(), env);

    // Registrations: valid, malformed, already registered
    for (user_id, event_id) in [("3", "104"), ("invalid", "101"), ("1", "101")] {
        let outcome = register(&store, user_id.into(), event_id.into()).await?;
        emit(&format!("register({user_id}, {event_id})"), &outcome, config.pretty)?;
    }

    for event_id in [101, 101, 103] {
        store
            .send(RosterAction::ViewEvent {
                event_id: EventId::new(event_id),
            })
            .await
            .context("failed to record event view")?;
    }

    let organizer = Organizer::new(config.organizer.as_str());
    let (report, available, summary, details, total_capacity) = store
        .state(|s| {
            (
                aggregator::titled_report(&s.catalog),
                aggregator::list_available_events(&s.catalog),
                organizer.host_summary(&s.catalog, ParticipantId::new(1)),
                aggregator::registration_details(&s.catalog),
                aggregator::total_capacity(&s.catalog),
            )
        })
        .await;

    emit("registration report", &report, config.pretty)?;
    emit("available events", &available, config.pretty)?;
    emit("host summary", &summary, config.pretty)?;
    emit("registration details", &details, config.pretty)?;
    emit("total capacity", &total_capacity, config.pretty)?;

    let (stats, session) = store
        .state(|s| (s.tracker.all_stats().clone(), s.session.count()))
        .await;
    emit("event stats", &stats, config.pretty)?;
    info!(session_registrations = session, "Demo complete");

    store.shutdown();
    Ok(())
}

async fn register(
    store: &RosterStore,
    user_id: RawId,
    event_id: RawId,
) -> anyhow::Result<Option<RegistrationOutcome>> {
    store
        .send_and_inspect(RosterAction::Register { user_id, event_id }, |s| {
            s.last_outcome.as_ref().map(RegistrationOutcome::from)
        })
        .await
        .context("store rejected registration")
}

fn emit<T: Serialize>(label: &str, value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .with_context(|| format!("failed to serialize {label}"))?;

    println!("# {label}\n{json}");
    Ok(())
}
