//! Event roster: registrations, capacity reports, and attendance tracking.
//!
//! A catalog holds participants, the events they host, and the registrations
//! linking the two. On top of it sit two components:
//!
//! - the **registrar**, which validates and records a registration request
//! - the **aggregator**, which derives per-event reports and the list of
//!   events that still have spots left
//!
//! Both are plain functions over a [`Catalog`]. The [`reducer`] module wires
//! them into a [`roster_runtime::Store`], which owns the catalog and admits
//! one writer at a time.
//!
//! # Quick Start
//!
//! ```no_run
//! use roster::{
//!     Catalog, RawId, RegistrationOutcome, RosterAction, RosterEnvironment, RosterReducer,
//!     RosterState,
//! };
//! use roster_core::environment::SystemClock;
//! use roster_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::load("roster/data/catalog.json")?;
//! let env = RosterEnvironment::new(Arc::new(SystemClock));
//! let store = Store::new(RosterState::new(catalog), RosterReducer::new(), env);
//!
//! let outcome = store
//!     .send_and_inspect(
//!         RosterAction::Register {
//!             user_id: RawId::from("3"),
//!             event_id: RawId::from("104"),
//!         },
//!         |s| s.last_outcome.as_ref().map(RegistrationOutcome::from),
//!     )
//!     .await?;
//! println!("{}", serde_json::to_string(&outcome)?);
//!
//! let report = store
//!     .state(|s| roster::aggregator::build_registration_report(&s.catalog))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod reducer;
pub mod registrar;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogDocument};
pub use error::{CatalogError, RegistrationError};
pub use reducer::{RosterAction, RosterEnvironment, RosterReducer, RosterState};
pub use registrar::{RawId, RegistrationOutcome, RegistrationReceipt};
pub use types::{Capacity, CountryCode, Event, EventId, Participant, ParticipantId, Registration};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use crate::catalog::Catalog;
    use crate::types::{
        Capacity, CountryCode, Event, EventId, Participant, ParticipantId, Registration,
    };
    use chrono::{DateTime, NaiveDate};

    /// The bundled sample catalog
    pub fn sample_catalog() -> Catalog {
        Catalog::from_json(include_str!("../data/catalog.json")).unwrap()
    }

    pub fn participant(id: u32, name: &str) -> Participant {
        Participant {
            id: ParticipantId::new(id),
            name: name.to_string(),
            country: CountryCode::try_from("US").unwrap(),
            joined_at: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    pub fn event(id: u32, host_id: u32, capacity: u32) -> Event {
        Event {
            id: EventId::new(id),
            title: format!("Event {id}"),
            host_id: ParticipantId::new(host_id),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            capacity: Capacity::new(capacity),
        }
    }

    /// Catalog whose events are `(id, capacity, registered)` triples
    ///
    /// Participants `1..=max(registered)` exist (at least participant 1, the
    /// host of every event); event `i` is joined by participants `1..=registered`.
    pub fn catalog_with_load(events: &[(u32, u32, u32)]) -> Catalog {
        let mut catalog = Catalog::new();
        let people = events.iter().map(|&(_, _, n)| n).max().unwrap_or(0).max(1);
        for id in 1..=people {
            catalog.add_participant(participant(id, &format!("P{id}"))).unwrap();
        }

        let at = DateTime::from_timestamp_millis(1_740_000_000_000).unwrap();
        for &(id, capacity, registered) in events {
            catalog.add_event(event(id, 1, capacity)).unwrap();
            for user in 1..=registered {
                catalog
                    .seed_registration(Registration::new(
                        ParticipantId::new(user),
                        EventId::new(id),
                        at,
                    ))
                    .unwrap();
            }
        }
        catalog
    }
}
