//! Reducer wiring the registrar and trackers into a store.
//!
//! The catalog lives in [`RosterState`], owned by whichever store runs this
//! reducer. Commands are validated against it; events record what happened
//! and can be replayed onto a fresh state.

use crate::catalog::Catalog;
use crate::error::RegistrationError;
use crate::registrar::{self, RawId, RegistrationReceipt, SUCCESS_MESSAGE};
use crate::tracker::{EventTracker, RegistrationCounter};
use crate::types::{EventId, Registration};
use roster_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer};
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Everything the roster store owns
#[derive(Clone, Debug, Default)]
pub struct RosterState {
    /// Participants, events, and registrations
    pub catalog: Catalog,
    /// Per-event views and registrations
    pub tracker: EventTracker,
    /// Registrations made since the last reset
    pub session: RegistrationCounter,
    /// Result of the most recent registration request
    pub last_outcome: Option<Result<RegistrationReceipt, RegistrationError>>,
}

impl RosterState {
    /// Creates state around an existing catalog
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }
}

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the roster
#[derive(Clone, Debug, PartialEq)]
pub enum RosterAction {
    // Commands
    /// Register a participant for an event
    Register {
        /// Participant id as submitted
        user_id: RawId,
        /// Event id as submitted
        event_id: RawId,
    },

    /// Record that an event listing was viewed
    ViewEvent {
        /// Event viewed
        event_id: EventId,
    },

    /// Start the session registration count over
    ResetSession,

    // Events
    /// A registration was recorded
    Registered {
        /// The stored registration
        registration: Registration,
    },

    /// A registration request was rejected
    RegistrationRejected {
        /// Why it was rejected
        error: RegistrationError,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the roster reducer
#[derive(Clone)]
pub struct RosterEnvironment {
    /// Clock for registration timestamps
    pub clock: Arc<dyn Clock>,
}

impl RosterEnvironment {
    /// Creates a new `RosterEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the roster
#[derive(Clone, Debug, Default)]
pub struct RosterReducer;

impl RosterReducer {
    /// Creates a new `RosterReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Bumps trackers and stores the receipt for an accepted registration
    fn note_registration(state: &mut RosterState, registration: Registration) {
        state.tracker.track_registration(registration.event_id);
        let session_total = state.session.record();
        tracing::debug!(session_total, "Session registration count updated");
        state.last_outcome = Some(Ok(RegistrationReceipt {
            registration,
            message: SUCCESS_MESSAGE.to_string(),
        }));
    }

    /// Applies a replayed event to state
    fn apply_event(state: &mut RosterState, action: RosterAction) {
        match action {
            RosterAction::Registered { registration } => {
                if let Err(error) = state.catalog.seed_registration(registration.clone()) {
                    tracing::warn!(%error, "Skipping replayed registration");
                    return;
                }
                Self::note_registration(state, registration);
            },
            RosterAction::RegistrationRejected { error } => {
                state.last_outcome = Some(Err(error));
            },
            // Commands are not applied to state
            RosterAction::Register { .. }
            | RosterAction::ViewEvent { .. }
            | RosterAction::ResetSession => {},
        }
    }
}

impl Reducer for RosterReducer {
    type State = RosterState;
    type Action = RosterAction;
    type Environment = RosterEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            RosterAction::Register { user_id, event_id } => {
                match registrar::register(&mut state.catalog, &user_id, &event_id, env.clock.now()) {
                    Ok(receipt) => Self::note_registration(state, receipt.registration),
                    Err(error) => state.last_outcome = Some(Err(error)),
                }
                SmallVec::new()
            },

            RosterAction::ViewEvent { event_id } => {
                if state.catalog.event(event_id).is_some() {
                    state.tracker.track_view(event_id);
                } else {
                    tracing::debug!(%event_id, "Ignoring view of unknown event");
                }
                SmallVec::new()
            },

            RosterAction::ResetSession => {
                state.session.reset();
                SmallVec::new()
            },

            // ========== Events ==========
            event @ (RosterAction::Registered { .. } | RosterAction::RegistrationRejected { .. }) => {
                Self::apply_event(state, event);
                SmallVec::new()
            },
        }
    }
}
