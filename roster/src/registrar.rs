//! Registration validation and recording.
//!
//! A request passes through a fixed sequence of checks, and the first one
//! that fails decides the error:
//!
//! 1. both ids coerce to finite numbers ([`RegistrationError::InvalidInput`])
//! 2. the participant exists ([`RegistrationError::UserNotFound`])
//! 3. the event exists ([`RegistrationError::EventNotFound`])
//! 4. the pair is not registered yet ([`RegistrationError::DuplicateRegistration`])
//!
//! Only a request that clears all four appends to the catalog. Capacity is
//! not checked; events may be oversubscribed.

use crate::catalog::Catalog;
use crate::error::RegistrationError;
use crate::types::{EventId, ParticipantId, Registration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confirmation message returned with every accepted registration
pub const SUCCESS_MESSAGE: &str = "Successfully registered!";

/// An identifier as submitted by a caller, before coercion
///
/// Deserializes from a JSON number or string, so `3`, `3.0`, and `"3"` are
/// all accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Integral number
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Text, such as a form field
    Text(String),
}

impl RawId {
    /// Coerces the raw value into an id
    ///
    /// Returns `Ok(None)` for a finite number that cannot be an id
    /// (fractional, negative, or too large). Such values pass input
    /// validation and then fail the lookup.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidInput`] for empty or non-numeric
    /// text, NaN, and infinities.
    pub fn coerce(&self) -> Result<Option<u32>, RegistrationError> {
        match self {
            Self::Int(value) => Ok(u32::try_from(*value).ok()),
            Self::Float(value) => finite_to_id(*value),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(RegistrationError::InvalidInput);
                }
                if let Ok(value) = trimmed.parse::<i64>() {
                    return Ok(u32::try_from(value).ok());
                }
                let value = trimmed
                    .parse::<f64>()
                    .map_err(|_| RegistrationError::InvalidInput)?;
                finite_to_id(value)
            },
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range and fraction checked first
fn finite_to_id(value: f64) -> Result<Option<u32>, RegistrationError> {
    if !value.is_finite() {
        return Err(RegistrationError::InvalidInput);
    }
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Ok(None);
    }
    Ok(Some(value as u32))
}

impl From<&str> for RawId {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawId {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for RawId {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for RawId {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Proof of an accepted registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationReceipt {
    /// The registration that was appended
    pub registration: Registration,
    /// Confirmation text for the caller
    pub message: String,
}

/// Caller-facing result document
///
/// Serializes as `{"success": true, "message": …}` or
/// `{"success": false, "error": …}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    /// Whether the registration was recorded
    pub success: bool,
    /// Confirmation text, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error text, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<RegistrationReceipt, RegistrationError>> for RegistrationOutcome {
    fn from(result: &Result<RegistrationReceipt, RegistrationError>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                message: Some(receipt.message.clone()),
                error: None,
            },
            Err(error) => Self {
                success: false,
                message: None,
                error: Some(error.to_string()),
            },
        }
    }
}

/// Runs the four checks without touching the catalog
///
/// # Errors
///
/// Returns the [`RegistrationError`] for the first check that fails.
pub fn validate(
    catalog: &Catalog,
    user_id: &RawId,
    event_id: &RawId,
) -> Result<(ParticipantId, EventId), RegistrationError> {
    let (Ok(user), Ok(event)) = (user_id.coerce(), event_id.coerce()) else {
        return Err(RegistrationError::InvalidInput);
    };

    let user = user
        .map(ParticipantId::new)
        .filter(|id| catalog.participant(*id).is_some())
        .ok_or(RegistrationError::UserNotFound)?;

    let event = event
        .map(EventId::new)
        .filter(|id| catalog.event(*id).is_some())
        .ok_or(RegistrationError::EventNotFound)?;

    if catalog.is_registered(user, event) {
        return Err(RegistrationError::DuplicateRegistration);
    }

    Ok((user, event))
}

/// Validates a request and, if it passes, appends the registration
///
/// `now` becomes the registration timestamp.
///
/// # Errors
///
/// Returns the [`RegistrationError`] for the first check that fails; the
/// catalog is left untouched in that case.
pub fn register(
    catalog: &mut Catalog,
    user_id: &RawId,
    event_id: &RawId,
    now: DateTime<Utc>,
) -> Result<RegistrationReceipt, RegistrationError> {
    let (user, event) = validate(catalog, user_id, event_id).inspect_err(|error| {
        tracing::debug!(?user_id, ?event_id, %error, "Registration rejected");
    })?;

    let registration = Registration::new(user, event, now);
    catalog.append_registration(registration.clone());
    tracing::info!(user_id = %user, event_id = %event, "Registration recorded");

    Ok(RegistrationReceipt {
        registration,
        message: SUCCESS_MESSAGE.to_string(),
    })
}
