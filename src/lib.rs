#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod model;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use app::{App, ScreenView, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use config::ApiConfig;
pub use event::Event;
pub use model::{AuthMode, Entry, EntryDraft, Model, Screen, Session, Trip, TripDraft, User};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;
pub const DEFAULT_RATING: u8 = 5;

pub const CONNECTION_ERROR_MESSAGE: &str = "Cannot connect to server";
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful! Please login.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(pub String);

impl TripId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rating {0} is out of range [{RATING_MIN}, {RATING_MAX}]")]
    RatingOutOfRange(i64),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

/// A journal entry rating. Always an integer in `[RATING_MIN, RATING_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(v) if (RATING_MIN..=RATING_MAX).contains(&v) => Ok(Self(v)),
            _ => Err(ValidationError::RatingOutOfRange(value)),
        }
    }

    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(RATING_MIN), i64::from(RATING_MAX));
        u8::try_from(clamped).map_or(Self(RATING_MAX), Self)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Star rendering used by the journal views, e.g. `"★★★☆☆"` for 3.
    #[must_use]
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(RATING_MAX) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(DEFAULT_RATING)
    }
}

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        Self::from(rating.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{RATING_MAX}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Connection,
    Timeout,
    Auth,
    Validation,
    NotFound,
    Server,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Connection => "CONNECTION_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Auth => "AUTH_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Server => "SERVER_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Connection | ErrorKind::Timeout => CONNECTION_ERROR_MESSAGE.into(),
            ErrorKind::Auth | ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The requested item could not be found".into(),
            ErrorKind::Server | ErrorKind::Unknown => FALLBACK_ERROR_MESSAGE.into(),
        }
    }

    #[must_use]
    pub fn from_http_status(status: u16, body: Option<&[u8]>) -> Self {
        let kind = match status {
            400 | 422 => ErrorKind::Validation,
            401 | 403 | 409 => ErrorKind::Auth,
            404 => ErrorKind::NotFound,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        };

        let message =
            extract_server_message(body).unwrap_or_else(|| format!("HTTP error: {status}"));

        Self::new(kind, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
}

/// Pulls the server-provided `{"message": ...}` out of an error body, if any.
#[must_use]
pub fn extract_server_message(body: Option<&[u8]>) -> Option<String> {
    body.and_then(|b| serde_json::from_slice::<ApiErrorResponse>(b).ok())
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[default]
    Info,
    Success,
    Error,
}

/// The single inline message surface: auth errors, registration
/// confirmation, sync failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

impl From<&AppError> for StatusMessage {
    fn from(e: &AppError) -> Self {
        Self::error(e.user_facing_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rating_new_accepts_range() {
        for v in 1..=5 {
            assert_eq!(Rating::new(v).unwrap().value(), u8::try_from(v).unwrap());
        }
    }

    #[test]
    fn rating_new_rejects_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
    }

    #[test]
    fn rating_clamped_saturates() {
        assert_eq!(Rating::clamped(0).value(), 1);
        assert_eq!(Rating::clamped(6).value(), 5);
        assert_eq!(Rating::clamped(3).value(), 3);
    }

    #[test]
    fn rating_defaults_to_five_stars() {
        assert_eq!(Rating::default().value(), DEFAULT_RATING);
    }

    #[test]
    fn rating_stars_rendering() {
        assert_eq!(Rating::clamped(3).stars(), "★★★☆☆");
        assert_eq!(Rating::clamped(5).stars(), "★★★★★");
        assert_eq!(Rating::clamped(1).stars(), "★☆☆☆☆");
    }

    #[test]
    fn rating_deserializes_with_clamp() {
        let rating: Rating = serde_json::from_str("9").unwrap();
        assert_eq!(rating.value(), 5);
        let rating: Rating = serde_json::from_str("3").unwrap();
        assert_eq!(rating.value(), 3);
    }

    #[test]
    fn rating_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Rating::clamped(4)).unwrap(), "4");
    }

    #[test]
    fn error_from_auth_status_uses_server_message() {
        let body = br#"{"message":"Invalid credentials"}"#;
        let error = AppError::from_http_status(401, Some(body));
        assert_eq!(error.kind, ErrorKind::Auth);
        assert_eq!(error.user_facing_message(), "Invalid credentials");
    }

    #[test]
    fn error_from_status_without_body_falls_back() {
        let error = AppError::from_http_status(500, None);
        assert_eq!(error.kind, ErrorKind::Server);
        assert_eq!(error.user_facing_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn error_from_status_ignores_empty_message() {
        let body = br#"{"message":""}"#;
        let error = AppError::from_http_status(409, Some(body));
        assert_eq!(error.kind, ErrorKind::Auth);
        assert_eq!(error.message, "HTTP error: 409");
    }

    #[test]
    fn connection_errors_share_one_user_message() {
        let error = AppError::new(ErrorKind::Connection, "connection refused");
        assert_eq!(error.user_facing_message(), CONNECTION_ERROR_MESSAGE);
        let error = AppError::new(ErrorKind::Timeout, "timed out");
        assert_eq!(error.user_facing_message(), CONNECTION_ERROR_MESSAGE);
    }

    #[test]
    fn error_display_includes_internal() {
        let error = AppError::new(ErrorKind::Unknown, "Request failed").with_internal("io closed");
        assert_eq!(
            error.to_string(),
            "[UNKNOWN_ERROR] Request failed (internal: io closed)"
        );
    }

    #[test]
    fn typed_ids_are_not_interchangeable() {
        let trip = TripId::new("abc");
        let user = UserId::new("abc");
        // Different types; mixing them is a compile error. The assertion
        // documents that the underlying text is still comparable.
        assert_eq!(trip.as_str(), user.as_str());
    }

    proptest! {
        #[test]
        fn rating_clamped_always_in_range(v in any::<i64>()) {
            let rating = Rating::clamped(v);
            prop_assert!((RATING_MIN..=RATING_MAX).contains(&rating.value()));
        }

        #[test]
        fn rating_clamp_is_identity_in_range(v in i64::from(RATING_MIN)..=i64::from(RATING_MAX)) {
            prop_assert_eq!(i64::from(Rating::clamped(v)), v);
        }
    }
}
