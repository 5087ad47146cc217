use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::{EntryId, Rating, StatusMessage, TripId, UserId};

/// The authenticated traveler. Replaced wholesale on login, cleared on
/// logout, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(alias = "_id")]
    pub id: TripId,
    pub title: String,
    pub destination: String,
    // Dates are opaque calendar-date strings ("2024-06-01"). The server is
    // the authority; the client does not parse or order them.
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(alias = "_id")]
    pub id: EntryId,
    pub trip_id: TripId,
    pub date: String,
    pub location: String,
    pub content: String,
    pub rating: Rating,
}

// --- Wire payloads ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub title: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub user_id: UserId,
}

impl CreateTripRequest {
    #[must_use]
    pub fn from_draft(draft: &TripDraft, user_id: UserId) -> Self {
        Self {
            title: draft.title.clone(),
            destination: draft.destination.clone(),
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub date: String,
    pub location: String,
    pub content: String,
    pub rating: Rating,
    pub trip_id: TripId,
}

impl CreateEntryRequest {
    #[must_use]
    pub fn from_draft(draft: &EntryDraft, trip_id: TripId) -> Self {
        Self {
            date: draft.date.clone(),
            location: draft.location.clone(),
            content: draft.content.clone(),
            rating: draft.rating,
            trip_id,
        }
    }
}

// --- Form buffers ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripField {
    Title(String),
    Destination(String),
    StartDate(String),
    EndDate(String),
}

/// Staging record for a trip being created. Text fields accept anything,
/// including empty; the server decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDraft {
    pub title: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
}

impl TripDraft {
    /// Merges a single field, leaving the others untouched.
    pub fn apply(&mut self, field: TripField) {
        match field {
            TripField::Title(value) => self.title = value,
            TripField::Destination(value) => self.destination = value,
            TripField::StartDate(value) => self.start_date = value,
            TripField::EndDate(value) => self.end_date = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryField {
    Date(String),
    Location(String),
    Content(String),
    Rating(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub date: String,
    pub location: String,
    pub content: String,
    pub rating: Rating,
}

impl EntryDraft {
    /// Merges a single field. Ratings are clamped into range here so an
    /// out-of-range value can never reach a submission.
    pub fn apply(&mut self, field: EntryField) {
        match field {
            EntryField::Date(value) => self.date = value,
            EntryField::Location(value) => self.location = value,
            EntryField::Content(value) => self.content = value,
            EntryField::Rating(value) => self.rating = Rating::clamped(value),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// --- Session ---

/// At most one authenticated user at a time. All trip and entry data is
/// scoped to this session and discarded when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_current_user(&self, id: &UserId) -> bool {
        self.user_id() == Some(id)
    }

    pub fn begin(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn end(&mut self) {
        self.user = None;
    }
}

// --- Navigation ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Login,
    Dashboard,
    NewTrip,
    Journal,
    NewEntry,
    Profile,
}

impl Screen {
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Self::Login)
    }

    /// The selected trip is meaningful only on these screens.
    #[must_use]
    pub const fn uses_selected_trip(self) -> bool {
        matches!(self, Self::Journal | Self::NewEntry)
    }
}

/// Marker for the mutating request currently in flight. While set, further
/// submissions are ignored and the view reports busy so the shell can
/// disable the triggering control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyKind {
    Auth,
    CreateTrip,
    CreateEntry,
    DeleteTrip,
}

// --- Model ---

#[derive(Debug, Default)]
pub struct Model {
    pub screen: Screen,
    pub auth_mode: AuthMode,
    pub session: Session,
    pub trips: Vec<Trip>,
    pub entries: Vec<Entry>,
    pub selected_trip: Option<Trip>,
    pub trip_draft: TripDraft,
    pub entry_draft: EntryDraft,
    pub status: Option<StatusMessage>,
    pub busy: Option<BusyKind>,
    pub config: ApiConfig,
}

impl Model {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn selected_trip_id(&self) -> Option<&TripId> {
        self.selected_trip.as_ref().map(|t| &t.id)
    }

    #[must_use]
    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| &t.id == id)
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn finish_busy(&mut self) {
        self.busy = None;
    }

    /// Drops everything scoped to the authenticated user and returns the
    /// state machine to its initial screen.
    pub fn clear_session_state(&mut self) {
        self.session.end();
        self.trips.clear();
        self.entries.clear();
        self.selected_trip = None;
        self.trip_draft.reset();
        self.entry_draft.reset();
        self.status = None;
        self.busy = None;
        self.screen = Screen::Login;
        self.auth_mode = AuthMode::Login;
    }
}
