use crate::capabilities::HttpResult;
use crate::model::{EntryField, TripField};
use crate::{TripId, UserId};

/// Everything that can happen to the core: user intents dispatched by the
/// shell, and responses coming back from the remote store. Response
/// variants carry the scope they were issued for so a response that
/// outlived its scope can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Shell configuration
    ApiBaseConfigured {
        base_url: String,
    },

    // Session store
    ToggleAuthMode,
    LoginSubmitted {
        email: String,
        password: String,
    },
    LoginResponse(Box<HttpResult>),
    RegisterSubmitted {
        name: String,
        email: String,
        password: String,
    },
    RegisterResponse(Box<HttpResult>),
    LogoutRequested,

    // Navigation
    DashboardRequested,
    ProfileRequested,
    TripSelected {
        trip_id: TripId,
    },

    // Trips
    NewTripRequested,
    TripFieldChanged(TripField),
    NewTripSubmitted,
    NewTripCancelled,
    CreateTripResponse(Box<HttpResult>),
    DeleteTripRequested {
        trip_id: TripId,
    },
    DeleteTripResponse {
        trip_id: TripId,
        result: Box<HttpResult>,
    },
    TripsResponse {
        user_id: UserId,
        result: Box<HttpResult>,
    },

    // Entries
    NewEntryRequested,
    EntryFieldChanged(EntryField),
    NewEntrySubmitted,
    NewEntryCancelled,
    CreateEntryResponse {
        trip_id: TripId,
        result: Box<HttpResult>,
    },
    EntriesResponse {
        trip_id: TripId,
        result: Box<HttpResult>,
    },

    // Status surface
    DismissStatus,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ApiBaseConfigured { .. } => "api_base_configured",
            Self::ToggleAuthMode => "toggle_auth_mode",
            Self::LoginSubmitted { .. } => "login_submitted",
            Self::LoginResponse(_) => "login_response",
            Self::RegisterSubmitted { .. } => "register_submitted",
            Self::RegisterResponse(_) => "register_response",
            Self::LogoutRequested => "logout_requested",
            Self::DashboardRequested => "dashboard_requested",
            Self::ProfileRequested => "profile_requested",
            Self::TripSelected { .. } => "trip_selected",
            Self::NewTripRequested => "new_trip_requested",
            Self::TripFieldChanged(_) => "trip_field_changed",
            Self::NewTripSubmitted => "new_trip_submitted",
            Self::NewTripCancelled => "new_trip_cancelled",
            Self::CreateTripResponse(_) => "create_trip_response",
            Self::DeleteTripRequested { .. } => "delete_trip_requested",
            Self::DeleteTripResponse { .. } => "delete_trip_response",
            Self::TripsResponse { .. } => "trips_response",
            Self::NewEntryRequested => "new_entry_requested",
            Self::EntryFieldChanged(_) => "entry_field_changed",
            Self::NewEntrySubmitted => "new_entry_submitted",
            Self::NewEntryCancelled => "new_entry_cancelled",
            Self::CreateEntryResponse { .. } => "create_entry_response",
            Self::EntriesResponse { .. } => "entries_response",
            Self::DismissStatus => "dismiss_status",
        }
    }
}
