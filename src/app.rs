use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capabilities::{Capabilities, HttpError, HttpRequest, HttpResult};
use crate::event::Event;
use crate::model::{
    AuthMode, BusyKind, CreateEntryRequest, CreateTripRequest, Entry, EntryDraft, LoginRequest,
    LoginResponse, Model, RegisterRequest, Screen, Trip,
};
use crate::{
    extract_server_message, AppError, EntryId, ErrorKind, StatusMessage, TripId, UserId,
    FALLBACK_ERROR_MESSAGE, REGISTRATION_SUCCESS_MESSAGE,
};

#[derive(Default)]
pub struct App;

impl App {
    /// Claims the in-flight slot and hands the request to the shell. A
    /// request that fails to build surfaces a status instead of claiming
    /// the slot.
    fn submit<F>(
        model: &mut Model,
        caps: &Capabilities,
        kind: BusyKind,
        request: Result<HttpRequest, HttpError>,
        make_event: F,
    ) where
        F: FnOnce(HttpResult) -> Event + Send + 'static,
    {
        match request {
            Ok(request) => {
                model.busy = Some(kind);
                caps.http.send(request, make_event);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to build request");
                model.set_status(StatusMessage::error(FALLBACK_ERROR_MESSAGE));
            }
        }
    }

    fn send_trips_refresh(model: &Model, caps: &Capabilities, user_id: UserId) {
        let request = HttpRequest::get(model.config.trips_for_user_url(&user_id));
        caps.http.send(request, move |result| Event::TripsResponse {
            user_id,
            result: Box::new(result),
        });
    }

    fn send_entries_refresh(model: &Model, caps: &Capabilities, trip_id: TripId) {
        let request = HttpRequest::get(model.config.entries_for_trip_url(&trip_id));
        caps.http.send(request, move |result| Event::EntriesResponse {
            trip_id,
            result: Box::new(result),
        });
    }

    fn transport_error(error: &HttpError) -> AppError {
        match error {
            HttpError::Network(msg) => {
                AppError::new(ErrorKind::Connection, "Network error").with_internal(msg.clone())
            }
            HttpError::Timeout { timeout_ms } => {
                AppError::new(ErrorKind::Timeout, "Request timed out")
                    .with_internal(format!("{timeout_ms}ms"))
            }
            HttpError::InvalidRequest(msg) => {
                AppError::new(ErrorKind::Unknown, "Request failed").with_internal(msg.clone())
            }
        }
    }

    /// Auth endpoints surface the server's message verbatim, with the
    /// generic fallback when the body carries none.
    fn auth_rejection(status: u16, body: &[u8]) -> StatusMessage {
        let message = extract_server_message(Some(body))
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
        tracing::debug!(status, "authentication rejected");
        StatusMessage::error(message)
    }

    fn handle_login_response(result: HttpResult, model: &mut Model, caps: &Capabilities) {
        model.finish_busy();

        match result {
            Ok(response) if response.is_success() => match response.json::<LoginResponse>() {
                Ok(payload) => {
                    let user_id = payload.user.id.clone();
                    model.session.begin(payload.user);
                    model.clear_status();
                    model.screen = Screen::Dashboard;
                    Self::send_trips_refresh(model, caps, user_id);
                }
                Err(e) => {
                    tracing::error!(error = %e, "login response did not parse");
                    model.set_status(StatusMessage::error(FALLBACK_ERROR_MESSAGE));
                }
            },
            Ok(response) => {
                model.set_status(Self::auth_rejection(response.status, &response.body));
            }
            Err(e) => {
                model.set_status(StatusMessage::from(&Self::transport_error(&e)));
            }
        }
    }

    fn handle_register_response(result: HttpResult, model: &mut Model) {
        model.finish_busy();

        match result {
            Ok(response) if response.is_success() => {
                // Registration never authenticates; the user signs in
                // explicitly afterwards.
                model.auth_mode = AuthMode::Login;
                model.set_status(StatusMessage::success(REGISTRATION_SUCCESS_MESSAGE));
            }
            Ok(response) => {
                model.set_status(Self::auth_rejection(response.status, &response.body));
            }
            Err(e) => {
                model.set_status(StatusMessage::from(&Self::transport_error(&e)));
            }
        }
    }

    fn handle_trips_response(user_id: &UserId, result: &HttpResult, model: &mut Model) {
        if !model.session.is_current_user(user_id) {
            tracing::debug!(user_id = %user_id, "discarding trips for a stale session");
            return;
        }

        match result {
            Ok(response) if response.is_success() => match response.json::<Vec<Trip>>() {
                Ok(trips) => {
                    model.trips = trips;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "trip list did not parse; keeping previous list");
                }
            },
            Ok(response) => {
                tracing::warn!(status = response.status, "trip refresh failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "trip refresh failed");
            }
        }
    }

    fn handle_entries_response(trip_id: &TripId, result: &HttpResult, model: &mut Model) {
        // Last selection wins: a response for anything but the current
        // selection is stale and must not be shown.
        if model.selected_trip_id() != Some(trip_id) {
            tracing::debug!(trip_id = %trip_id, "discarding entries for a superseded selection");
            return;
        }

        match result {
            Ok(response) if response.is_success() => match response.json::<Vec<Entry>>() {
                Ok(entries) => {
                    model.entries = entries;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "entry list did not parse; keeping previous list");
                }
            },
            Ok(response) => {
                tracing::warn!(status = response.status, "entry refresh failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "entry refresh failed");
            }
        }
    }

    fn handle_create_trip_response(result: HttpResult, model: &mut Model, caps: &Capabilities) {
        model.finish_busy();

        match result {
            Ok(response) if response.is_success() => {
                model.trip_draft.reset();
                model.clear_status();
                model.screen = Screen::Dashboard;
                if let Some(user_id) = model.session.user_id().cloned() {
                    Self::send_trips_refresh(model, caps, user_id);
                }
            }
            Ok(response) => {
                // Draft preserved so the user can retry.
                let error = AppError::from_http_status(response.status, Some(&response.body));
                tracing::warn!(status = response.status, "trip creation failed");
                model.set_status(StatusMessage::from(&error));
            }
            Err(e) => {
                model.set_status(StatusMessage::from(&Self::transport_error(&e)));
            }
        }
    }

    fn handle_delete_trip_response(
        trip_id: &TripId,
        result: &HttpResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        model.finish_busy();

        // The delete outcome is advisory only; the refetch below reconciles
        // the list with whatever the server actually did.
        match result {
            Ok(response) if response.is_success() => {}
            Ok(response) => {
                tracing::warn!(status = response.status, trip_id = %trip_id, "delete reported failure");
            }
            Err(e) => {
                tracing::warn!(error = %e, trip_id = %trip_id, "delete did not complete");
            }
        }

        if let Some(user_id) = model.session.user_id().cloned() {
            Self::send_trips_refresh(model, caps, user_id);
        }
    }

    fn handle_create_entry_response(
        trip_id: TripId,
        result: HttpResult,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        model.finish_busy();

        match result {
            Ok(response) if response.is_success() => {
                model.entry_draft.reset();
                model.clear_status();
                model.screen = Screen::Journal;
                Self::send_entries_refresh(model, caps, trip_id);
            }
            Ok(response) => {
                let error = AppError::from_http_status(response.status, Some(&response.body));
                tracing::warn!(status = response.status, "entry creation failed");
                model.set_status(StatusMessage::from(&error));
            }
            Err(e) => {
                model.set_status(StatusMessage::from(&Self::transport_error(&e)));
            }
        }
    }

    fn dashboard_view(model: &Model) -> ScreenView {
        ScreenView::Dashboard {
            trips: model.trips.iter().map(TripCard::from).collect(),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[allow(clippy::too_many_lines)]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        tracing::trace!(event = event.name(), "handling event");

        match event {
            Event::ApiBaseConfigured { base_url } => match crate::ApiConfig::new(&base_url) {
                Ok(config) => model.config = config,
                Err(e) => {
                    tracing::warn!(error = %e, "rejected API base override");
                }
            },

            Event::ToggleAuthMode => {
                if model.screen == Screen::Login {
                    model.auth_mode = model.auth_mode.toggle();
                    model.clear_status();
                }
            }

            Event::LoginSubmitted { email, password } => {
                if model.is_authenticated() {
                    return;
                }
                if model.busy.is_some() {
                    tracing::debug!("login ignored while a request is in flight");
                    return;
                }

                model.clear_status();
                let request = HttpRequest::post(model.config.login_url())
                    .with_json(&LoginRequest { email, password });
                Self::submit(model, caps, BusyKind::Auth, request, |result| {
                    Event::LoginResponse(Box::new(result))
                });
            }

            Event::LoginResponse(result) => {
                Self::handle_login_response(*result, model, caps);
            }

            Event::RegisterSubmitted {
                name,
                email,
                password,
            } => {
                if model.is_authenticated() {
                    return;
                }
                if model.busy.is_some() {
                    tracing::debug!("registration ignored while a request is in flight");
                    return;
                }

                model.clear_status();
                let request = HttpRequest::post(model.config.register_url()).with_json(
                    &RegisterRequest {
                        name,
                        email,
                        password,
                    },
                );
                Self::submit(model, caps, BusyKind::Auth, request, |result| {
                    Event::RegisterResponse(Box::new(result))
                });
            }

            Event::RegisterResponse(result) => {
                Self::handle_register_response(*result, model);
            }

            Event::LogoutRequested => {
                model.clear_session_state();
            }

            Event::DashboardRequested => {
                // The selected trip is retained; it only matters on the
                // journal screens and is replaced by the next selection.
                if model.is_authenticated() {
                    model.screen = Screen::Dashboard;
                }
            }

            Event::ProfileRequested => {
                if model.is_authenticated() {
                    model.screen = Screen::Profile;
                }
            }

            Event::TripSelected { trip_id } => {
                let Some(trip) = model.trip(&trip_id).cloned() else {
                    tracing::debug!(trip_id = %trip_id, "selected trip is no longer listed");
                    return;
                };

                // A journal loaded for another trip must not be visible
                // while the new one loads.
                if model.selected_trip_id() != Some(&trip_id) {
                    model.entries.clear();
                }
                model.selected_trip = Some(trip);
                model.screen = Screen::Journal;
                Self::send_entries_refresh(model, caps, trip_id);
            }

            Event::NewTripRequested => {
                if model.screen == Screen::Dashboard {
                    model.screen = Screen::NewTrip;
                }
            }

            Event::TripFieldChanged(field) => {
                model.trip_draft.apply(field);
            }

            Event::NewTripSubmitted => {
                if model.screen != Screen::NewTrip {
                    return;
                }
                if model.busy.is_some() {
                    tracing::debug!("trip submission ignored while a request is in flight");
                    return;
                }
                let Some(user_id) = model.session.user_id().cloned() else {
                    return;
                };

                let payload = CreateTripRequest::from_draft(&model.trip_draft, user_id);
                let request = HttpRequest::post(model.config.trips_url())
                    .with_header("Idempotency-Key", Uuid::new_v4().to_string())
                    .with_json(&payload);
                Self::submit(model, caps, BusyKind::CreateTrip, request, |result| {
                    Event::CreateTripResponse(Box::new(result))
                });
            }

            Event::NewTripCancelled => {
                if model.screen == Screen::NewTrip {
                    model.trip_draft.reset();
                    model.screen = Screen::Dashboard;
                }
            }

            Event::CreateTripResponse(result) => {
                Self::handle_create_trip_response(*result, model, caps);
            }

            Event::DeleteTripRequested { trip_id } => {
                if !model.is_authenticated() {
                    return;
                }
                if model.busy.is_some() {
                    tracing::debug!("delete ignored while a request is in flight");
                    return;
                }

                let request = HttpRequest::delete(model.config.trip_url(&trip_id));
                Self::submit(model, caps, BusyKind::DeleteTrip, Ok(request), move |result| {
                    Event::DeleteTripResponse {
                        trip_id,
                        result: Box::new(result),
                    }
                });
            }

            Event::DeleteTripResponse { trip_id, result } => {
                Self::handle_delete_trip_response(&trip_id, &result, model, caps);
            }

            Event::TripsResponse { user_id, result } => {
                Self::handle_trips_response(&user_id, &result, model);
            }

            Event::NewEntryRequested => {
                if model.screen == Screen::Journal {
                    model.screen = Screen::NewEntry;
                }
            }

            Event::EntryFieldChanged(field) => {
                model.entry_draft.apply(field);
            }

            Event::NewEntrySubmitted => {
                if model.screen != Screen::NewEntry {
                    return;
                }
                if model.busy.is_some() {
                    tracing::debug!("entry submission ignored while a request is in flight");
                    return;
                }
                let Some(trip_id) = model.selected_trip_id().cloned() else {
                    return;
                };

                let payload = CreateEntryRequest::from_draft(&model.entry_draft, trip_id.clone());
                let request = HttpRequest::post(model.config.entries_url())
                    .with_header("Idempotency-Key", Uuid::new_v4().to_string())
                    .with_json(&payload);
                Self::submit(model, caps, BusyKind::CreateEntry, request, move |result| {
                    Event::CreateEntryResponse {
                        trip_id,
                        result: Box::new(result),
                    }
                });
            }

            Event::NewEntryCancelled => {
                if model.screen == Screen::NewEntry {
                    model.entry_draft.reset();
                    model.screen = Screen::Journal;
                }
            }

            Event::CreateEntryResponse { trip_id, result } => {
                Self::handle_create_entry_response(trip_id, *result, model, caps);
            }

            Event::EntriesResponse { trip_id, result } => {
                Self::handle_entries_response(&trip_id, &result, model);
            }

            Event::DismissStatus => {
                model.clear_status();
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        let screen = match model.screen {
            Screen::Login => ScreenView::Login {
                mode: model.auth_mode,
            },
            Screen::Dashboard => Self::dashboard_view(model),
            Screen::NewTrip => ScreenView::NewTrip {
                draft: model.trip_draft.clone(),
            },
            // A journal screen without a selection has nothing to show;
            // fall back to the trip list.
            Screen::Journal => match &model.selected_trip {
                Some(trip) => ScreenView::Journal {
                    trip: TripHeader::from(trip),
                    entries: model.entries.iter().map(EntryCard::from).collect(),
                },
                None => Self::dashboard_view(model),
            },
            Screen::NewEntry => match &model.selected_trip {
                Some(trip) => ScreenView::NewEntry {
                    trip: TripHeader::from(trip),
                    draft: EntryDraftView::from(&model.entry_draft),
                },
                None => Self::dashboard_view(model),
            },
            Screen::Profile => match model.session.user() {
                Some(user) => ScreenView::Profile {
                    name: user.name.clone(),
                    email: user.email.clone(),
                    trip_count: model.trips.len(),
                    // Covers the currently loaded journal, not all trips.
                    entry_count: model.entries.len(),
                },
                None => ScreenView::Login {
                    mode: model.auth_mode,
                },
            },
        };

        ViewModel {
            screen,
            status: model.status.clone(),
            is_busy: model.busy.is_some(),
            is_authenticated: model.is_authenticated(),
        }
    }
}

// --- View model ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripCard {
    pub id: TripId,
    pub title: String,
    pub destination: String,
    pub date_range: String,
}

impl From<&Trip> for TripCard {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            title: trip.title.clone(),
            destination: trip.destination.clone(),
            date_range: format!("{} - {}", trip.start_date, trip.end_date),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripHeader {
    pub id: TripId,
    pub title: String,
    pub destination: String,
}

impl From<&Trip> for TripHeader {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            title: trip.title.clone(),
            destination: trip.destination.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryCard {
    pub id: EntryId,
    pub date: String,
    pub location: String,
    pub content: String,
    pub rating: u8,
    pub stars: String,
}

impl From<&Entry> for EntryCard {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            date: entry.date.clone(),
            location: entry.location.clone(),
            content: entry.content.clone(),
            rating: entry.rating.value(),
            stars: entry.rating.stars(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryDraftView {
    pub date: String,
    pub location: String,
    pub content: String,
    pub rating: u8,
    pub stars: String,
}

impl From<&EntryDraft> for EntryDraftView {
    fn from(draft: &EntryDraft) -> Self {
        Self {
            date: draft.date.clone(),
            location: draft.location.clone(),
            content: draft.content.clone(),
            rating: draft.rating.value(),
            stars: draft.rating.stars(),
        }
    }
}

/// One variant per screen, carrying only what that screen renders.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScreenView {
    Login {
        mode: AuthMode,
    },
    Dashboard {
        trips: Vec<TripCard>,
    },
    NewTrip {
        draft: crate::model::TripDraft,
    },
    Journal {
        trip: TripHeader,
        entries: Vec<EntryCard>,
    },
    NewEntry {
        trip: TripHeader,
        draft: EntryDraftView,
    },
    Profile {
        name: String,
        email: String,
        trip_count: usize,
        entry_count: usize,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub screen: ScreenView,
    pub status: Option<StatusMessage>,
    pub is_busy: bool,
    pub is_authenticated: bool,
}
