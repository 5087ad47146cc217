#![allow(dead_code)]

use crux_core::testing::AppTester;
use serde_json::json;

use wayfarer_core::capabilities::{HttpRequest, HttpResponse, HttpResult};
use wayfarer_core::{App, Effect, Event, Model};

pub type Tester = AppTester<App, Effect>;
pub type HttpEffectRequest = crux_core::Request<HttpRequest>;

pub fn body(value: &serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("fixture serializes")
}

pub fn user_payload() -> serde_json::Value {
    json!({
        "user": {"id": "u-1", "name": "Asta", "email": "asta@example.com"}
    })
}

pub fn trip_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "destination": "Reykjavik",
        "startDate": "2024-06-01",
        "endDate": "2024-06-10"
    })
}

pub fn entry_json(id: &str, trip_id: &str, rating: i64) -> serde_json::Value {
    json!({
        "id": id,
        "tripId": trip_id,
        "date": "2024-06-02",
        "location": "Blue Lagoon",
        "content": "Soaked in the silica water until sunset.",
        "rating": rating
    })
}

/// The HTTP requests issued by an update, in order.
pub fn http_requests(effects: Vec<Effect>) -> Vec<HttpEffectRequest> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn expect_one_http(effects: Vec<Effect>) -> HttpEffectRequest {
    let mut requests = http_requests(effects);
    assert_eq!(requests.len(), 1, "expected exactly one HTTP request");
    requests.remove(0)
}

pub fn has_render(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}

/// Resolves a request and feeds every resulting event back into the app,
/// returning the HTTP requests those follow-up updates issued.
pub fn resolve_and_feed(
    app: &Tester,
    model: &mut Model,
    request: &mut HttpEffectRequest,
    result: HttpResult,
) -> Vec<HttpEffectRequest> {
    let update = app.resolve(request, result).expect("request resolves");

    let mut requests = Vec::new();
    for event in update.events {
        let update = app.update(event, model);
        requests.extend(http_requests(update.effects));
    }
    requests
}

/// Drives a full login against a remote store holding `trips`.
pub fn login(app: &Tester, model: &mut Model, trips: &serde_json::Value) {
    let update = app.update(
        Event::LoginSubmitted {
            email: "asta@example.com".into(),
            password: "hunter2".into(),
        },
        model,
    );

    let mut login_request = expect_one_http(update.effects);
    let mut refresh = resolve_and_feed(
        app,
        model,
        &mut login_request,
        Ok(HttpResponse::ok(body(&user_payload()))),
    );

    assert_eq!(refresh.len(), 1, "login triggers a trip refresh");
    let leftover = resolve_and_feed(app, model, &mut refresh[0], Ok(HttpResponse::ok(body(trips))));
    assert!(leftover.is_empty());
}
