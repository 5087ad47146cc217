mod http;

pub use self::http::{
    Http, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResult, DEFAULT_TIMEOUT_MS,
};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
