use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::event::{register_event, show_event, show_event_list};

pub fn build_event_routers() -> Router<AppRegistry> {
    let event_routers = Router::new()
        .route("/", get(show_event_list))
        .route("/register", post(register_event))
        .route("/:event_id", get(show_event));

    Router::new().nest("/events", event_routers)
}
