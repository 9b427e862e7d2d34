use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::admin::{
    create_event, save_event, show_edit_event_form, show_new_event_form, show_registrations,
};

pub fn build_admin_routers() -> Router<AppRegistry> {
    let admin_routers = Router::new()
        .route("/events", post(create_event))
        .route("/events/new", get(show_new_event_form))
        .route("/events/:event_id", post(save_event))
        .route("/events/:event_id/edit", get(show_edit_event_form))
        .route("/registrations", get(show_registrations));

    Router::new().nest("/admin", admin_routers)
}
