pub mod admin;
pub mod event;
pub mod health;

use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    Router::new()
        .merge(health::build_health_check_routers())
        .merge(event::build_event_routers())
        .merge(admin::build_admin_routers())
}
