use kernel::model::{event::Event, id::EventId};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            event_id,
            title,
            body,
            created_at,
        } = value;
        Event {
            event_id,
            title,
            body,
            created_at,
        }
    }
}
