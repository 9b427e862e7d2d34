use crate::model::id::EventId;
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateEvent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, new)]
pub struct UpdateEventContent {
    pub event_id: EventId,
    pub title: String,
    pub body: String,
}
