use crate::model::id::EventId;
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateRegistration {
    pub event_id: EventId,
    pub user_name: String,
    pub user_email: String,
}
