use kernel::model::{
    id::{EventId, RegistrationId},
    registration::{Registration, RegistrationEvent},
};
use sqlx::types::chrono::{DateTime, Utc};

// 管理側の一覧で使う、イベントタイトルを結合した登録レコード。
// イベントが削除済みの場合は event_title が None になる
#[derive(sqlx::FromRow)]
pub struct RegistrationRow {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub event_title: Option<String>,
    pub user_name: String,
    pub user_email: String,
    pub registration_date: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(value: RegistrationRow) -> Self {
        let RegistrationRow {
            id,
            event_id,
            event_title,
            user_name,
            user_email,
            registration_date,
        } = value;
        Registration {
            registration_id: id,
            user_name,
            user_email,
            registration_date,
            event: RegistrationEvent {
                event_id,
                title: event_title,
            },
        }
    }
}
