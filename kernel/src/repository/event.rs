use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    event::{
        event::{CreateEvent, UpdateEventContent},
        Event,
    },
    id::EventId,
};

#[async_trait]
pub trait EventRepository: Send + Sync {
    // イベントを新規作成する
    async fn create(&self, event: CreateEvent) -> AppResult<EventId>;
    // タイトルと本文を更新する
    async fn update_content(&self, event: UpdateEventContent) -> AppResult<()>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    // 公開側の一覧ページに出すイベントを新しい順に取得する
    async fn find_all(&self) -> AppResult<Vec<Event>>;
}
