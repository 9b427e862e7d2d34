use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::EventId;

// イベント ID をキーにした汎用のキーバリューメタデータ。
// 値はすべてテキストとして保存・返却される
#[async_trait]
pub trait EventMetaRepository: Send + Sync {
    async fn get(&self, event_id: EventId, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, event_id: EventId, key: &str, value: &str) -> AppResult<()>;
}
