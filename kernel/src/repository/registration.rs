use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::EventId,
    registration::{event::CreateRegistration, Registration, RegistrationOutcome},
};

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    // 重複チェック・定員チェック・INSERT をひとつのトランザクションで行う。
    // 業務上の却下（duplicate / full）は Ok の結果として返し、
    // Err はインフラ起因の失敗のみとする
    async fn register(&self, event: CreateRegistration) -> AppResult<RegistrationOutcome>;
    // イベントに対する現在の登録数を取得する
    async fn count_for_event(&self, event_id: EventId) -> AppResult<i64>;
    // イベントタイトルを結合した全登録の一覧を登録日時の新しい順に取得する
    async fn find_all_with_event_title(&self) -> AppResult<Vec<Registration>>;
}
