use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::nonce::NonceToken;

// フォーム偽造対策のワンタイムトークン。
// issue で発行したトークンは consume で一度だけ受理される
#[async_trait]
pub trait NonceRepository: Send + Sync {
    async fn issue(&self, action: &str) -> AppResult<NonceToken>;
    async fn consume(&self, action: &str, token: &str) -> AppResult<bool>;
}
