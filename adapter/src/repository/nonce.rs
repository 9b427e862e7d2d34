use crate::redis::RedisClient;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::nonce::NonceToken;
use kernel::repository::nonce::NonceRepository;
use shared::error::AppResult;
use std::sync::Arc;
use uuid::Uuid;

#[derive(new)]
pub struct NonceRepositoryImpl {
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl NonceRepository for NonceRepositoryImpl {
    async fn issue(&self, action: &str) -> AppResult<NonceToken> {
        let token = NonceToken(Uuid::new_v4().simple().to_string());
        self.kv
            .set_ex(&nonce_key(action, token.value()), "1", self.ttl)
            .await?;
        Ok(token)
    }

    // GETDEL で取得と削除を同時に行い、トークンを使い捨てにする
    async fn consume(&self, action: &str, token: &str) -> AppResult<bool> {
        let value = self.kv.get_del(&nonce_key(action, token)).await?;
        Ok(value.is_some())
    }
}

fn nonce_key(action: &str, token: &str) -> String {
    format!("nonce:{action}:{token}")
}
