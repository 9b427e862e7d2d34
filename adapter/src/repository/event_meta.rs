use crate::database::ConnectionPool;
use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::EventId;
use kernel::repository::event_meta::EventMetaRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct EventMetaRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventMetaRepository for EventMetaRepositoryImpl {
    async fn get(&self, event_id: EventId, key: &str) -> AppResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
                SELECT meta_value
                FROM event_meta
                WHERE event_id = $1 AND meta_key = $2
            "#,
        )
        .bind(event_id)
        .bind(key)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, event_id: EventId, key: &str, value: &str) -> AppResult<()> {
        // 同じキーへの保存は上書きとする
        sqlx::query(
            r#"
                INSERT INTO event_meta (event_id, meta_key, meta_value)
                VALUES ($1, $2, $3)
                ON CONFLICT (event_id, meta_key)
                DO UPDATE SET meta_value = EXCLUDED.meta_value
            "#,
        )
        .bind(event_id)
        .bind(key)
        .bind(value)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }
}
