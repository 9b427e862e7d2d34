use crate::database::{model::registration::RegistrationRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    event::{parse_capacity, EVENT_CAPACITY_KEY},
    id::{EventId, RegistrationId},
    registration::{
        evaluate_registration, event::CreateRegistration, Registration, RegistrationOutcome,
    },
};
use kernel::repository::registration::RegistrationRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RegistrationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RegistrationRepository for RegistrationRepositoryImpl {
    // 登録操作を行う
    async fn register(&self, event: CreateRegistration) -> AppResult<RegistrationOutcome> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のイベント ID をもつイベントが存在するか
        // - 同じメールアドレスの登録が既にないか
        // - 定員が設定されている場合、まだ空きがあるか
        //
        // 上記のすべてを通過した場合のみ、このブロック以降の INSERT に進む
        {
            //
            // ① イベントの存在確認
            //
            let event_row: Option<(EventId,)> = sqlx::query_as(
                r#"
                    SELECT event_id
                    FROM events
                    WHERE event_id = $1
                "#,
            )
            .bind(event.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if event_row.is_none() {
                return Err(AppError::EntityNotFound(format!(
                    "イベント（{}）が見つかりませんでした。",
                    event.event_id
                )));
            }

            //
            // ② 定員メタの読み取り。テキスト保存のためここで数値へ変換する
            //
            let capacity_row: Option<(String,)> = sqlx::query_as(
                r#"
                    SELECT meta_value
                    FROM event_meta
                    WHERE event_id = $1 AND meta_key = $2
                "#,
            )
            .bind(event.event_id)
            .bind(EVENT_CAPACITY_KEY)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            let capacity = capacity_row.and_then(|(value,)| parse_capacity(&value));

            //
            // ③ 同一イベント・同一メールアドレスの登録が既にないか確認
            //
            let duplicate: Option<(RegistrationId,)> = sqlx::query_as(
                r#"
                    SELECT id
                    FROM registrations
                    WHERE event_id = $1 AND user_email = $2
                    LIMIT 1
                "#,
            )
            .bind(event.event_id)
            .bind(&event.user_email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            //
            // ④ 現在の登録数
            //
            let (registered_count,): (i64,) = sqlx::query_as(
                r#"
                    SELECT COUNT(*)
                    FROM registrations
                    WHERE event_id = $1
                "#,
            )
            .bind(event.event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            // duplicate / full はインフラのエラーではなく業務上の結末として返す
            if let Some(outcome) =
                evaluate_registration(duplicate.is_some(), registered_count, capacity)
            {
                return Ok(outcome);
            }
        }

        // 登録処理を行う。registration_date はサーバー側の現在時刻が
        // デフォルトで入る（クライアントからは受け取らない）
        let res = sqlx::query(
            r#"
                INSERT INTO registrations (event_id, user_name, user_email)
                VALUES ($1, $2, $3)
            "#,
        )
        .bind(event.event_id)
        .bind(&event.user_name)
        .bind(&event.user_email)
        .execute(&mut *tx)
        .await;

        let res = match res {
            Ok(res) => res,
            // UNIQUE (event_id, user_email) に衝突した場合も duplicate として扱う
            Err(e) if is_unique_violation(&e) => return Ok(RegistrationOutcome::Duplicate),
            Err(e) => return Err(AppError::SpecificOperationError(e)),
        };

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No registration record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(RegistrationOutcome::Success)
    }

    // イベントに対する現在の登録数を取得する
    async fn count_for_event(&self, event_id: EventId) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
                SELECT COUNT(*)
                FROM registrations
                WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(count)
    }

    // すべての登録情報を取得する
    async fn find_all_with_event_title(&self) -> AppResult<Vec<Registration>> {
        // registrations テーブルにあるレコードを全件抽出する
        // events テーブルと LEFT JOIN し、イベントタイトルも一緒に抽出する
        // 出力するレコードは、登録日時の新しい順に並べる
        sqlx::query_as::<_, RegistrationRow>(
            r#"
                SELECT
                r.id,
                r.event_id,
                e.title AS event_title,
                r.user_name,
                r.user_email,
                r.registration_date
                FROM registrations AS r
                LEFT JOIN events AS e ON r.event_id = e.event_id
                ORDER BY r.registration_date DESC, r.id DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Registration::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

impl RegistrationRepositoryImpl {
    // register メソッドでのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
