use crate::{
    model::{
        event::EventPageQuery, normalize_email, registration::RegisterEventRequest, sanitize_text,
    },
    view,
};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use chrono::Local;
use garde::Validate;
use kernel::model::{
    event::{
        EventDetails, EVENT_CAPACITY_KEY, EVENT_DATE_KEY, EVENT_LOCATION_KEY, EVENT_TIME_KEY,
    },
    id::EventId,
    nonce::REGISTER_EVENT_ACTION,
    registration::{event::CreateRegistration, RegistrationOutcome},
};
use kernel::repository::event_meta::EventMetaRepository;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

pub async fn show_event_list(State(registry): State<AppRegistry>) -> AppResult<Html<String>> {
    let events = registry.event_repository().find_all().await?;
    Ok(Html(view::event::render_event_list(&events)))
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    Query(query): Query<EventPageQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    let event = registry
        .event_repository()
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("event not found".into()))?;

    let details = load_event_details(registry.event_meta_repository(), event_id).await?;
    let registered_count = registry
        .registration_repository()
        .count_for_event(event_id)
        .await?;
    let nonce = registry
        .nonce_repository()
        .issue(REGISTER_EVENT_ACTION)
        .await?;
    // 登録後のリダイレクトで付くクエリパラメータを通知バナーにする
    let flash = query
        .registered
        .as_deref()
        .and_then(|v| v.parse::<RegistrationOutcome>().ok());
    let today = Local::now().date_naive();

    Ok(Html(view::event::render_event_page(
        &event,
        &details,
        registered_count,
        today,
        nonce.value(),
        flash,
    )))
}

// メタデータはキーごとにテキストで保存されているため、
// 4 つのキーを読み出して型のある詳細にまとめる
pub(crate) async fn load_event_details(
    meta: Arc<dyn EventMetaRepository>,
    event_id: EventId,
) -> AppResult<EventDetails> {
    let date = meta.get(event_id, EVENT_DATE_KEY).await?;
    let time = meta.get(event_id, EVENT_TIME_KEY).await?;
    let location = meta.get(event_id, EVENT_LOCATION_KEY).await?;
    let capacity = meta.get(event_id, EVENT_CAPACITY_KEY).await?;
    Ok(EventDetails::from_raw(date, time, location, capacity))
}

// 公開側の登録フォームの送信を処理する。
// トークン・入力検証の失敗は registered パラメータを付けずに黙って戻し、
// 重複・満席・保存失敗は registered パラメータで結果を伝える
pub async fn register_event(
    State(registry): State<AppRegistry>,
    Form(req): Form<RegisterEventRequest>,
) -> Redirect {
    if req.action != REGISTER_EVENT_ACTION {
        return Redirect::to("/events");
    }
    let Ok(event_id) = req.event_id.parse::<EventId>() else {
        return Redirect::to("/events");
    };
    if event_id.raw() <= 0 {
        return Redirect::to("/events");
    }

    let event_url = format!("/events/{event_id}");

    // 偽造対策トークンの検査。失敗したら副作用なしで終わる
    match registry
        .nonce_repository()
        .consume(REGISTER_EVENT_ACTION, &req.en_registration_nonce)
        .await
    {
        Ok(true) => {}
        Ok(false) => return Redirect::to(&event_url),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "nonce check failed");
            return Redirect::to(&event_url);
        }
    }

    if req.validate(&()).is_err() {
        return Redirect::to(&event_url);
    }
    let user_name = sanitize_text(&req.en_user_name);
    if user_name.is_empty() {
        return Redirect::to(&event_url);
    }
    let user_email = normalize_email(&req.en_user_email);

    let outcome = match registry
        .registration_repository()
        .register(CreateRegistration::new(event_id, user_name, user_email))
        .await
    {
        Ok(outcome) => outcome,
        Err(AppError::EntityNotFound(_)) => return Redirect::to("/events"),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "registration insert failed");
            RegistrationOutcome::Error
        }
    };

    Redirect::to(&format!("{event_url}?registered={outcome}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        build_registry, FakeEventMetaRepository, FakeEventRepository, FakeNonceRepository,
        FakeRegistrationRepository,
    };
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use std::sync::Arc;

    fn form(event_id: &str, name: &str, email: &str, nonce: &str) -> RegisterEventRequest {
        RegisterEventRequest {
            action: REGISTER_EVENT_ACTION.into(),
            event_id: event_id.into(),
            en_user_name: name.into(),
            en_user_email: email.into(),
            en_registration_nonce: nonce.into(),
        }
    }

    fn registry_for_capacity(
        capacity: Option<i64>,
    ) -> (
        AppRegistry,
        Arc<FakeRegistrationRepository>,
        Arc<FakeNonceRepository>,
    ) {
        let registrations = Arc::new(FakeRegistrationRepository::for_event(1, capacity));
        let nonces = Arc::new(FakeNonceRepository::new());
        let registry = build_registry(
            Arc::new(FakeEventRepository::with_event(1, "Meetup", "<p>Body</p>")),
            Arc::new(FakeEventMetaRepository::default()),
            registrations.clone(),
            nonces.clone(),
        );
        (registry, registrations, nonces)
    }

    fn location_of(redirect: Redirect) -> String {
        let res = redirect.into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        res.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn valid_submission_registers_and_redirects_with_success() {
        let (registry, registrations, nonces) = registry_for_capacity(None);
        nonces.prime(REGISTER_EVENT_ACTION, "tok");

        let redirect = register_event(
            State(registry),
            Form(form("1", "<b>Ann</b>", " Ann@X.COM ", "tok")),
        )
        .await;

        assert_eq!(location_of(redirect), "/events/1?registered=success");
        // 保存されるのはサニタイズ・正規化済みの値
        assert_eq!(
            registrations.rows(),
            vec![(1, "Ann".to_string(), "ann@x.com".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_or_invalid_nonce_leaves_no_row_and_no_outcome() {
        let (registry, registrations, _) = registry_for_capacity(None);

        // トークンを一度も発行していない
        let redirect =
            register_event(State(registry), Form(form("1", "Ann", "ann@x.com", "tok"))).await;

        assert_eq!(location_of(redirect), "/events/1");
        assert!(registrations.rows().is_empty());
    }

    #[tokio::test]
    async fn nonce_cannot_be_used_twice() {
        let (registry, registrations, nonces) = registry_for_capacity(None);
        nonces.prime(REGISTER_EVENT_ACTION, "tok");

        let first = register_event(
            State(registry.clone()),
            Form(form("1", "Ann", "ann@x.com", "tok")),
        )
        .await;
        assert_eq!(location_of(first), "/events/1?registered=success");

        let second = register_event(
            State(registry),
            Form(form("1", "Bob", "bob@x.com", "tok")),
        )
        .await;
        assert_eq!(location_of(second), "/events/1");
        assert_eq!(registrations.rows().len(), 1);
    }

    #[tokio::test]
    async fn unknown_action_or_bad_event_id_redirects_to_the_list() {
        let (registry, registrations, nonces) = registry_for_capacity(None);
        nonces.prime(REGISTER_EVENT_ACTION, "tok");

        let mut req = form("1", "Ann", "ann@x.com", "tok");
        req.action = "something_else".into();
        let redirect = register_event(State(registry.clone()), Form(req)).await;
        assert_eq!(location_of(redirect), "/events");

        for bad_id in ["abc", "-5", "0", ""] {
            let redirect = register_event(
                State(registry.clone()),
                Form(form(bad_id, "Ann", "ann@x.com", "tok")),
            )
            .await;
            assert_eq!(location_of(redirect), "/events");
        }
        assert!(registrations.rows().is_empty());
    }

    #[tokio::test]
    async fn malformed_input_is_dropped_silently() {
        let (registry, registrations, nonces) = registry_for_capacity(None);

        // 不正なメールアドレス
        nonces.prime(REGISTER_EVENT_ACTION, "tok");
        let redirect = register_event(
            State(registry.clone()),
            Form(form("1", "Ann", "not-an-email", "tok")),
        )
        .await;
        assert_eq!(location_of(redirect), "/events/1");

        // サニタイズ後に空になる名前
        nonces.prime(REGISTER_EVENT_ACTION, "tok2");
        let redirect = register_event(
            State(registry),
            Form(form("1", "<b></b>", "ann@x.com", "tok2")),
        )
        .await;
        assert_eq!(location_of(redirect), "/events/1");

        assert!(registrations.rows().is_empty());
    }

    #[tokio::test]
    async fn insert_failure_is_reported_as_error_outcome() {
        let registrations = Arc::new(FakeRegistrationRepository::failing(1));
        let nonces = Arc::new(FakeNonceRepository::new());
        let registry = build_registry(
            Arc::new(FakeEventRepository::with_event(1, "Meetup", "")),
            Arc::new(FakeEventMetaRepository::default()),
            registrations.clone(),
            nonces.clone(),
        );
        nonces.prime(REGISTER_EVENT_ACTION, "tok");

        let redirect =
            register_event(State(registry), Form(form("1", "Ann", "ann@x.com", "tok"))).await;

        assert_eq!(location_of(redirect), "/events/1?registered=error");
        assert!(registrations.rows().is_empty());
    }

    // 定員 2 のイベントへの一連の申し込み:
    // Ann 成功 → Ann 重複 → Bob 成功 → Cat 満席
    #[tokio::test]
    async fn capacity_two_scenario_through_the_handler() {
        let (registry, registrations, nonces) = registry_for_capacity(Some(2));

        let submit = |name: &str, email: &str, token: &str| {
            let registry = registry.clone();
            let nonces = nonces.clone();
            let req = form("1", name, email, token);
            async move {
                nonces.prime(REGISTER_EVENT_ACTION, &req.en_registration_nonce);
                location_of(register_event(State(registry), Form(req)).await)
            }
        };

        assert_eq!(
            submit("Ann", "ann@x.com", "t1").await,
            "/events/1?registered=success"
        );
        assert_eq!(registrations.rows().len(), 1);

        assert_eq!(
            submit("Ann", "ann@x.com", "t2").await,
            "/events/1?registered=duplicate"
        );
        assert_eq!(registrations.rows().len(), 1);

        assert_eq!(
            submit("Bob", "bob@x.com", "t3").await,
            "/events/1?registered=success"
        );
        assert_eq!(registrations.rows().len(), 2);

        assert_eq!(
            submit("Cat", "cat@x.com", "t4").await,
            "/events/1?registered=full"
        );
        assert_eq!(registrations.rows().len(), 2);
    }

    #[tokio::test]
    async fn event_page_renders_details_and_form() {
        let nonces = Arc::new(FakeNonceRepository::new());
        let registry = build_registry(
            Arc::new(FakeEventRepository::with_event(1, "Meetup", "<p>Body</p>")),
            Arc::new(FakeEventMetaRepository::with_values(&[
                (1, EVENT_DATE_KEY, "2099-01-01"),
                (1, EVENT_LOCATION_KEY, "Hall A"),
                (1, EVENT_CAPACITY_KEY, "10"),
            ])),
            Arc::new(FakeRegistrationRepository::for_event(1, Some(10))),
            nonces,
        );

        let Html(page) = show_event(
            Path(EventId::new(1)),
            Query(EventPageQuery { registered: None }),
            State(registry),
        )
        .await
        .unwrap();

        assert!(page.contains("Event Details"));
        assert!(page.contains("Hall A"));
        assert!(page.contains("event-registration"));
        assert!(page.contains("en_registration_nonce"));
    }

    #[tokio::test]
    async fn past_event_page_is_closed() {
        let registry = build_registry(
            Arc::new(FakeEventRepository::with_event(1, "Meetup", "")),
            Arc::new(FakeEventMetaRepository::with_values(&[(
                1,
                EVENT_DATE_KEY,
                "2000-01-01",
            )])),
            Arc::new(FakeRegistrationRepository::for_event(1, None)),
            Arc::new(FakeNonceRepository::new()),
        );

        let Html(page) = show_event(
            Path(EventId::new(1)),
            Query(EventPageQuery { registered: None }),
            State(registry),
        )
        .await
        .unwrap();

        assert!(page.contains("event-closed"));
        assert!(!page.contains("<form"));
    }

    #[tokio::test]
    async fn missing_event_page_is_not_found() {
        let registry = crate::testing::default_registry();

        let result = show_event(
            Path(EventId::new(99)),
            Query(EventPageQuery { registered: None }),
            State(registry),
        )
        .await;

        let res = result.unwrap_err().into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
