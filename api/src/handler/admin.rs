use crate::{
    extractor::AuthorizedEditor,
    handler::event::load_event_details,
    model::{
        event::{SaveEventRequest, SaveKind},
        sanitize_text,
    },
    view,
};
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use garde::Validate;
use kernel::model::{
    event::{
        event::{CreateEvent, UpdateEventContent},
        EVENT_CAPACITY_KEY, EVENT_DATE_KEY, EVENT_LOCATION_KEY, EVENT_TIME_KEY,
    },
    id::EventId,
    nonce::SAVE_EVENT_META_ACTION,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn show_new_event_form(
    _editor: AuthorizedEditor,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    let nonce = registry
        .nonce_repository()
        .issue(SAVE_EVENT_META_ACTION)
        .await?;
    Ok(Html(view::admin::render_new_event_form(nonce.value())))
}

pub async fn create_event(
    _editor: AuthorizedEditor,
    State(registry): State<AppRegistry>,
    Form(req): Form<SaveEventRequest>,
) -> AppResult<Redirect> {
    // トークン検査に失敗したら何も書かずに戻す
    if !registry
        .nonce_repository()
        .consume(SAVE_EVENT_META_ACTION, &req.en_event_nonce)
        .await?
    {
        return Ok(Redirect::to("/admin/events/new"));
    }
    // 自動保存・リビジョンは新規作成の対象にしない
    if req.save_kind != SaveKind::Manual {
        return Ok(Redirect::to("/admin/events/new"));
    }
    req.validate(&())?;

    let title = sanitize_text(&req.title);
    if title.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "イベントのタイトルが空です。".into(),
        ));
    }

    let event_id = registry
        .event_repository()
        .create(CreateEvent::new(title, req.body.clone()))
        .await?;
    save_event_meta(&registry, event_id, &req).await?;

    Ok(Redirect::to(&format!("/admin/events/{event_id}/edit")))
}

pub async fn show_edit_event_form(
    _editor: AuthorizedEditor,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    let event = registry
        .event_repository()
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound("event not found".into()))?;
    let details = load_event_details(registry.event_meta_repository(), event_id).await?;
    let nonce = registry
        .nonce_repository()
        .issue(SAVE_EVENT_META_ACTION)
        .await?;
    Ok(Html(view::admin::render_edit_event_form(
        &event,
        &details,
        nonce.value(),
    )))
}

// 本文とメタデータの保存。ホストの保存ライフサイクルに相当する
pub async fn save_event(
    _editor: AuthorizedEditor,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Form(req): Form<SaveEventRequest>,
) -> AppResult<Redirect> {
    let edit_url = format!("/admin/events/{event_id}/edit");

    if !registry
        .nonce_repository()
        .consume(SAVE_EVENT_META_ACTION, &req.en_event_nonce)
        .await?
    {
        return Ok(Redirect::to(&edit_url));
    }
    // 自動保存・リビジョンではメタデータを書き換えない
    if req.save_kind != SaveKind::Manual {
        return Ok(Redirect::to(&edit_url));
    }
    req.validate(&())?;

    let title = sanitize_text(&req.title);
    if title.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "イベントのタイトルが空です。".into(),
        ));
    }

    registry
        .event_repository()
        .update_content(UpdateEventContent::new(event_id, title, req.body.clone()))
        .await?;
    save_event_meta(&registry, event_id, &req).await?;

    Ok(Redirect::to(&edit_url))
}

// メタデータはテキストのまま保存する。定員の数値化は読み出し側が行う
async fn save_event_meta(
    registry: &AppRegistry,
    event_id: EventId,
    req: &SaveEventRequest,
) -> AppResult<()> {
    let meta = registry.event_meta_repository();
    meta.set(event_id, EVENT_DATE_KEY, &sanitize_text(&req.en_event_date))
        .await?;
    meta.set(event_id, EVENT_TIME_KEY, &sanitize_text(&req.en_event_time))
        .await?;
    meta.set(
        event_id,
        EVENT_LOCATION_KEY,
        &sanitize_text(&req.en_event_location),
    )
    .await?;
    meta.set(
        event_id,
        EVENT_CAPACITY_KEY,
        &sanitize_text(&req.en_event_capacity),
    )
    .await?;
    Ok(())
}

pub async fn show_registrations(
    _editor: AuthorizedEditor,
    State(registry): State<AppRegistry>,
) -> AppResult<Html<String>> {
    let registrations = registry
        .registration_repository()
        .find_all_with_event_title()
        .await?;
    Ok(Html(view::admin::render_registrations_page(&registrations)))
}
