// ハンドラ単体テスト用のインメモリのフェイクリポジトリ群

use async_trait::async_trait;
use chrono::Utc;
use kernel::model::{
    event::{
        event::{CreateEvent, UpdateEventContent},
        Event,
    },
    id::{EventId, RegistrationId},
    nonce::NonceToken,
    registration::{
        evaluate_registration, event::CreateRegistration, Registration, RegistrationEvent,
        RegistrationOutcome,
    },
};
use kernel::repository::{
    event::EventRepository, event_meta::EventMetaRepository, health::HealthCheckRepository,
    nonce::NonceRepository, registration::RegistrationRepository,
};
use registry::AppRegistry;
use shared::config::{AppConfig, AuthConfig, DatabaseConfig, RedisConfig};
use shared::error::{AppError, AppResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn test_app_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            host: "localhost".into(),
            port: 5432,
            username: "app".into(),
            password: "passwd".into(),
            database: "app".into(),
        },
        redis: RedisConfig {
            host: "localhost".into(),
            port: 6379,
        },
        auth: AuthConfig {
            editor_token: "test-admin-token".into(),
            nonce_ttl: 600,
        },
    }
}

pub(crate) struct FakeHealthCheckRepository;

#[async_trait]
impl HealthCheckRepository for FakeHealthCheckRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

#[derive(Default)]
pub(crate) struct FakeEventRepository {
    // event_id -> (title, body)
    events: Mutex<HashMap<i64, (String, String)>>,
}

impl FakeEventRepository {
    pub(crate) fn with_event(event_id: i64, title: &str, body: &str) -> Self {
        let mut events = HashMap::new();
        events.insert(event_id, (title.to_string(), body.to_string()));
        Self {
            events: Mutex::new(events),
        }
    }

    pub(crate) fn title_of(&self, event_id: i64) -> Option<String> {
        self.events
            .lock()
            .unwrap()
            .get(&event_id)
            .map(|(title, _)| title.clone())
    }
}

#[async_trait]
impl EventRepository for FakeEventRepository {
    async fn create(&self, event: CreateEvent) -> AppResult<EventId> {
        let mut events = self.events.lock().unwrap();
        let id = events.keys().max().copied().unwrap_or(0) + 1;
        events.insert(id, (event.title, event.body));
        Ok(EventId::new(id))
    }

    async fn update_content(&self, event: UpdateEventContent) -> AppResult<()> {
        let mut events = self.events.lock().unwrap();
        match events.get_mut(&event.event_id.raw()) {
            Some(entry) => {
                *entry = (event.title, event.body);
                Ok(())
            }
            None => Err(AppError::EntityNotFound("specified event not found".into())),
        }
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&event_id.raw())
            .map(|(title, body)| Event {
                event_id,
                title: title.clone(),
                body: body.clone(),
                created_at: Utc::now(),
            }))
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let events = self.events.lock().unwrap();
        let mut ids: Vec<i64> = events.keys().copied().collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids
            .into_iter()
            .map(|id| {
                let (title, body) = events[&id].clone();
                Event {
                    event_id: EventId::new(id),
                    title,
                    body,
                    created_at: Utc::now(),
                }
            })
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeEventMetaRepository {
    values: Mutex<HashMap<(i64, String), String>>,
}

impl FakeEventMetaRepository {
    pub(crate) fn with_values(values: &[(i64, &str, &str)]) -> Self {
        let map = values
            .iter()
            .map(|(id, key, value)| ((*id, key.to_string()), value.to_string()))
            .collect();
        Self {
            values: Mutex::new(map),
        }
    }

    pub(crate) fn value_of(&self, event_id: i64, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(&(event_id, key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl EventMetaRepository for FakeEventMetaRepository {
    async fn get(&self, event_id: EventId, key: &str) -> AppResult<Option<String>> {
        Ok(self.value_of(event_id.raw(), key))
    }

    async fn set(&self, event_id: EventId, key: &str, value: &str) -> AppResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert((event_id.raw(), key.to_string()), value.to_string());
        Ok(())
    }
}

pub(crate) struct FakeRegistrationRepository {
    capacity: Option<i64>,
    known_events: HashSet<i64>,
    fail_inserts: bool,
    // (event_id, user_name, user_email)、挿入順
    rows: Mutex<Vec<(i64, String, String)>>,
}

impl FakeRegistrationRepository {
    pub(crate) fn for_event(event_id: i64, capacity: Option<i64>) -> Self {
        Self {
            capacity,
            known_events: HashSet::from([event_id]),
            fail_inserts: false,
            rows: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(event_id: i64) -> Self {
        Self {
            fail_inserts: true,
            ..Self::for_event(event_id, None)
        }
    }

    pub(crate) fn rows(&self) -> Vec<(i64, String, String)> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrationRepository for FakeRegistrationRepository {
    async fn register(&self, event: CreateRegistration) -> AppResult<RegistrationOutcome> {
        if !self.known_events.contains(&event.event_id.raw()) {
            return Err(AppError::EntityNotFound("event not found".into()));
        }
        if self.fail_inserts {
            return Err(AppError::NoRowsAffectedError(
                "No registration record has been created".into(),
            ));
        }

        let mut rows = self.rows.lock().unwrap();
        let already = rows
            .iter()
            .any(|(id, _, email)| *id == event.event_id.raw() && email == &event.user_email);
        let count = rows
            .iter()
            .filter(|(id, _, _)| *id == event.event_id.raw())
            .count() as i64;
        if let Some(outcome) = evaluate_registration(already, count, self.capacity) {
            return Ok(outcome);
        }
        rows.push((event.event_id.raw(), event.user_name, event.user_email));
        Ok(RegistrationOutcome::Success)
    }

    async fn count_for_event(&self, event_id: EventId) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| *id == event_id.raw())
            .count() as i64)
    }

    async fn find_all_with_event_title(&self) -> AppResult<Vec<Registration>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .enumerate()
            .map(|(i, (event_id, name, email))| Registration {
                registration_id: RegistrationId::new(i as i64 + 1),
                user_name: name.clone(),
                user_email: email.clone(),
                registration_date: Utc::now(),
                event: RegistrationEvent {
                    event_id: EventId::new(*event_id),
                    title: None,
                },
            })
            .collect())
    }
}

pub(crate) struct FakeNonceRepository {
    accept: bool,
    issued: Mutex<HashSet<(String, String)>>,
    counter: AtomicU64,
}

impl FakeNonceRepository {
    pub(crate) fn new() -> Self {
        Self {
            accept: true,
            issued: Mutex::new(HashSet::new()),
            counter: AtomicU64::new(0),
        }
    }

    // consume が常に失敗するトークンストア
    pub(crate) fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::new()
        }
    }

    pub(crate) fn prime(&self, action: &str, token: &str) {
        self.issued
            .lock()
            .unwrap()
            .insert((action.to_string(), token.to_string()));
    }
}

#[async_trait]
impl NonceRepository for FakeNonceRepository {
    async fn issue(&self, action: &str) -> AppResult<NonceToken> {
        let token = format!("nonce-{}", self.counter.fetch_add(1, Ordering::SeqCst));
        self.prime(action, &token);
        Ok(NonceToken(token))
    }

    async fn consume(&self, action: &str, token: &str) -> AppResult<bool> {
        if !self.accept {
            return Ok(false);
        }
        Ok(self
            .issued
            .lock()
            .unwrap()
            .remove(&(action.to_string(), token.to_string())))
    }
}

pub(crate) fn build_registry(
    event_repository: Arc<FakeEventRepository>,
    event_meta_repository: Arc<FakeEventMetaRepository>,
    registration_repository: Arc<FakeRegistrationRepository>,
    nonce_repository: Arc<FakeNonceRepository>,
) -> AppRegistry {
    AppRegistry::from_parts(
        test_app_config(),
        Arc::new(FakeHealthCheckRepository),
        event_repository,
        event_meta_repository,
        registration_repository,
        nonce_repository,
    )
}

pub(crate) fn default_registry() -> AppRegistry {
    build_registry(
        Arc::new(FakeEventRepository::default()),
        Arc::new(FakeEventMetaRepository::default()),
        Arc::new(FakeRegistrationRepository::for_event(1, None)),
        Arc::new(FakeNonceRepository::new()),
    )
}
