use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::redis::RedisClient;
use adapter::repository::event::EventRepositoryImpl;
use adapter::repository::event_meta::EventMetaRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::nonce::NonceRepositoryImpl;
use adapter::repository::registration::RegistrationRepositoryImpl;
use kernel::repository::event::EventRepository;
use kernel::repository::event_meta::EventMetaRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::nonce::NonceRepository;
use kernel::repository::registration::RegistrationRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    app_config: AppConfig,
    health_check_repository: Arc<dyn HealthCheckRepository>,
    event_repository: Arc<dyn EventRepository>,
    event_meta_repository: Arc<dyn EventMetaRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    nonce_repository: Arc<dyn NonceRepository>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: AppConfig,
    ) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let event_meta_repository = Arc::new(EventMetaRepositoryImpl::new(pool.clone()));
        let registration_repository = Arc::new(RegistrationRepositoryImpl::new(pool.clone()));
        let nonce_repository = Arc::new(NonceRepositoryImpl::new(
            redis_client.clone(),
            app_config.auth.nonce_ttl,
        ));
        Self {
            app_config,
            health_check_repository,
            event_repository,
            event_meta_repository,
            registration_repository,
            nonce_repository,
        }
    }

    // ハンドラのテストでフェイクのリポジトリ実装を差し込むためのコンストラクタ
    pub fn from_parts(
        app_config: AppConfig,
        health_check_repository: Arc<dyn HealthCheckRepository>,
        event_repository: Arc<dyn EventRepository>,
        event_meta_repository: Arc<dyn EventMetaRepository>,
        registration_repository: Arc<dyn RegistrationRepository>,
        nonce_repository: Arc<dyn NonceRepository>,
    ) -> Self {
        Self {
            app_config,
            health_check_repository,
            event_repository,
            event_meta_repository,
            registration_repository,
            nonce_repository,
        }
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn event_meta_repository(&self) -> Arc<dyn EventMetaRepository> {
        self.event_meta_repository.clone()
    }

    pub fn registration_repository(&self) -> Arc<dyn RegistrationRepository> {
        self.registration_repository.clone()
    }

    pub fn nonce_repository(&self) -> Arc<dyn NonceRepository> {
        self.nonce_repository.clone()
    }
}
