use crate::config::{Config, DemoApp};
use crate::error::ApiError;
use dockyard_services::{
    CacheService, HealthService, PostgresCheck, RedisCheck, TaskService, Uptime, UptimeFormat, UserService,
    VolumeService, create_connection,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub health: Arc<HealthService>,
    pub cache_service: Arc<CacheService>,
    pub task_service: Option<Arc<TaskService>>,
    pub user_service: Option<Arc<UserService>>,
    pub volume_service: Arc<VolumeService>,
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    /// Open the clients the configured app needs.
    pub async fn initialize(config: Config, uptime: Uptime) -> anyhow::Result<Self> {
        if !config.app.needs_database() {
            return Ok(Self::from_parts(config, uptime, None, Arc::new(CacheService::new(None)?)));
        }

        let cache_service = Arc::new(CacheService::new(Some(config.redis_url.clone()))?);
        match cache_service.ping().await {
            Ok(()) => log::info!("[REDIS] Connected"),
            Err(e) => log::warn!("[REDIS] Not reachable yet: {}", e),
        }

        let database_url = config
            .database_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let db = create_connection(&database_url).await?;
        log::info!(
            "[DB] Pool ready for {}",
            config.masked_database_url().unwrap_or_default()
        );

        Ok(Self::from_parts(config, uptime, Some(db), cache_service))
    }

    pub fn from_parts(
        config: Config,
        uptime: Uptime,
        db: Option<DatabaseConnection>,
        cache_service: Arc<CacheService>,
    ) -> Self {
        let mut health = HealthService::new(uptime, config.environment.clone(), config.probe_timeout);
        if config.app == DemoApp::TaskApp {
            health = health.with_report_uptime(UptimeFormat::SecondsWithUnit);
        }
        if config.app.needs_database() {
            if let Some(ref conn) = db {
                health = health.with_check(Arc::new(PostgresCheck::new(conn.clone())));
            }
            health = health.with_check(Arc::new(RedisCheck::new(Arc::clone(&cache_service))));
        }

        let task_service = db.as_ref().map(|conn| {
            Arc::new(TaskService::new(
                conn.clone(),
                Arc::clone(&cache_service),
                config.list_cache_ttl,
            ))
        });
        let user_service = db.as_ref().map(|conn| {
            Arc::new(UserService::new(conn.clone(), Arc::clone(&cache_service)))
        });

        let volume_service = Arc::new(VolumeService::new(
            &config.named_volume_path,
            &config.bind_mount_path,
            config.bind_sample_file.clone(),
            &config.tmpfs_path,
        ));

        Self {
            config,
            health: Arc::new(health),
            cache_service,
            task_service,
            user_service,
            volume_service,
            db,
        }
    }

    pub fn tasks(&self) -> Result<&TaskService, ApiError> {
        self.task_service.as_deref().ok_or_else(ApiError::database_unavailable)
    }

    pub fn users(&self) -> Result<&UserService, ApiError> {
        self.user_service.as_deref().ok_or_else(ApiError::database_unavailable)
    }
}
