pub mod cache_service;
pub mod database;
pub mod entity;
pub mod error;
pub mod health_service;
pub mod probe;
pub mod task_service;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;
pub mod user_service;
pub mod volume_service;

pub use cache_service::CacheService;
pub use database::create_connection;
pub use error::StoreError;
pub use health_service::{DependencyCheck, HealthService, PostgresCheck, RedisCheck, Uptime, UptimeFormat};
pub use task_service::TaskService;
pub use user_service::UserService;
pub use volume_service::VolumeService;

// Re-export entities for convenience
pub use entity::tasks;
pub use entity::users;
