use crate::CacheService;
use crate::entity::users;
use crate::error::StoreError;
use chrono::Utc;
use dockyard_shared::{NewUser, User};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, QuerySelect, Set};
use std::sync::Arc;

pub const USERS_LIST_KEY: &str = "users:all";
const LIST_LIMIT: u64 = 50;

pub struct UserService {
    db: DatabaseConnection,
    cache_service: Arc<CacheService>,
}

impl UserService {
    pub fn new(db: DatabaseConnection, cache_service: Arc<CacheService>) -> Self {
        Self { db, cache_service }
    }

    /// The 50 most recently created users, always read from Postgres.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .limit(LIST_LIMIT)
            .all(&self.db)
            .await?;

        Ok(users.iter().map(Self::entity_to_user).collect())
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let name = new_user.name.as_deref().map(str::trim).unwrap_or_default();
        let email = new_user.email.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() || email.is_empty() {
            return Err(StoreError::Invalid("name and email are required".to_string()));
        }

        let inserted = users::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&self.db)
        .await;

        let model = match inserted {
            Ok(model) => model,
            Err(e) if StoreError::is_unique_violation(&e) => {
                return Err(StoreError::Conflict("Email already exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self.cache_service.delete(USERS_LIST_KEY).await {
            log::warn!("Failed to invalidate {}: {}", USERS_LIST_KEY, e);
        }

        Ok(Self::entity_to_user(&model))
    }

    fn entity_to_user(entity: &users::Model) -> User {
        User {
            id: entity.id,
            name: entity.name.clone(),
            email: entity.email.clone(),
            created_at: entity.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::unique_violation;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};

    fn model(id: i32, email: &str) -> users::Model {
        users::Model {
            id,
            name: "Ada".to_string(),
            email: email.to_string(),
            created_at: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2024, 12, 1, 0, 0, 0)
                .unwrap(),
        }
    }

    fn service(db: MockDatabase) -> (UserService, Arc<CacheService>) {
        let cache = Arc::new(CacheService::in_memory());
        let svc = UserService::new(db.into_connection(), Arc::clone(&cache));
        (svc, cache)
    }

    #[tokio::test]
    async fn create_requires_name_and_email() {
        let (svc, _) = service(MockDatabase::new(DatabaseBackend::Postgres));
        let err = svc
            .create(NewUser {
                name: Some("Ada".into()),
                email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ref m) if m == "name and email are required"));
    }

    #[tokio::test]
    async fn create_invalidates_cached_list() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "ada@example.com")]]);
        let (svc, cache) = service(db);
        cache.set_raw(USERS_LIST_KEY, "[]", None).await.unwrap();

        let user = svc
            .create(NewUser {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(cache.get_raw(USERS_LIST_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_insert_keeps_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Query(RuntimeErr::Internal("boom".into()))]);
        let (svc, _) = service(db);
        let err = svc
            .create(NewUser {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([unique_violation("users_email_key")]);
        let (svc, cache) = service(db);
        cache.set_raw(USERS_LIST_KEY, "[]", None).await.unwrap();

        let err = svc
            .create(NewUser {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(ref m) if m == "Email already exists"));
        // Nothing was written, so the cached list stays.
        assert!(cache.get_raw(USERS_LIST_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_ignores_the_cache_key() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(2, "b@example.com"), model(1, "a@example.com")]])
            .append_query_results([vec![model(2, "b@example.com"), model(1, "a@example.com")]]);
        let (svc, cache) = service(db);
        cache.set_raw(USERS_LIST_KEY, "[]", None).await.unwrap();

        assert_eq!(svc.list().await.unwrap().len(), 2);
        assert_eq!(svc.list().await.unwrap().len(), 2);
    }
}
