use crate::CacheService;
use crate::entity::tasks;
use crate::error::StoreError;
use chrono::Utc;
use dockyard_shared::{DataSource, NewTask, Task, TaskPatch};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set};
use std::sync::Arc;
use std::time::Duration;

pub const TASKS_LIST_KEY: &str = "tasks:all";

/// Task CRUD over Postgres with a short-lived cached list.
pub struct TaskService {
    db: DatabaseConnection,
    cache_service: Arc<CacheService>,
    list_ttl: Duration,
}

impl TaskService {
    pub fn new(db: DatabaseConnection, cache_service: Arc<CacheService>, list_ttl: Duration) -> Self {
        Self {
            db,
            cache_service,
            list_ttl,
        }
    }

    /// All tasks, newest first. Served from the cache while the list key lives.
    pub async fn list(&self) -> Result<(Vec<Task>, DataSource), StoreError> {
        match self.cache_service.get::<Vec<Task>>(TASKS_LIST_KEY).await {
            Ok(Some(cached)) => return Ok((cached, DataSource::Cache)),
            Ok(None) => {}
            Err(e) => log::warn!("Task list cache read failed: {}", e),
        }

        let tasks: Vec<Task> = tasks::Entity::find()
            .order_by_desc(tasks::Column::CreatedAt)
            .all(&self.db)
            .await?
            .iter()
            .map(Self::entity_to_task)
            .collect();

        if let Err(e) = self
            .cache_service
            .set(TASKS_LIST_KEY, &tasks, Some(self.list_ttl))
            .await
        {
            log::warn!("Task list cache write failed: {}", e);
        }

        Ok((tasks, DataSource::Database))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Task>, StoreError> {
        let task = tasks::Entity::find_by_id(id).one(&self.db).await?;
        Ok(task.as_ref().map(Self::entity_to_task))
    }

    pub async fn create(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let title = new_task.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(StoreError::Invalid("title is required".to_string()));
        }
        let description = new_task.description.as_deref().map(str::trim).unwrap_or_default();

        let now = Utc::now().fixed_offset();
        let model = tasks::ActiveModel {
            id: NotSet,
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            done: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        self.invalidate_list().await;
        Ok(Self::entity_to_task(&model))
    }

    /// Apply the fields present in `patch`; absent ones keep their value.
    pub async fn update(&self, id: i32, patch: TaskPatch) -> Result<Task, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::Invalid(
                "Provide at least one of: title, description, done".to_string(),
            ));
        }

        let existing = tasks::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("Task"))?;

        let mut active: tasks::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(done) = patch.done {
            active.done = Set(done);
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        let updated = active.update(&self.db).await?;
        self.invalidate_list().await;
        Ok(Self::entity_to_task(&updated))
    }

    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = tasks::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("Task"));
        }
        self.invalidate_list().await;
        Ok(())
    }

    async fn invalidate_list(&self) {
        if let Err(e) = self.cache_service.delete(TASKS_LIST_KEY).await {
            log::warn!("Failed to invalidate {}: {}", TASKS_LIST_KEY, e);
        }
    }

    fn entity_to_task(entity: &tasks::Model) -> Task {
        Task {
            id: entity.id,
            title: entity.title.clone(),
            description: entity.description.clone(),
            done: entity.done,
            created_at: entity.created_at.with_timezone(&Utc),
            updated_at: entity.updated_at.with_timezone(&Utc),
        }
    }
}
