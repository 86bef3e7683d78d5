use std::sync::Arc;

use chrono::Utc;
use event_listing_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError,
    event::{Event, EventDetails, EventRepository, ValidatedEvent},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};

use crate::{ConnectionManager, entity::event};

pub struct EventRepositoryImpl {
    connections: Arc<ConnectionManager>,
}

impl EventRepositoryImpl {
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }

    fn model_to_event(model: event::Model) -> Result<Event, String> {
        let agenda: Vec<String> = serde_json::from_str(&model.agenda)
            .map_err(|e| format!("Corrupt agenda for event {}: {}", model.id, e))?;
        let tags: Vec<String> = serde_json::from_str(&model.tags)
            .map_err(|e| format!("Corrupt tags for event {}: {}", model.id, e))?;

        Ok(Event {
            id: model.id,
            details: EventDetails {
                title: model.title,
                slug: model.slug,
                description: model.description,
                overview: model.overview,
                image: model.image,
                venue: model.venue,
                location: model.location,
                date: model.date,
                time: model.time,
                mode: model.mode,
                audience: model.audience,
                organizer: model.organizer,
                agenda,
                tags,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait::async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        let db = self
            .connections
            .ensure_connection()
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        let models = event::Entity::find()
            .order_by_desc(event::Column::CreatedAt)
            .all(&db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;

        models
            .into_iter()
            .map(Self::model_to_event)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepoError::StorageError)
    }

    async fn get_event_by_slug(&self, slug: &str) -> Result<Event, RepoRetrieveError> {
        let db = self
            .connections
            .ensure_connection()
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;

        let model = event::Entity::find()
            .filter(event::Column::Slug.eq(slug))
            .one(&db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;

        Self::model_to_event(model).map_err(RepoRetrieveError::StorageError)
    }

    async fn insert_event(&self, event: ValidatedEvent) -> Result<Event, RepoCreateError> {
        let db = self
            .connections
            .ensure_connection()
            .await
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;

        let details = event.into_details();
        let agenda = serde_json::to_string(&details.agenda)
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
        let tags = serde_json::to_string(&details.tags)
            .map_err(|e| RepoCreateError::StorageError(e.to_string()))?;
        let now = Utc::now();

        let new_event = event::ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            title: Set(details.title),
            slug: Set(details.slug),
            description: Set(details.description),
            overview: Set(details.overview),
            image: Set(details.image),
            venue: Set(details.venue),
            location: Set(details.location),
            date: Set(details.date),
            time: Set(details.time),
            mode: Set(details.mode),
            audience: Set(details.audience),
            organizer: Set(details.organizer),
            agenda: Set(agenda),
            tags: Set(tags),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_event.insert(&db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RepoCreateError::Conflict("slug".to_string()),
            _ => RepoCreateError::StorageError(e.to_string()),
        })?;

        Self::model_to_event(model).map_err(RepoCreateError::StorageError)
    }
}
