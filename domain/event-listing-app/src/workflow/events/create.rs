use std::sync::Arc;

use crate::domain::{
    RepoCreateError,
    event::{Event, EventDraft, EventRepository, ValidationError, validate_and_normalize},
};

#[async_trait::async_trait]
pub trait CreateEventUseCase {
    async fn create_event(&self, draft: EventDraft) -> Result<Event, CreateEventError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CreateEventError {
    #[error("Event validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("An event with slug '{0}' already exists")]
    DuplicateSlug(String),
    #[error("Failed to store event: {0}")]
    Repository(String),
}

pub struct CreateEventUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> CreateEventUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> CreateEventUseCase for CreateEventUseCaseImpl<R> {
    async fn create_event(&self, draft: EventDraft) -> Result<Event, CreateEventError> {
        let event = validate_and_normalize(draft, None)?;
        let slug = event.details().slug.clone();

        match self.event_repository.insert_event(event).await {
            Ok(event) => {
                log::info!("Created event '{}' ({})", event.details.slug, event.id);
                Ok(event)
            }
            Err(RepoCreateError::Conflict(field)) => {
                log::warn!("Rejected event '{}': duplicate {}", slug, field);
                Err(CreateEventError::DuplicateSlug(slug))
            }
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Error storing event '{}': {}", slug, e);
                Err(CreateEventError::Repository(e))
            }
        }
    }
}
