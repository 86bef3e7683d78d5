use std::sync::Arc;

use crate::domain::{
    RepoRetrieveError,
    event::{Event, EventRepository},
};

#[async_trait::async_trait]
pub trait GetEventUseCase {
    async fn get_event(&self, slug: &str) -> Result<Option<Event>, GetEventError>;
}

#[derive(Debug)]
pub enum GetEventError {
    RepositoryError(String),
}

pub struct GetEventUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> GetEventUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> GetEventUseCase for GetEventUseCaseImpl<R> {
    async fn get_event(&self, slug: &str) -> Result<Option<Event>, GetEventError> {
        match self.event_repository.get_event_by_slug(slug).await {
            Ok(event) => Ok(Some(event)),
            Err(RepoRetrieveError::NotFound) => Ok(None),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error retrieving event '{}': {}", slug, e);
                Err(GetEventError::RepositoryError(e))
            }
        }
    }
}
