use std::sync::Arc;

use crate::domain::{
    RepoError,
    event::{Event, EventRepository},
};

#[async_trait::async_trait]
pub trait ListEventsUseCase {
    async fn list_events(&self) -> Result<Vec<Event>, ListEventsError>;
}

#[derive(Debug)]
pub enum ListEventsError {
    RepositoryError(String),
}

pub struct ListEventsUseCaseImpl<R: EventRepository> {
    event_repository: Arc<R>,
}

impl<R: EventRepository> ListEventsUseCaseImpl<R> {
    pub fn new(event_repository: Arc<R>) -> Self {
        Self { event_repository }
    }
}

#[async_trait::async_trait]
impl<R: EventRepository + Send + Sync + 'static> ListEventsUseCase for ListEventsUseCaseImpl<R> {
    async fn list_events(&self) -> Result<Vec<Event>, ListEventsError> {
        match self.event_repository.list_events().await {
            Ok(events) => Ok(events),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error retrieving events: {}", e);
                Err(ListEventsError::RepositoryError(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::MockEventRepository;

    use super::*;

    #[tokio::test]
    async fn test_list_events() {
        let repository = Arc::new(MockEventRepository::default());
        repository.seed("RustConf 2026");
        repository.seed("EuroRust 2026");

        let use_case = ListEventsUseCaseImpl::new(repository);
        let events = use_case.list_events().await.unwrap();
        let slugs: Vec<_> = events.iter().map(|e| e.details.slug.as_str()).collect();
        assert_eq!(slugs, vec!["eurorust-2026", "rustconf-2026"]);
    }

    #[tokio::test]
    async fn test_list_events_storage_failure() {
        let repository = Arc::new(MockEventRepository::failing());
        let use_case = ListEventsUseCaseImpl::new(repository);
        assert!(matches!(
            use_case.list_events().await,
            Err(ListEventsError::RepositoryError(_))
        ));
    }
}
