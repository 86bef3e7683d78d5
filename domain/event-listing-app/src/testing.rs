//! In-memory doubles for exercising the use cases and the HTTP layer
//! without a database.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    RepoCreateError, RepoError, RepoRetrieveError,
    event::{Event, EventDraft, EventRepository, ValidatedEvent, validate_and_normalize},
};

pub fn sample_draft(title: &str) -> EventDraft {
    EventDraft {
        title: Some(title.to_string()),
        slug: None,
        description: Some("  A day of talks about systems programming.  ".to_string()),
        overview: Some("Talks, workshops and a hallway track.".to_string()),
        image: Some("/images/event1.png".to_string()),
        venue: Some("Moscone Center".to_string()),
        location: Some("San Francisco, CA".to_string()),
        date: Some("March 5, 2026".to_string()),
        time: Some("9am".to_string()),
        mode: Some("offline".to_string()),
        audience: Some("Developers".to_string()),
        organizer: Some("Rust Foundation".to_string()),
        agenda: vec!["  ".to_string(), "Talk 1".to_string()],
        tags: vec!["rust".to_string(), " systems ".to_string()],
    }
}

/// Keeps events in insertion order and enforces slug uniqueness like the
/// database index does.
#[derive(Default)]
pub struct MockEventRepository {
    events: Mutex<Vec<Event>>,
    failing: bool,
}

impl MockEventRepository {
    /// Every call fails with a storage error.
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn seed(&self, title: &str) -> Event {
        let event = validate_and_normalize(sample_draft(title), None)
            .expect("sample draft should be valid");
        let stored = Self::to_stored(event);
        self.events
            .lock()
            .expect("mock repository lock poisoned")
            .push(stored.clone());
        stored
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .expect("mock repository lock poisoned")
            .len()
    }

    fn to_stored(event: ValidatedEvent) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            details: event.into_details(),
            created_at: now,
            updated_at: now,
        }
    }

    fn storage_error() -> String {
        "mock storage unavailable".to_string()
    }
}

#[async_trait::async_trait]
impl EventRepository for MockEventRepository {
    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        if self.failing {
            return Err(RepoError::StorageError(Self::storage_error()));
        }
        let events = self.events.lock().expect("mock repository lock poisoned");
        Ok(events.iter().rev().cloned().collect())
    }

    async fn get_event_by_slug(&self, slug: &str) -> Result<Event, RepoRetrieveError> {
        if self.failing {
            return Err(RepoRetrieveError::StorageError(Self::storage_error()));
        }
        let events = self.events.lock().expect("mock repository lock poisoned");
        events
            .iter()
            .find(|event| event.details.slug == slug)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn insert_event(&self, event: ValidatedEvent) -> Result<Event, RepoCreateError> {
        if self.failing {
            return Err(RepoCreateError::StorageError(Self::storage_error()));
        }
        let mut events = self.events.lock().expect("mock repository lock poisoned");
        if events
            .iter()
            .any(|existing| existing.details.slug == event.details().slug)
        {
            return Err(RepoCreateError::Conflict("slug".to_string()));
        }
        let stored = Self::to_stored(event);
        events.push(stored.clone());
        Ok(stored)
    }
}
