use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{RepoCreateError, RepoError, RepoRetrieveError};

mod normalize;

pub use normalize::{clean_list, normalize_date, normalize_time, slugify};

#[async_trait::async_trait]
pub trait EventRepository {
    /// Newest first.
    async fn list_events(&self) -> Result<Vec<Event>, RepoError>;
    async fn get_event_by_slug(&self, slug: &str) -> Result<Event, RepoRetrieveError>;
    async fn insert_event(&self, event: ValidatedEvent) -> Result<Event, RepoCreateError>;
}

/// A candidate record as it arrives from a client, before any normalization.
#[derive(Clone, Debug, Default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub organizer: Option<String>,
    pub agenda: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub organizer: String,
    pub agenda: Vec<String>,
    pub tags: Vec<String>,
}

/// Event details that went through [`validate_and_normalize`]. This is the
/// only shape the repository write path accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedEvent(EventDetails);

impl ValidatedEvent {
    pub fn details(&self) -> &EventDetails {
        &self.0
    }

    pub fn into_details(self) -> EventDetails {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: EventDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventField {
    Title,
    Slug,
    Description,
    Overview,
    Image,
    Venue,
    Location,
    Date,
    Time,
    Mode,
    Audience,
    Organizer,
}

impl EventField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventField::Title => "title",
            EventField::Slug => "slug",
            EventField::Description => "description",
            EventField::Overview => "overview",
            EventField::Image => "image",
            EventField::Venue => "venue",
            EventField::Location => "location",
            EventField::Date => "date",
            EventField::Time => "time",
            EventField::Mode => "mode",
            EventField::Audience => "audience",
            EventField::Organizer => "organizer",
        }
    }
}

impl std::fmt::Display for EventField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(EventField),
    #[error("agenda must contain at least one item")]
    EmptyAgenda,
    #[error("tags must contain at least one item")]
    EmptyTags,
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("invalid time '{0}': hour must be 0-23 and minute 0-59, or 1-12 with am/pm")]
    InvalidTime(String),
    #[error("invalid time format '{0}': expected HH:MM or H am/pm")]
    InvalidTimeFormat(String),
}

fn required(field: EventField, value: Option<String>) -> Result<String, ValidationError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Required(field)),
    }
}

impl EventDetails {
    fn check_required(&self) -> Result<(), ValidationError> {
        let fields = [
            (EventField::Slug, &self.slug),
            (EventField::Title, &self.title),
            (EventField::Description, &self.description),
            (EventField::Overview, &self.overview),
            (EventField::Image, &self.image),
            (EventField::Venue, &self.venue),
            (EventField::Location, &self.location),
            (EventField::Date, &self.date),
            (EventField::Time, &self.time),
            (EventField::Mode, &self.mode),
            (EventField::Audience, &self.audience),
            (EventField::Organizer, &self.organizer),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::Required(*field));
        }
        if self.agenda.is_empty() {
            return Err(ValidationError::EmptyAgenda);
        }
        if self.tags.is_empty() {
            return Err(ValidationError::EmptyTags);
        }
        Ok(())
    }
}

/// Runs right before a record is written. `previous_title` is the title of the
/// last persisted state, `None` for a record that was never stored.
///
/// The slug is kept only when one is present and the title is unchanged;
/// otherwise it is derived from the title again. Checks run in a fixed order
/// and the first violation is returned.
pub fn validate_and_normalize(
    draft: EventDraft,
    previous_title: Option<&str>,
) -> Result<ValidatedEvent, ValidationError> {
    let title = required(EventField::Title, draft.title)?;
    let description = required(EventField::Description, draft.description)?;
    let overview = required(EventField::Overview, draft.overview)?;
    let image = required(EventField::Image, draft.image)?;
    let venue = required(EventField::Venue, draft.venue)?;
    let location = required(EventField::Location, draft.location)?;
    let date = required(EventField::Date, draft.date)?;
    let time = required(EventField::Time, draft.time)?;
    let mode = required(EventField::Mode, draft.mode)?;
    let audience = required(EventField::Audience, draft.audience)?;
    let organizer = required(EventField::Organizer, draft.organizer)?;

    let existing_slug = draft
        .slug
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty());
    let slug = match existing_slug {
        Some(slug) if previous_title == Some(title.as_str()) => slug,
        _ => slugify(&title),
    };

    let date = normalize_date(&date)?;
    let time = normalize_time(&time)?;

    let details = EventDetails {
        title,
        slug,
        description,
        overview,
        image,
        venue,
        location,
        date,
        time,
        mode,
        audience,
        organizer,
        agenda: clean_list(draft.agenda),
        tags: clean_list(draft.tags),
    };
    details.check_required()?;

    Ok(ValidatedEvent(details))
}
